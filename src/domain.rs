//! Domain models: grades, difficulty tiers, topics, questions and quiz results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::figure::Figure;

/// School year the curriculum is organized by.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Grade {
  #[serde(rename = "小4", alias = "g4")]
  G4,
  #[serde(rename = "小5", alias = "g5")]
  G5,
  #[serde(rename = "小6", alias = "g6")]
  G6,
  #[serde(rename = "中1", alias = "m1")]
  M1,
  #[serde(rename = "中2", alias = "m2")]
  M2,
  #[serde(rename = "中3", alias = "m3")]
  M3,
}

impl Grade {
  pub const ALL: [Grade; 6] = [Grade::G4, Grade::G5, Grade::G6, Grade::M1, Grade::M2, Grade::M3];

  /// Two-character topic-id prefix owned by this grade.
  pub fn prefix(self) -> &'static str {
    match self {
      Grade::G4 => "g4",
      Grade::G5 => "g5",
      Grade::G6 => "g6",
      Grade::M1 => "m1",
      Grade::M2 => "m2",
      Grade::M3 => "m3",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Grade::G4 => "小4",
      Grade::G5 => "小5",
      Grade::G6 => "小6",
      Grade::M1 => "中1",
      Grade::M2 => "中2",
      Grade::M3 => "中3",
    }
  }

  /// Grade owning a topic-id prefix such as "m1".
  pub fn from_prefix(prefix: &str) -> Option<Grade> {
    Grade::ALL.into_iter().find(|g| g.prefix() == prefix)
  }
}

/// Ordered generation tiers. Topics without tiered generation fall back to `Standard`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
  #[serde(rename = "基礎", alias = "basic")]
  Basic,
  #[default]
  #[serde(rename = "標準", alias = "standard")]
  Standard,
  #[serde(rename = "発展", alias = "advanced")]
  Advanced,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Basic, Difficulty::Standard, Difficulty::Advanced];

  pub fn label(self) -> &'static str {
    match self {
      Difficulty::Basic => "基礎",
      Difficulty::Standard => "標準",
      Difficulty::Advanced => "発展",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Difficulty::Basic => "まずはここから！",
      Difficulty::Standard => "定着させよう！",
      Difficulty::Advanced => "応用へ挑戦！",
    }
  }
}

/// A curriculum unit. The id prefix selects the grade-level generator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Topic {
  pub id: String,
  pub name: String,
}

impl Topic {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self { id: id.into(), name: name.into() }
  }
}

/// Id of the placeholder question served for topics without a generator.
pub const NOT_READY_ID: i64 = -1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
  pub id: i64,
  /// Problem statement; `base^exp` marks a superscript.
  pub text: String,
  /// Canonical answer, already a fixed point of the normalizer.
  pub answer: String,
  pub explanation: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub figure: Option<Figure>,
}

impl Question {
  pub fn is_not_ready(&self) -> bool {
    self.id == NOT_READY_ID && self.answer.is_empty()
  }
}

/// Outcome of one question, recorded once by the quiz runner.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
  pub question: Question,
  /// Wrong submissions before success, or the attempt limit when exhausted.
  pub attempts: u32,
  pub is_correct: bool,
  pub is_skipped: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
  pub grade: Grade,
  pub topic: Topic,
  pub difficulty: Option<Difficulty>,
  pub results: Vec<QuestionResult>,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
}

impl QuizResult {
  pub fn correct_count(&self) -> usize {
    self.results.iter().filter(|r| r.is_correct).count()
  }

  /// Percentage of correct answers, rounded to the nearest integer.
  pub fn score(&self) -> u32 {
    let total = self.results.len();
    if total == 0 {
      return 0;
    }
    ((self.correct_count() as f64 / total as f64) * 100.0).round() as u32
  }

  pub fn encouragement(&self) -> Encouragement {
    Encouragement::for_score(self.score())
  }

  pub fn elapsed_ms(&self) -> i64 {
    (self.end_time - self.start_time).num_milliseconds()
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Encouragement {
  Perfect,
  Great,
  Good,
  Effort,
}

impl Encouragement {
  pub fn for_score(score: u32) -> Self {
    match score {
      100.. => Encouragement::Perfect,
      80..=99 => Encouragement::Great,
      60..=79 => Encouragement::Good,
      _ => Encouragement::Effort,
    }
  }

  pub fn message(self) -> &'static str {
    match self {
      Encouragement::Perfect => "すごい！パーフェクト！🎉",
      Encouragement::Great => "素晴らしい！ほとんど正解だね！✨",
      Encouragement::Good => "よくがんばったね！この調子！👍",
      Encouragement::Effort => "おつかれさま！次もがんばろう！💪",
    }
  }
}
