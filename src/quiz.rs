//! Quiz session runner: walks a generated question set, scores submissions
//! with the normalizer, enforces the attempt limit, and produces the final
//! `QuizResult`.
//!
//! A session moves question by question. Each question is resolved exactly
//! once (correct, attempts exhausted, or skipped) and must be resolved before
//! `advance` moves the cursor on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Difficulty, Grade, Question, QuestionResult, QuizResult, Topic};
use crate::error::QuizError;
use crate::normalizer::answers_match;
use crate::util::display_answer;

/// Outcome of one submission or skip.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
  pub question_id: i64,
  pub correct: bool,
  /// The question is settled and the session may advance.
  pub resolved: bool,
  pub skipped: bool,
  /// Wrong submissions so far on this question.
  pub attempts: u32,
  pub attempts_left: u32,
  /// Revealed once the question is resolved without a correct answer.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub answer: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
}

#[derive(Clone, Debug)]
pub struct QuizSession {
  grade: Grade,
  topic: Topic,
  difficulty: Option<Difficulty>,
  questions: Vec<Question>,
  cursor: usize,
  wrong: u32,
  max_attempts: u32,
  results: Vec<QuestionResult>,
  start_time: DateTime<Utc>,
  finished: bool,
}

impl QuizSession {
  pub fn new(topic: Topic, grade: Grade, difficulty: Option<Difficulty>, questions: Vec<Question>, max_attempts: u32) -> Self {
    Self {
      grade,
      topic,
      difficulty,
      questions,
      cursor: 0,
      wrong: 0,
      max_attempts: max_attempts.max(1),
      results: Vec::new(),
      start_time: Utc::now(),
      finished: false,
    }
  }

  pub fn grade(&self) -> Grade {
    self.grade
  }

  pub fn topic(&self) -> &Topic {
    &self.topic
  }

  pub fn difficulty(&self) -> Option<Difficulty> {
    self.difficulty
  }

  pub fn questions(&self) -> &[Question] {
    &self.questions
  }

  pub fn max_attempts(&self) -> u32 {
    self.max_attempts
  }

  /// Zero-based index of the question being worked on.
  pub fn position(&self) -> usize {
    self.cursor
  }

  /// Question under the cursor; `None` once the session has moved past the last one.
  pub fn current(&self) -> Option<&Question> {
    self.questions.get(self.cursor)
  }

  /// The set is the single placeholder of a topic without a generator.
  pub fn is_not_ready(&self) -> bool {
    self.questions.len() == 1 && self.questions[0].is_not_ready()
  }

  pub fn is_finished(&self) -> bool {
    self.finished
  }

  /// Questions not yet resolved.
  pub fn remaining(&self) -> usize {
    self.questions.len().saturating_sub(self.results.len())
  }

  fn current_resolved(&self) -> bool {
    self.results.len() > self.cursor
  }

  /// Question that may still take a submission or a skip.
  fn open_question(&self) -> Result<&Question, QuizError> {
    if self.finished {
      return Err(QuizError::AlreadyFinished);
    }
    if self.is_not_ready() {
      return Err(QuizError::NotReady);
    }
    if self.current_resolved() {
      return Err(QuizError::QuestionResolved);
    }
    self.current().ok_or(QuizError::QuestionResolved)
  }

  /// Scores `raw` against the current question.
  pub fn submit(&mut self, raw: &str) -> Result<Feedback, QuizError> {
    let question = self.open_question()?.clone();
    if raw.trim().is_empty() {
      return Err(QuizError::EmptyAnswer);
    }

    if answers_match(raw, &question.answer) {
      let attempts = self.wrong;
      self.record(&question, attempts, true, false);
      info!(target: "quiz", topic = %self.topic.id, question = question.id, attempts, "Answered correctly");
      return Ok(Feedback {
        question_id: question.id,
        correct: true,
        resolved: true,
        skipped: false,
        attempts,
        attempts_left: self.max_attempts - attempts,
        answer: None,
        explanation: Some(question.explanation),
      });
    }

    self.wrong += 1;
    debug!(target: "quiz", topic = %self.topic.id, question = question.id, answer_len = raw.len(), wrong = self.wrong, "Wrong answer");
    if self.wrong < self.max_attempts {
      return Ok(Feedback {
        question_id: question.id,
        correct: false,
        resolved: false,
        skipped: false,
        attempts: self.wrong,
        attempts_left: self.max_attempts - self.wrong,
        answer: None,
        explanation: None,
      });
    }

    let attempts = self.max_attempts;
    self.record(&question, attempts, false, false);
    info!(target: "quiz", topic = %self.topic.id, question = question.id, attempts, "Attempts exhausted; answer revealed");
    Ok(Feedback {
      question_id: question.id,
      correct: false,
      resolved: true,
      skipped: false,
      attempts,
      attempts_left: 0,
      answer: Some(display_answer(&question.answer)),
      explanation: Some(question.explanation),
    })
  }

  /// Gives up on the current question and reveals it.
  pub fn skip(&mut self) -> Result<Feedback, QuizError> {
    let question = self.open_question()?.clone();
    let attempts = self.wrong;
    self.record(&question, attempts, false, true);
    info!(target: "quiz", topic = %self.topic.id, question = question.id, attempts, "Question skipped");
    Ok(Feedback {
      question_id: question.id,
      correct: false,
      resolved: true,
      skipped: true,
      attempts,
      attempts_left: self.max_attempts.saturating_sub(attempts),
      answer: Some(display_answer(&question.answer)),
      explanation: Some(question.explanation),
    })
  }

  /// Moves past a resolved question. Returns the next one, or `None` when the
  /// set is complete.
  pub fn advance(&mut self) -> Result<Option<&Question>, QuizError> {
    if self.finished {
      return Err(QuizError::AlreadyFinished);
    }
    if self.is_not_ready() {
      return Err(QuizError::NotReady);
    }
    if self.cursor >= self.questions.len() {
      return Ok(None);
    }
    if !self.current_resolved() {
      return Err(QuizError::QuestionPending);
    }
    self.cursor += 1;
    self.wrong = 0;
    Ok(self.current())
  }

  /// Closes the session. A placeholder session finishes with no results.
  pub fn finish(&mut self) -> Result<QuizResult, QuizError> {
    self.finish_at(Utc::now())
  }

  pub fn finish_at(&mut self, end_time: DateTime<Utc>) -> Result<QuizResult, QuizError> {
    if self.finished {
      return Err(QuizError::AlreadyFinished);
    }
    if !self.is_not_ready() && self.remaining() > 0 {
      return Err(QuizError::Incomplete { remaining: self.remaining() });
    }
    self.finished = true;
    let result = QuizResult {
      grade: self.grade,
      topic: self.topic.clone(),
      difficulty: self.difficulty,
      results: self.results.clone(),
      start_time: self.start_time,
      end_time,
    };
    info!(
      target: "quiz",
      topic = %self.topic.id,
      total = result.results.len(),
      correct = result.correct_count(),
      score = result.score(),
      "Quiz finished"
    );
    Ok(result)
  }

  fn record(&mut self, question: &Question, attempts: u32, is_correct: bool, is_skipped: bool) {
    self.results.push(QuestionResult { question: question.clone(), attempts, is_correct, is_skipped });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::NOT_READY_ID;

  fn question(id: i64, answer: &str) -> Question {
    Question {
      id,
      text: format!("問題{id}"),
      answer: answer.into(),
      explanation: format!("解説{id}"),
      figure: None,
    }
  }

  fn session(answers: &[&str]) -> QuizSession {
    let questions = answers.iter().enumerate().map(|(i, a)| question(i as i64, a)).collect();
    QuizSession::new(Topic::new("g6_circle_area", "円の面積"), Grade::G6, Some(Difficulty::Standard), questions, 3)
  }

  #[test]
  fn unit_suffix_is_accepted() {
    let mut s = session(&["78.5"]);
    let fb = s.submit("78.5cm²").unwrap();
    assert!(fb.correct && fb.resolved);
    assert_eq!(fb.attempts, 0);
    assert_eq!(fb.explanation.as_deref(), Some("解説0"));
  }

  #[test]
  fn empty_answer_costs_nothing() {
    let mut s = session(&["10"]);
    assert!(matches!(s.submit("   "), Err(QuizError::EmptyAnswer)));
    let fb = s.submit("9").unwrap();
    assert_eq!(fb.attempts, 1);
    assert_eq!(fb.attempts_left, 2);
    assert!(!fb.resolved);
    let fb = s.submit("１０").unwrap();
    assert!(fb.correct);
    assert_eq!(fb.attempts, 1);
  }

  #[test]
  fn third_miss_reveals_answer() {
    let mut s = session(&["2^3*3^2", "1"]);
    s.submit("1").unwrap();
    s.submit("2").unwrap();
    let fb = s.submit("3").unwrap();
    assert!(fb.resolved && !fb.correct);
    assert_eq!(fb.attempts, 3);
    assert_eq!(fb.answer.as_deref(), Some("2^3×3^2"));
    assert!(matches!(s.submit("2^3*3^2"), Err(QuizError::QuestionResolved)));
  }

  #[test]
  fn advance_requires_resolution() {
    let mut s = session(&["1", "2"]);
    assert!(matches!(s.advance(), Err(QuizError::QuestionPending)));
    s.skip().unwrap();
    assert_eq!(s.advance().unwrap().map(|q| q.id), Some(1));
    assert!(matches!(s.finish(), Err(QuizError::Incomplete { remaining: 1 })));
    s.submit("2").unwrap();
    assert!(s.advance().unwrap().is_none());
    assert!(s.current().is_none());
  }

  #[test]
  fn finish_collects_results_once() {
    let mut s = session(&["1", "2", "3"]);
    s.submit("1").unwrap();
    s.advance().unwrap();
    s.submit("0").unwrap();
    s.submit("2").unwrap();
    s.advance().unwrap();
    let fb = s.skip().unwrap();
    assert!(fb.skipped);
    let r = s.finish().unwrap();
    assert_eq!(r.results.len(), 3);
    assert_eq!(r.correct_count(), 2);
    assert_eq!(r.score(), 67);
    assert_eq!(r.results[1].attempts, 1);
    assert!(r.results[2].is_skipped);
    assert!(r.end_time >= r.start_time);
    assert!(matches!(s.finish(), Err(QuizError::AlreadyFinished)));
    assert!(matches!(s.skip(), Err(QuizError::AlreadyFinished)));
  }

  #[test]
  fn placeholder_session_takes_no_answers() {
    let placeholder = Question { id: NOT_READY_ID, text: "準備中".into(), answer: String::new(), explanation: String::new(), figure: None };
    let mut s = QuizSession::new(Topic::new("m3_statistics", "標本調査"), Grade::M3, None, vec![placeholder], 3);
    assert!(s.is_not_ready());
    assert!(matches!(s.submit("1"), Err(QuizError::NotReady)));
    assert!(matches!(s.skip(), Err(QuizError::NotReady)));
    assert!(matches!(s.advance(), Err(QuizError::NotReady)));
    let r = s.finish().unwrap();
    assert!(r.results.is_empty());
    assert_eq!(r.score(), 0);
  }
}
