//! Loading service configuration (quiz policy, generator limits, extra topics) from TOML.
//!
//! See `AppConfig` for the expected schema. Every section is optional.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Grade;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub quiz: QuizSettings,
  #[serde(default)]
  pub generator: GeneratorSettings,
  #[serde(default)]
  pub topics: Vec<TopicCfg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
  /// Wrong submissions allowed before a question is revealed.
  pub max_attempts: u32,
  /// Set sizes a client may request.
  pub question_counts: Vec<usize>,
  /// Finished results kept in memory, newest first.
  pub max_history: usize,
  /// Unfinished sessions older than this are dropped on the next insert.
  pub session_ttl_secs: u64,
  /// Live-session cap; the oldest session is evicted to make room.
  pub max_sessions: usize,
}

impl Default for QuizSettings {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      question_counts: vec![10, 20, 30],
      max_history: 50,
      session_ttl_secs: 3600,
      max_sessions: 1000,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
  /// Rejection-sampling cap for generators that discard degenerate draws.
  pub max_retries: usize,
}

impl Default for GeneratorSettings {
  fn default() -> Self {
    Self { max_retries: 64 }
  }
}

/// Extra catalog entry. Ids without a generator serve the "not ready" placeholder.
#[derive(Clone, Debug, Deserialize)]
pub struct TopicCfg {
  pub grade: Grade,
  pub id: String,
  pub name: String,
}

/// Attempt to load `AppConfig` from KEISAN_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("KEISAN_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "keisan_backend", %path, "Loaded app config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "keisan_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "keisan_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults() {
    let cfg: AppConfig = toml::from_str(
      r#"
        [quiz]
        max_attempts = 5
        max_sessions = 200

        [[topics]]
        grade = "中3"
        id = "m3_statistics"
        name = "標本調査"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.quiz.max_attempts, 5);
    assert_eq!(cfg.quiz.question_counts, vec![10, 20, 30]);
    assert_eq!(cfg.quiz.max_history, 50);
    assert_eq!(cfg.quiz.max_sessions, 200);
    assert_eq!(cfg.quiz.session_ttl_secs, 3600);
    assert_eq!(cfg.generator.max_retries, 64);
    assert_eq!(cfg.topics[0].grade, Grade::M3);
  }

  #[test]
  fn empty_toml_is_default() {
    let cfg: AppConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.quiz.max_attempts, 3);
    assert!(cfg.topics.is_empty());
  }
}
