//! Error types for question generation and the quiz service.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
  #[error("no valid draw for topic '{topic}' after {tries} tries")]
  RetriesExhausted { topic: String, tries: usize },
}

#[derive(Debug, Error)]
pub enum QuizError {
  #[error("unknown quiz session '{0}'")]
  UnknownSession(String),
  #[error("unknown topic '{0}'")]
  UnknownTopic(String),
  #[error("question count {count} is not one of {allowed:?}")]
  InvalidQuestionCount { count: usize, allowed: Vec<usize> },
  #[error("answer is empty")]
  EmptyAnswer,
  #[error("this topic has no questions yet")]
  NotReady,
  #[error("current question is already resolved; move to the next one")]
  QuestionResolved,
  #[error("current question has not been answered or skipped")]
  QuestionPending,
  #[error("quiz is not complete: {remaining} question(s) left")]
  Incomplete { remaining: usize },
  #[error("quiz is already finished")]
  AlreadyFinished,
  #[error(transparent)]
  Generate(#[from] GenerateError),
}

impl QuizError {
  pub fn status(&self) -> StatusCode {
    match self {
      QuizError::UnknownSession(_) | QuizError::UnknownTopic(_) => StatusCode::NOT_FOUND,
      QuizError::InvalidQuestionCount { .. } | QuizError::EmptyAnswer => StatusCode::BAD_REQUEST,
      QuizError::NotReady
      | QuizError::QuestionResolved
      | QuizError::QuestionPending
      | QuizError::Incomplete { .. }
      | QuizError::AlreadyFinished => StatusCode::CONFLICT,
      QuizError::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for QuizError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
