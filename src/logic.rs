//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Catalog listing (grades, difficulties, topics)
//!   - Starting a quiz (count validation, question-set generation)
//!   - Submitting, skipping, advancing and finishing a session
//!   - Stateless answer checking and single-question previews

use tracing::{info, instrument};

use crate::domain::{Difficulty, Grade};
use crate::error::QuizError;
use crate::generator::{self, GenContext};
use crate::normalizer::{answers_match, normalize};
use crate::protocol::*;
use crate::quiz::{Feedback, QuizSession};
use crate::state::AppState;
use crate::util::{display_answer, trunc_for_log};

pub fn list_grades(state: &AppState) -> GradesOut {
  let grades = Grade::ALL
    .into_iter()
    .map(|grade| GradeOut { grade, prefix: grade.prefix(), topic_count: state.catalog.topics_for(grade).len() })
    .collect();
  let difficulties = Difficulty::ALL
    .into_iter()
    .map(|difficulty| DifficultyOut { difficulty, description: difficulty.description() })
    .collect();
  GradesOut { grades, difficulties }
}

pub fn list_topics(state: &AppState, grade: Option<Grade>) -> Vec<TopicOut> {
  state
    .catalog
    .all()
    .filter(|(g, _)| grade.map_or(true, |want| *g == want))
    .map(|(g, t)| TopicOut { grade: g, id: t.id.clone(), name: t.name.clone(), ready: generator::is_supported(&t.id) })
    .collect()
}

/// Generates the question set synchronously; the thread-local RNG never
/// lives across an await point.
fn build_session(state: &AppState, topic_id: &str, count: usize, difficulty: Option<Difficulty>) -> Result<QuizSession, QuizError> {
  let allowed = &state.config.quiz.question_counts;
  if !allowed.contains(&count) {
    return Err(QuizError::InvalidQuestionCount { count, allowed: allowed.clone() });
  }
  let (grade, topic) = state.catalog.find(topic_id).ok_or_else(|| QuizError::UnknownTopic(topic_id.to_string()))?;
  let mut rng = rand::thread_rng();
  let questions = generator::generate_question_set(topic, count, difficulty, &mut rng, state.config.generator.max_retries)?;
  Ok(QuizSession::new(topic.clone(), grade, difficulty, questions, state.config.quiz.max_attempts))
}

#[instrument(level = "info", skip(state))]
pub async fn start_quiz(
  state: &AppState,
  topic_id: &str,
  count: usize,
  difficulty: Option<Difficulty>,
) -> Result<QuizStartedOut, QuizError> {
  let session = build_session(state, topic_id, count, difficulty)?;
  let not_ready = session.is_not_ready();
  let questions = session.questions().len();
  let out_session = session.clone();
  let session_id = state.insert_session(session).await;
  info!(
    target: "quiz",
    session = %session_id,
    %topic_id,
    grade = out_session.grade().label(),
    difficulty = out_session.difficulty().unwrap_or_default().label(),
    questions,
    not_ready,
    "Quiz started"
  );
  Ok(QuizStartedOut::new(session_id, &out_session))
}

#[instrument(level = "info", skip(state, answer), fields(answer_len = answer.len()))]
pub async fn submit_answer(state: &AppState, session_id: &str, answer: &str) -> Result<Feedback, QuizError> {
  state.with_session(session_id, |s| s.submit(answer)).await
}

#[instrument(level = "info", skip(state))]
pub async fn skip_question(state: &AppState, session_id: &str) -> Result<Feedback, QuizError> {
  state.with_session(session_id, |s| s.skip()).await
}

#[instrument(level = "info", skip(state))]
pub async fn next_question(state: &AppState, session_id: &str) -> Result<NextOut, QuizError> {
  state
    .with_session(session_id, |s| {
      let question = s.advance()?.map(QuestionOut::from);
      Ok(NextOut { position: s.position(), complete: question.is_none(), question })
    })
    .await
}

#[instrument(level = "info", skip(state))]
pub async fn finish_quiz(state: &AppState, session_id: &str) -> Result<QuizResultOut, QuizError> {
  let result = state.finish_session(session_id).await?;
  Ok(QuizResultOut::from(result))
}

pub async fn history(state: &AppState) -> Vec<QuizResultOut> {
  state.history().await.into_iter().map(QuizResultOut::from).collect()
}

/// Stateless scoring of `answer` against `expected`.
#[instrument(level = "debug", skip_all, fields(answer_len = answer.len(), expected = %trunc_for_log(expected, 40)))]
pub fn check_answer(answer: &str, expected: &str) -> CheckOut {
  CheckOut {
    normalized_answer: normalize(answer),
    normalized_expected: normalize(expected),
    correct: answers_match(answer, expected),
  }
}

#[instrument(level = "info", skip(state))]
pub fn preview(state: &AppState, topic_id: &str, difficulty: Option<Difficulty>) -> Result<PreviewOut, QuizError> {
  let (_, topic) = state.catalog.find(topic_id).ok_or_else(|| QuizError::UnknownTopic(topic_id.to_string()))?;
  let mut rng = rand::thread_rng();
  let mut ctx = GenContext::new(&mut rng, state.config.generator.max_retries);
  let problem = generator::generate(topic, difficulty, &mut ctx)?;
  if problem.is_not_ready() {
    return Err(QuizError::NotReady);
  }
  let question = problem.into_question(0);
  Ok(PreviewOut {
    topic: topic.clone(),
    difficulty: difficulty.unwrap_or_default(),
    question: QuestionOut::from(&question),
    answer_display: display_answer(&question.answer),
    answer: question.answer,
    explanation: question.explanation,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{AppConfig, TopicCfg};

  fn state() -> AppState {
    let mut config = AppConfig::default();
    config.topics.push(TopicCfg { grade: Grade::M3, id: "m3_statistics".into(), name: "標本調査".into() });
    AppState::new(config)
  }

  #[tokio::test]
  async fn count_must_be_allowed() {
    let s = state();
    let r = start_quiz(&s, "g4_division", 7, None).await;
    assert!(matches!(r, Err(QuizError::InvalidQuestionCount { count: 7, .. })));
    let r = start_quiz(&s, "h1_calculus", 10, None).await;
    assert!(matches!(r, Err(QuizError::UnknownTopic(_))));
  }

  #[tokio::test]
  async fn full_round_trip() {
    let s = state();
    let started = start_quiz(&s, "m1_int_addition", 10, Some(Difficulty::Basic)).await.unwrap();
    assert_eq!(started.questions.len(), 10);
    assert!(!started.not_ready);
    let id = started.session_id;
    for i in 0..10 {
      let fb = skip_question(&s, &id).await.unwrap();
      assert!(fb.answer.is_some());
      let next = next_question(&s, &id).await.unwrap();
      assert_eq!(next.complete, i == 9);
    }
    let result = finish_quiz(&s, &id).await.unwrap();
    assert_eq!(result.total, 10);
    assert_eq!(result.score, 0);
    assert_eq!(history(&s).await.len(), 1);
    assert!(matches!(finish_quiz(&s, &id).await, Err(QuizError::UnknownSession(_))));
  }

  #[tokio::test]
  async fn configured_topic_without_generator_is_placeholder() {
    let s = state();
    let started = start_quiz(&s, "m3_statistics", 10, None).await.unwrap();
    assert!(started.not_ready);
    assert_eq!(started.questions.len(), 1);
    assert_eq!(started.questions[0].id, -1);
    let r = submit_answer(&s, &started.session_id, "1").await;
    assert!(matches!(r, Err(QuizError::NotReady)));
    let result = finish_quiz(&s, &started.session_id).await.unwrap();
    assert_eq!(result.total, 0);
    assert!(history(&s).await.is_empty());
    assert!(matches!(preview(&s, "m3_statistics", None), Err(QuizError::NotReady)));
  }

  #[test]
  fn check_reports_normalized_forms() {
    let out = check_answer("７８．５ｃｍ²", "78.5");
    assert!(out.correct);
    assert_eq!(out.normalized_answer, "78.5");
    assert!(!check_answer("", "").correct);
  }

  #[test]
  fn topics_filter_by_grade() {
    let s = state();
    let m3 = list_topics(&s, Some(Grade::M3));
    assert_eq!(m3.len(), 9);
    assert!(m3.iter().any(|t| t.id == "m3_statistics" && !t.ready));
    assert_eq!(list_topics(&s, None).len(), 56);
    assert_eq!(list_grades(&s).grades[0].topic_count, 7);
  }

  #[test]
  fn preview_reveals_answer() {
    let s = state();
    let p = preview(&s, "m3_factorization_basic", Some(Difficulty::Basic)).unwrap();
    assert!(p.answer.starts_with("(x+"));
    assert_eq!(p.difficulty, Difficulty::Basic);
  }
}
