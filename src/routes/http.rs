//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; failures map to JSON error bodies via `QuizError`.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::QuizError;
use crate::protocol::*;
use crate::quiz::Feedback;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_grades(State(state): State<Arc<AppState>>) -> Json<GradesOut> {
  Json(list_grades(&state))
}

#[instrument(level = "info", skip(state), fields(grade = ?q.grade))]
pub async fn http_get_topics(
  State(state): State<Arc<AppState>>,
  Query(q): Query<TopicsQuery>,
) -> Json<Vec<TopicOut>> {
  Json(list_topics(&state, q.grade))
}

#[instrument(level = "info", skip(state, body), fields(topic_id = %body.topic_id, count = body.count))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartQuizIn>,
) -> Result<Json<QuizStartedOut>, QuizError> {
  let quiz = start_quiz(&state, &body.topic_id, body.count, body.difficulty).await?;
  info!(target: "quiz", session = %quiz.session_id, questions = quiz.questions.len(), "HTTP quiz started");
  Ok(Json(quiz))
}

#[instrument(level = "info", skip(state, body), fields(%id, answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<Feedback>, QuizError> {
  let feedback = submit_answer(&state, &id, &body.answer).await?;
  info!(target: "quiz", session = %id, correct = feedback.correct, resolved = feedback.resolved, "HTTP answer evaluated");
  Ok(Json(feedback))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_skip(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Feedback>, QuizError> {
  Ok(Json(skip_question(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_next(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<NextOut>, QuizError> {
  Ok(Json(next_question(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_finish(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuizResultOut>, QuizError> {
  let result = finish_quiz(&state, &id).await?;
  info!(target: "quiz", session = %id, score = result.score, "HTTP quiz finished");
  Ok(Json(result))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_history(State(state): State<Arc<AppState>>) -> Json<Vec<QuizResultOut>> {
  Json(history(&state).await)
}

#[instrument(level = "info", skip(body), fields(answer_len = body.answer.len()))]
pub async fn http_post_check(Json(body): Json<CheckIn>) -> Json<CheckOut> {
  Json(check_answer(&body.answer, &body.expected))
}

#[instrument(level = "info", skip(state), fields(topic_id = %q.topic_id))]
pub async fn http_get_preview(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PreviewQuery>,
) -> Result<Json<PreviewOut>, QuizError> {
  Ok(Json(preview(&state, &q.topic_id, q.difficulty)?))
}
