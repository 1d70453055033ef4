//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::QuizError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "keisan_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "keisan_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "keisan_backend", kind = message_kind(&incoming), "WS received");
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { status: 400, message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "status": 500, "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "keisan_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "keisan_backend", "WebSocket disconnected");
}

/// Message tag for logs; submitted answers stay out of the log.
fn message_kind(msg: &ClientWsMessage) -> &'static str {
  match msg {
    ClientWsMessage::Ping => "ping",
    ClientWsMessage::StartQuiz { .. } => "start_quiz",
    ClientWsMessage::SubmitAnswer { .. } => "submit_answer",
    ClientWsMessage::Skip { .. } => "skip",
    ClientWsMessage::Next { .. } => "next",
    ClientWsMessage::Finish { .. } => "finish",
    ClientWsMessage::Check { .. } => "check",
  }
}

fn error_reply(e: QuizError) -> ServerWsMessage {
  ServerWsMessage::Error { status: e.status().as_u16(), message: e.to_string() }
}

pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartQuiz { topic_id, count, difficulty } => {
      match start_quiz(state, &topic_id, count, difficulty).await {
        Ok(quiz) => {
          info!(target: "quiz", session = %quiz.session_id, %topic_id, "WS quiz started");
          ServerWsMessage::QuizStarted { quiz }
        }
        Err(e) => error_reply(e),
      }
    }

    ClientWsMessage::SubmitAnswer { session_id, answer } => {
      match submit_answer(state, &session_id, &answer).await {
        Ok(feedback) => ServerWsMessage::AnswerResult { feedback },
        Err(e) => error_reply(e),
      }
    }

    ClientWsMessage::Skip { session_id } => match skip_question(state, &session_id).await {
      Ok(feedback) => ServerWsMessage::AnswerResult { feedback },
      Err(e) => error_reply(e),
    },

    ClientWsMessage::Next { session_id } => match next_question(state, &session_id).await {
      Ok(next) => ServerWsMessage::Next { next },
      Err(e) => error_reply(e),
    },

    ClientWsMessage::Finish { session_id } => match finish_quiz(state, &session_id).await {
      Ok(result) => ServerWsMessage::Finished { result },
      Err(e) => error_reply(e),
    },

    ClientWsMessage::Check { answer, expected } => ServerWsMessage::Check { check: check_answer(&answer, &expected) },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;

  async fn reply(state: &AppState, raw: &str) -> serde_json::Value {
    let msg: ClientWsMessage = serde_json::from_str(raw).unwrap();
    serde_json::to_value(handle_client_ws(msg, state).await).unwrap()
  }

  #[tokio::test]
  async fn ping_and_check() {
    let state = AppState::new(AppConfig::default());
    assert_eq!(reply(&state, r#"{"type":"ping"}"#).await["type"], "pong");
    let v = reply(&state, r#"{"type":"check","answer":"(x-3)(x+2)","expected":"(x+2)(x-3)"}"#).await;
    assert_eq!(v["type"], "check");
    assert_eq!(v["check"]["correct"], true);
  }

  #[tokio::test]
  async fn session_messages_round_trip() {
    let state = AppState::new(AppConfig::default());
    let v = reply(&state, r#"{"type":"start_quiz","topicId":"g4_division","count":10,"difficulty":"基礎"}"#).await;
    assert_eq!(v["type"], "quiz_started");
    assert!(v["quiz"]["questions"][0].get("answer").is_none());
    let id = v["quiz"]["sessionId"].as_str().unwrap().to_string();

    let v = reply(&state, &format!(r#"{{"type":"next","sessionId":"{id}"}}"#)).await;
    assert_eq!(v["type"], "error");
    assert_eq!(v["status"], 409);

    let v = reply(&state, &format!(r#"{{"type":"submit_answer","sessionId":"{id}","answer":""}}"#)).await;
    assert_eq!(v["status"], 400);

    let v = reply(&state, &format!(r#"{{"type":"skip","sessionId":"{id}"}}"#)).await;
    assert_eq!(v["type"], "answer_result");
    assert_eq!(v["feedback"]["skipped"], true);
  }

  #[tokio::test]
  async fn unknown_session_is_404() {
    let state = AppState::new(AppConfig::default());
    let v = reply(&state, r#"{"type":"finish","sessionId":"missing"}"#).await;
    assert_eq!(v["status"], 404);
  }
}
