//! Application state: configuration, topic catalog, live quiz sessions and
//! the finished-results history.
//!
//! This module owns:
//!   - the loaded `AppConfig` (or defaults)
//!   - the catalog (built-in curriculum plus configured extras)
//!   - sessions by id (UUID v4), bounded by age and count
//!   - a bounded history of finished quizzes, newest first

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::{load_app_config_from_env, AppConfig};
use crate::domain::QuizResult;
use crate::error::QuizError;
use crate::quiz::QuizSession;

pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
    sessions: RwLock<SessionTable>,
    history: RwLock<VecDeque<QuizResult>>,
}

struct LiveSession {
    session: QuizSession,
    /// Insertion order, used to pick the oldest.
    seq: u64,
    stored_at: Instant,
}

#[derive(Default)]
struct SessionTable {
    entries: HashMap<String, LiveSession>,
    next_seq: u64,
}

impl SessionTable {
    /// Drop sessions stored at least `ttl` ago. Returns how many went.
    fn expire(&mut self, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, live| live.stored_at.elapsed() < ttl);
        before - self.entries.len()
    }

    /// Evict the oldest sessions until one more fits under `cap`.
    fn make_room(&mut self, cap: usize) -> usize {
        let mut evicted = 0;
        while !self.entries.is_empty() && self.entries.len() >= cap {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, live)| live.seq)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    self.entries.remove(&id);
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }
}

impl AppState {
    /// Build state from `KEISAN_CONFIG_PATH`, falling back to defaults.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let config = load_app_config_from_env().unwrap_or_default();
        Self::new(config)
    }

    pub fn new(config: AppConfig) -> Self {
        let catalog = Catalog::builtin().with_extra(&config.topics);
        info!(
            target: "keisan_backend",
            topics = catalog.len(),
            extra = config.topics.len(),
            max_attempts = config.quiz.max_attempts,
            max_history = config.quiz.max_history,
            "Catalog ready"
        );
        Self {
            config,
            catalog,
            sessions: RwLock::new(SessionTable::default()),
            history: RwLock::new(VecDeque::new()),
        }
    }

    /// Store a new session and return its id. Expired sessions are dropped
    /// first, then the oldest ones while the table is at `max_sessions`.
    #[instrument(level = "debug", skip(self, session), fields(topic = %session.topic().id))]
    pub async fn insert_session(&self, session: QuizSession) -> String {
        let id = Uuid::new_v4().to_string();
        let settings = &self.config.quiz;
        let mut sessions = self.sessions.write().await;
        let expired = sessions.expire(Duration::from_secs(settings.session_ttl_secs));
        let evicted = sessions.make_room(settings.max_sessions);
        if expired + evicted > 0 {
            info!(target: "quiz", expired, evicted, live = sessions.entries.len(), "Sessions evicted");
        }
        let seq = sessions.next_seq;
        sessions.next_seq += 1;
        sessions
            .entries
            .insert(id.clone(), LiveSession { session, seq, stored_at: Instant::now() });
        debug!(target: "quiz", session = %id, "Session stored");
        id
    }

    /// Run `f` against the session under the write lock.
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut QuizSession) -> Result<T, QuizError>,
    ) -> Result<T, QuizError> {
        let mut sessions = self.sessions.write().await;
        let live = sessions
            .entries
            .get_mut(id)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;
        f(&mut live.session)
    }

    /// Finish the session, drop it from the live set and record the result.
    /// Placeholder sessions leave no history entry.
    #[instrument(level = "debug", skip(self))]
    pub async fn finish_session(&self, id: &str) -> Result<QuizResult, QuizError> {
        let result = {
            let mut sessions = self.sessions.write().await;
            let live = sessions
                .entries
                .get_mut(id)
                .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;
            let result = live.session.finish()?;
            sessions.entries.remove(id);
            result
        };
        if !result.results.is_empty() {
            self.record_result(result.clone()).await;
        }
        Ok(result)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.entries.len()
    }

    async fn record_result(&self, result: QuizResult) {
        let cap = self.config.quiz.max_history;
        let mut history = self.history.write().await;
        history.push_front(result);
        history.truncate(cap);
    }

    /// Finished results, newest first.
    pub async fn history(&self) -> Vec<QuizResult> {
        self.history.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Grade, Question, Topic};

    fn one_question_session(answer: &str) -> QuizSession {
        let q = Question {
            id: 0,
            text: "1 + 1 = ?".into(),
            answer: answer.into(),
            explanation: "1 + 1 = 2".into(),
            figure: None,
        };
        QuizSession::new(
            Topic::new("g4_addition_subtraction", "たし算・ひき算"),
            Grade::G4,
            None,
            vec![q],
            3,
        )
    }

    #[tokio::test]
    async fn unknown_session_is_reported() {
        let state = AppState::new(AppConfig::default());
        let r = state.with_session("nope", |s| s.skip()).await;
        assert!(matches!(r, Err(QuizError::UnknownSession(_))));
    }

    #[tokio::test]
    async fn history_is_capped_newest_first() {
        let mut config = AppConfig::default();
        config.quiz.max_history = 2;
        let state = AppState::new(config);
        for answer in ["2", "3", "4"] {
            let id = state.insert_session(one_question_session(answer)).await;
            state.with_session(&id, |s| s.skip()).await.unwrap();
            state.finish_session(&id).await.unwrap();
        }
        let history = state.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].results[0].question.answer, "4");
        assert_eq!(history[1].results[0].question.answer, "3");
        assert_eq!(state.session_count().await, 0);
    }

    #[tokio::test]
    async fn incomplete_session_stays_live() {
        let state = AppState::new(AppConfig::default());
        let id = state.insert_session(one_question_session("2")).await;
        let r = state.finish_session(&id).await;
        assert!(matches!(r, Err(QuizError::Incomplete { remaining: 1 })));
        assert_eq!(state.session_count().await, 1);
    }

    #[tokio::test]
    async fn oldest_session_is_evicted_at_capacity() {
        let mut config = AppConfig::default();
        config.quiz.max_sessions = 2;
        let state = AppState::new(config);
        let first = state.insert_session(one_question_session("2")).await;
        let second = state.insert_session(one_question_session("3")).await;
        let third = state.insert_session(one_question_session("4")).await;
        assert_eq!(state.session_count().await, 2);
        let r = state.with_session(&first, |s| s.skip()).await;
        assert!(matches!(r, Err(QuizError::UnknownSession(_))));
        assert!(state.with_session(&second, |s| s.skip()).await.is_ok());
        assert!(state.with_session(&third, |s| s.skip()).await.is_ok());
    }

    #[tokio::test]
    async fn expired_sessions_are_dropped_on_insert() {
        let mut config = AppConfig::default();
        config.quiz.session_ttl_secs = 0;
        let state = AppState::new(config);
        let stale = state.insert_session(one_question_session("2")).await;
        let fresh = state.insert_session(one_question_session("3")).await;
        assert_eq!(state.session_count().await, 1);
        assert!(matches!(
            state.finish_session(&stale).await,
            Err(QuizError::UnknownSession(_))
        ));
        assert!(state.with_session(&fresh, |s| s.skip()).await.is_ok());
    }
}
