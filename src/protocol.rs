//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Questions leave the server without their answers; answers are revealed
//! only through `Feedback` once a question is resolved.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Encouragement, Grade, Question, QuizResult, Topic};
use crate::figure::Figure;
use crate::quiz::{Feedback, QuizSession};
use crate::util::render_superscripts;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartQuiz {
        #[serde(rename = "topicId")]
        topic_id: String,
        count: usize,
        #[serde(default)]
        difficulty: Option<Difficulty>,
    },
    SubmitAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: String,
    },
    Skip {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Next {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Finish {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Check {
        answer: String,
        expected: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    QuizStarted {
        quiz: QuizStartedOut,
    },
    AnswerResult {
        feedback: Feedback,
    },
    Next {
        next: NextOut,
    },
    Finished {
        result: QuizResultOut,
    },
    Check {
        check: CheckOut,
    },
    Error {
        status: u16,
        message: String,
    },
}

/// Question as delivered to clients: no answer, no explanation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: i64,
    pub text: String,
    pub text_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<Figure>,
}

impl From<&Question> for QuestionOut {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            text: q.text.clone(),
            text_html: render_superscripts(&q.text),
            figure: q.figure.clone(),
        }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOut {
    pub grade: Grade,
    pub prefix: &'static str,
    pub topic_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DifficultyOut {
    pub difficulty: Difficulty,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GradesOut {
    pub grades: Vec<GradeOut>,
    pub difficulties: Vec<DifficultyOut>,
}

#[derive(Debug, Deserialize)]
pub struct TopicsQuery {
    pub grade: Option<Grade>,
}

#[derive(Debug, Serialize)]
pub struct TopicOut {
    pub grade: Grade,
    pub id: String,
    pub name: String,
    /// Whether a generator exists; other topics serve the "not ready" placeholder.
    pub ready: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuizIn {
    pub topic_id: String,
    pub count: usize,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStartedOut {
    pub session_id: String,
    pub grade: Grade,
    pub topic: Topic,
    pub difficulty: Option<Difficulty>,
    pub max_attempts: u32,
    pub not_ready: bool,
    pub questions: Vec<QuestionOut>,
}

impl QuizStartedOut {
    pub fn new(session_id: String, session: &QuizSession) -> Self {
        Self {
            session_id,
            grade: session.grade(),
            topic: session.topic().clone(),
            difficulty: session.difficulty(),
            max_attempts: session.max_attempts(),
            not_ready: session.is_not_ready(),
            questions: session.questions().iter().map(QuestionOut::from).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct AnswerIn {
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextOut {
    pub position: usize,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultOut {
    #[serde(flatten)]
    pub result: QuizResult,
    pub total: usize,
    pub correct_count: usize,
    pub score: u32,
    pub elapsed_ms: i64,
    pub encouragement: Encouragement,
    pub message: &'static str,
}

impl From<QuizResult> for QuizResultOut {
    fn from(result: QuizResult) -> Self {
        let encouragement = result.encouragement();
        Self {
            total: result.results.len(),
            correct_count: result.correct_count(),
            score: result.score(),
            elapsed_ms: result.elapsed_ms(),
            encouragement,
            message: encouragement.message(),
            result,
        }
    }
}

#[derive(Deserialize)]
pub struct CheckIn {
    pub answer: String,
    pub expected: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    pub normalized_answer: String,
    pub normalized_expected: String,
    pub correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub topic_id: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// One generated question with its answer, for practice and debugging.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOut {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub question: QuestionOut,
    pub answer: String,
    pub answer_display: String,
    pub explanation: String,
}
