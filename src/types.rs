//! Common types and data structures

use serde::Deserialize;

/// Visual category of a rendered message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Warning,
    Success,
    Error,
}

/// What the transport hands back for any completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }
}

/// Per-emotion scores returned alongside a successful analysis
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmotionScores {
    pub anger: Option<f64>,
    pub disgust: Option<f64>,
    pub fear: Option<f64>,
    pub joy: Option<f64>,
    pub sadness: Option<f64>,
    pub dominant_emotion: Option<String>,
}

impl EmotionScores {
    /// Scores in display order, skipping emotions the backend left null
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("anger", self.anger),
            ("disgust", self.disgust),
            ("fear", self.fear),
            ("joy", self.joy),
            ("sadness", self.sadness),
        ]
        .into_iter()
        .filter_map(|(name, score)| score.map(|s| (name, s)))
        .collect()
    }
}

/// Why a dispatch ended without an analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// 200 with a body that is not usable JSON
    Parse,
    /// Error status carrying a server-supplied message
    Server(String),
    /// Error status with an unparseable body; holds the status text
    Status(String),
    /// Any other non-200 result, including network failures
    Unprocessed,
}

/// Typed result of one dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    EmptyInput,
    Analyzed {
        message: String,
        emotions: Option<EmotionScores>,
    },
    Failed(Failure),
}

impl Outcome {
    /// The single message this outcome renders as
    pub fn message(&self) -> (MessageKind, String) {
        use crate::constants::*;

        match self {
            Outcome::EmptyInput => (MessageKind::Warning, MSG_EMPTY_INPUT.to_string()),
            Outcome::Analyzed { message, .. } => (MessageKind::Success, message.clone()),
            Outcome::Failed(Failure::Parse) => (MessageKind::Error, MSG_PARSE_ERROR.to_string()),
            Outcome::Failed(Failure::Server(text)) => (MessageKind::Error, text.clone()),
            Outcome::Failed(Failure::Status(status_text)) => {
                (MessageKind::Error, format!("Error: {}", status_text))
            }
            Outcome::Failed(Failure::Unprocessed) => {
                (MessageKind::Error, MSG_UNPROCESSED.to_string())
            }
        }
    }
}
