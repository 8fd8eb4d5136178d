//! JSON bodies exchanged with the question-answering backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AskError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Success body as sent by the backend, before validation.
///
/// Older backends answer under `response` and cite under `sources`;
/// both spellings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerBody {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub source_chunks: Option<Vec<Value>>,
    #[serde(default)]
    pub sources: Option<Vec<Value>>,
}

/// A validated answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AskResponse {
    pub answer: String,
    /// Citation fragments; diagnostic only, never rendered.
    pub source_chunks: Vec<Value>,
}

impl AnswerBody {
    /// Pick the answer text, preferring `answer` over `response`.
    ///
    /// Blank values count as absent; a rendered message must have text.
    pub fn resolve(self) -> Result<AskResponse, AskError> {
        let non_blank = |text: &String| !text.trim().is_empty();
        let answer = self
            .answer
            .filter(non_blank)
            .or_else(|| self.response.filter(non_blank))
            .ok_or_else(|| {
                AskError::MalformedResponse("no non-empty `answer` or `response` field".to_string())
            })?;

        Ok(AskResponse {
            answer,
            source_chunks: self.source_chunks.or(self.sources).unwrap_or_default(),
        })
    }
}

impl AskResponse {
    /// Decode and validate a raw success body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AskError> {
        serde_json::from_slice::<AnswerBody>(bytes)
            .map_err(|e| AskError::MalformedResponse(format!("invalid JSON body: {e}")))?
            .resolve()
    }
}

/// Body of `GET /health`. Backends disagree on the extra fields
/// (`collections`, `vector_db_loaded`, ...), so those are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    #[serde(default = "HealthReport::unknown_status")]
    pub status: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

impl HealthReport {
    fn unknown_status() -> String {
        "unknown".to_string()
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}
