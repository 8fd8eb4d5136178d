use thiserror::Error;

/// Why a dispatched question produced no answer.
///
/// Every variant is handled the same way for the visitor (one fallback
/// message); the variant and its detail only go to diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    /// DNS, refused connection, timeout, or an unreadable body.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("server failure: HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The widget was unmounted, or the caller dropped the request.
    #[error("request aborted")]
    Aborted,
}

impl AskError {
    /// Short label used as a structured logging field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Aborted => "aborted",
        }
    }
}
