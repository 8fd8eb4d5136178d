#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use async_trait::async_trait;

pub mod endpoint;
pub mod error;
pub mod message;
pub mod wire;

pub use endpoint::{ASK_PATH, ApiBaseUrl, DEFAULT_API_BASE_URL, HEALTH_PATH};
pub use error::AskError;
pub use message::{ConversationState, Message, Sender};
pub use wire::{AnswerBody, AskRequest, AskResponse, HealthReport};

/// `tracing` target for failure detail that must never reach the end user.
pub const DIAGNOSTICS_TARGET: &str = "bookchat::diagnostics";

/// Outbound half of the question-answering contract.
///
/// The dispatcher decides *where* to send (it owns endpoint derivation);
/// implementations only move bytes and classify what came back.
#[async_trait]
pub trait AskTransport: Send + Sync {
    async fn post_question(&self, url: &str, request: &AskRequest)
    -> Result<AskResponse, AskError>;

    async fn get_health(&self, url: &str) -> Result<HealthReport, AskError>;
}

#[async_trait]
impl<T: AskTransport + ?Sized> AskTransport for std::sync::Arc<T> {
    async fn post_question(
        &self,
        url: &str,
        request: &AskRequest,
    ) -> Result<AskResponse, AskError> {
        (**self).post_question(url, request).await
    }

    async fn get_health(&self, url: &str) -> Result<HealthReport, AskError> {
        (**self).get_health(url).await
    }
}

/// Render-layer hook, called synchronously after every store mutation.
pub trait ConversationObserver: Send + Sync {
    fn on_change(&self, state: &ConversationState);
}

impl<F> ConversationObserver for F
where
    F: Fn(&ConversationState) + Send + Sync,
{
    fn on_change(&self, state: &ConversationState) {
        self(state);
    }
}

/// The page or framework embedding the widget.
///
/// Only `api_base_url` is read by the engine, once, at construction.
/// Mount and unmount belong to the host; the defaults do nothing so that
/// headless hosts (tests, scripts) need not care.
pub trait HostAdapter: Send + Sync {
    /// Base URL configured by the host, or `None` to use the default origin.
    fn api_base_url(&self) -> Option<String>;

    fn mount(&self, _state: &ConversationState) {}

    fn unmount(&self) {}
}
