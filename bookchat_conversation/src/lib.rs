#![warn(
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

//! Conversation session engine for the documentation chat widget.
//!
//! # Key Features
//! - Append-only message history seeded with a greeting
//! - At most one question in flight; extra submissions are dropped
//! - Every accepted question yields exactly one assistant message
//! - Abort of the in-flight question on unmount
//! - Panel visibility kept apart from conversation state

mod dispatcher;
mod store;
mod visibility;
mod widget;

pub use dispatcher::{DropReason, RequestDispatcher, SubmitOutcome};
pub use store::ConversationStore;
pub use visibility::VisibilityController;
pub use widget::{ChatWidget, WidgetConfig};
