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

mod host;
mod schema;

pub use host::{API_URL_ENV, ApiUrlSource, ConfigHost, ResolvedApiUrl, resolve_api_base_url};
pub use schema::{Config, ConfigError, LoggingConfig, SiteConfig, WidgetSettings};
