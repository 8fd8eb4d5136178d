//! API base URL handling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin used when neither the caller nor the host configures one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const ASK_PATH: &str = "/ask";
pub const HEALTH_PATH: &str = "/health";

/// A backend origin with trailing slashes stripped.
///
/// `http://x:8000`, `http://x:8000/` and `http://x:8000//` are the same
/// value, so joining any of them with [`ASK_PATH`] yields one URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ApiBaseUrl(String);

impl ApiBaseUrl {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().trim_end_matches('/').to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append an absolute path (`"/ask"`) to the normalized base.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }

    #[must_use]
    pub fn ask_url(&self) -> String {
        self.join(ASK_PATH)
    }

    #[must_use]
    pub fn health_url(&self) -> String {
        self.join(HEALTH_PATH)
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl From<String> for ApiBaseUrl {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<ApiBaseUrl> for String {
    fn from(url: ApiBaseUrl) -> Self {
        url.0
    }
}

impl fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
