//! API base URL resolution at the host boundary.
//!
//! The engine never reads the environment itself; whatever the host picks
//! here is handed to it once, at construction.

use std::fmt;

use bookchat_core::{ApiBaseUrl, HostAdapter};
use tracing::debug;

use crate::Config;

/// Process-wide variable a host page may set instead of a config file.
pub const API_URL_ENV: &str = "RAG_CHATBOT_API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiUrlSource {
    /// Per-instance argument (`--api-url`).
    Explicit,
    /// `site.api_base_url` in the config file.
    SiteConfig,
    /// [`API_URL_ENV`].
    Environment,
    Default,
}

impl fmt::Display for ApiUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "command line",
            Self::SiteConfig => "config file",
            Self::Environment => API_URL_ENV,
            Self::Default => "default",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiUrl {
    pub url: ApiBaseUrl,
    pub source: ApiUrlSource,
}

/// Blankness is judged after normalization, so `"///"` counts as unset.
fn non_blank(value: Option<&str>) -> Option<ApiBaseUrl> {
    value
        .map(ApiBaseUrl::new)
        .filter(|url| !url.as_str().is_empty())
}

/// First non-blank candidate wins: explicit, site config, global, default.
#[must_use]
pub fn resolve_api_base_url(
    explicit: Option<&str>,
    site: Option<&str>,
    global: Option<&str>,
) -> ResolvedApiUrl {
    let candidates = [
        (non_blank(explicit), ApiUrlSource::Explicit),
        (non_blank(site), ApiUrlSource::SiteConfig),
        (non_blank(global), ApiUrlSource::Environment),
    ];

    candidates
        .into_iter()
        .find_map(|(value, source)| {
            value.map(|url| ResolvedApiUrl { url, source })
        })
        .unwrap_or_else(|| ResolvedApiUrl {
            url: ApiBaseUrl::default(),
            source: ApiUrlSource::Default,
        })
}

/// [`HostAdapter`] backed by the config file, an optional explicit URL,
/// and the process environment.
#[derive(Debug, Clone)]
pub struct ConfigHost {
    config: Config,
    explicit_url: Option<String>,
    env_url: Option<String>,
}

impl ConfigHost {
    /// Captures [`API_URL_ENV`] now, so later environment changes are ignored.
    #[must_use]
    pub fn new(config: Config, explicit_url: Option<String>) -> Self {
        Self {
            config,
            explicit_url,
            env_url: std::env::var(API_URL_ENV).ok(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn resolved(&self) -> ResolvedApiUrl {
        let resolved = resolve_api_base_url(
            self.explicit_url.as_deref(),
            self.config.site.api_base_url.as_deref(),
            self.env_url.as_deref(),
        );
        debug!("API base URL {} (from {})", resolved.url, resolved.source);
        resolved
    }
}

impl HostAdapter for ConfigHost {
    fn api_base_url(&self) -> Option<String> {
        let resolved = self.resolved();
        (resolved.source != ApiUrlSource::Default).then(|| resolved.url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_beats_everything() {
        let r = resolve_api_base_url(
            Some("http://cli:1/"),
            Some("http://site:2"),
            Some("http://env:3"),
        );
        assert_eq!(r.url.as_str(), "http://cli:1");
        assert_eq!(r.source, ApiUrlSource::Explicit);
    }

    #[test]
    fn blank_values_fall_through() {
        let r = resolve_api_base_url(Some("  "), Some(""), Some("http://env:3"));
        assert_eq!(r.url.as_str(), "http://env:3");
        assert_eq!(r.source, ApiUrlSource::Environment);
    }

    #[test]
    fn slash_only_values_fall_through() {
        let r = resolve_api_base_url(Some("///"), Some(" / "), Some("http://env:3/"));
        assert_eq!(r.source, ApiUrlSource::Environment);
        assert_eq!(r.url.ask_url(), "http://env:3/ask");
    }

    #[test]
    fn site_config_beats_global() {
        let r = resolve_api_base_url(None, Some("http://site:2"), Some("http://env:3"));
        assert_eq!(r.source, ApiUrlSource::SiteConfig);
    }

    #[test]
    fn nothing_configured_uses_default_origin() {
        let r = resolve_api_base_url(None, None, None);
        assert_eq!(r.url.ask_url(), "http://localhost:8000/ask");
        assert_eq!(r.source, ApiUrlSource::Default);
    }

    #[test]
    fn host_reports_explicit_url() {
        let host = ConfigHost::new(Config::default(), Some("http://x:8000/".to_string()));
        assert_eq!(host.api_base_url().as_deref(), Some("http://x:8000"));
    }
}
