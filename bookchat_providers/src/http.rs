use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use bookchat_core::{AskError, AskRequest, AskResponse, AskTransport, HealthReport};
use reqwest::{Client, Response};
use tracing::{debug, info};

/// Server error bodies can be whole HTML pages; keep diagnostics short.
const MAX_ERROR_BODY: usize = 512;

/// `reqwest`-backed [`AskTransport`]. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        info!("Creating HttpTransport (timeout={}s)", timeout.as_secs());
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Turn a non-2xx response into [`AskError::Server`].
    async fn check_status(response: Response) -> Result<Response, AskError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(AskError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

/// Flatten a `reqwest` error and its causes into one line.
fn transport_error(err: &reqwest::Error) -> AskError {
    let mut detail = if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    };

    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }

    AskError::Transport(detail)
}

#[async_trait]
impl AskTransport for HttpTransport {
    async fn post_question(
        &self,
        url: &str,
        request: &AskRequest,
    ) -> Result<AskResponse, AskError> {
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let bytes = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(|e| transport_error(&e))?;

        AskResponse::from_slice(&bytes)
    }

    async fn get_health(&self, url: &str) -> Result<HealthReport, AskError> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let bytes = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(|e| transport_error(&e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AskError::MalformedResponse(format!("invalid health body: {e}")))
    }
}
