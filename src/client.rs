//! HTTP transport for the emotion detection backend

use crate::error::{ClientError, Result};
use crate::types::RawResponse;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Issues GET requests against the backend. Any HTTP status is a successful
/// exchange; only network-level failures are errors.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn get(&self, path_and_query: &str) -> Result<RawResponse>;
}

fn client_builder(timeout: Option<Duration>) -> reqwest::ClientBuilder {
    let builder = reqwest::Client::builder();
    match timeout.filter(|t| !t.is_zero()) {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    }
}

/// Reason phrase as sent by the server, falling back to the canonical one
fn status_text(response: &reqwest::Response) -> String {
    if let Some(reason) = response.extensions().get::<hyper::ext::ReasonPhrase>() {
        return String::from_utf8_lossy(reason.as_bytes()).into_owned();
    }
    let status = response.status();
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// A zero `timeout` is treated as no timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        Self::with_builder(base_url, client_builder(timeout))
    }

    fn with_builder(base_url: &str, builder: reqwest::ClientBuilder) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = reqwest::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn get(&self, path_and_query: &str) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!(url = %url, "Sending request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let status_text = status_text(&response);
        let body = response.text().await?;

        debug!(status = %status, bytes = body.len(), "Response received");
        Ok(RawResponse::new(status.as_u16(), status_text, body))
    }
}
