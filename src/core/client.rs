// src/core/client.rs

use std::future::Future;

use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::core::error::{ConfigError, TransportError};
use crate::core::models::ScanConfiguration;

/// Path of the combined scan endpoint, relative to the service base URL.
pub const SCAN_PATH: &str = "scan/combined";

/// A completed HTTP exchange: the status and the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET and hands back whatever came back.
///
/// Non-success statuses are returned as normal responses; only failures to get a
/// response at all are errors here. No timeout is imposed beyond the underlying
/// client's defaults.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &Url) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport used by the application.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fastscan-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client.");
                TransportError::Unreachable(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        info!(url = %url, "Sending scan request.");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Scan request failed.");
            TransportError::Unreachable(e.to_string())
        })?;

        let status = response.status().as_u16();
        info!(status, "Received scan response.");
        let body = response.text().await.map_err(|e| {
            error!(status, error = %e, "Failed to read scan response body.");
            TransportError::Unreachable(format!("failed to read response body: {e}"))
        })?;
        debug!(status, bytes = body.len(), "Read scan response body.");
        Ok(RawResponse { status, body })
    }
}

/// Checks that the configured base URL can have the scan path joined onto it.
pub fn validate_endpoint(base: &Url) -> Result<(), ConfigError> {
    if base.cannot_be_a_base() {
        return Err(ConfigError::EndpointNotABase(base.to_string()));
    }
    Ok(())
}

/// Builds `GET {base}/scan/combined?target=..&mode=..&crawl=..&use_llm=..&pdf=..`.
///
/// Flags are rendered as the literal strings `true` / `false`.
pub fn build_scan_url(base: &Url, config: &ScanConfiguration) -> Result<Url, ConfigError> {
    validate_endpoint(base)?;

    // Make sure the base is treated as a directory so the path is appended, not substituted.
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let mut url = base.join(SCAN_PATH).map_err(|source| ConfigError::InvalidEndpoint {
        value: base.to_string(),
        source,
    })?;

    url.query_pairs_mut()
        .clear()
        .append_pair("target", &config.target)
        .append_pair("mode", &config.mode.to_string())
        .append_pair("crawl", bool_flag(config.crawl))
        .append_pair("use_llm", bool_flag(config.use_llm))
        .append_pair("pdf", bool_flag(config.export_report));
    Ok(url)
}

fn bool_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Turns a non-success response into a transport error, picking up the
/// service's `{"error": "..."}` or `{"detail": "..."}` body when there is one.
pub fn status_error(response: &RawResponse) -> TransportError {
    let detail = serde_json::from_str::<Value>(&response.body).ok().and_then(|body| {
        ["error", "detail"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str).map(str::to_string))
    });
    TransportError::Status { status: response.status, detail }
}
