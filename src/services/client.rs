//! Blocking HTTP client for the work-log server
//!
//! Fetch calls run on background threads, never on the event-loop
//! thread, so the blocking reqwest client is the right shape here.

use reqwest::blocking::Response;
use reqwest::StatusCode;

use crate::types::{LogEntry, LogQuery, Result, TimegridError};

/// API version prefix used by the server
const API_VERSION: &str = "v1";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the work-log server's read endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Create a client for the given server base URL
    pub fn new(server: &str) -> Result<Self> {
        let base = server.trim_end_matches('/').to_string();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(TimegridError::Config(format!(
                "server URL must start with http:// or https://: {}",
                server
            )));
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TimegridError::Config(e.to_string()))?;
        Ok(Self { base, http })
    }

    /// Fetch one page of logs matching the query
    pub fn list_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let url = format!("{}/api/{}/log/list", self.base, API_VERSION);
        let response = self
            .http
            .get(&url)
            .query(&query.params())
            .send()
            .map_err(|e| TimegridError::Network(e.to_string()))?;
        Self::decode(Self::check_status(response)?)
    }

    /// Fetch the currently active log, if any
    pub fn active_log(&self) -> Result<Option<LogEntry>> {
        let url = format!("{}/api/{}/log/active", self.base, API_VERSION);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| TimegridError::Network(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(Self::check_status(response)?).map(Some)
    }

    /// Surface the response body on non-2xx statuses; the server puts
    /// the failure reason there.
    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(TimegridError::Network(format!("{}: {}", status, body)))
    }

    fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .map_err(|e| TimegridError::Decode(e.to_string()))
    }
}
