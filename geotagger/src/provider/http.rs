//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::StatusCode;

use super::types::ProviderError;

/// User agent sent with every tile request.
///
/// Public tile servers require clients to identify themselves.
pub const DEFAULT_USER_AGENT: &str = "Geotagger/1.0";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// Returns the response body on 200 OK; any other status is an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default user agent and timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_settings(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with a custom user agent and timeout.
    pub fn with_settings(user_agent: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
    }
}
