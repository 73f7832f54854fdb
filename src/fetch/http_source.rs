use crate::fetch::error::FetchError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("lt_weather_parsers/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw response bodies for a URL.
///
/// Parsers never talk to the network directly; they go through this trait so the
/// upstream can be swapped for a recorded or scripted one.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Returns the body of a successful response. An empty body counts as
    /// [`FetchError::EmptyResponse`].
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`HttpSource`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::NetworkRequest("<client setup>".to_string(), e))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyResponse(url.to_string()));
        }
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
