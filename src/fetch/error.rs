use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cannot build a request URL from '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No data returned from {0}")]
    EmptyResponse(String),

    #[error("Giving up on {url} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    #[error("Failed to parse JSON data from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// True when nothing usable came back from the upstream.
    pub fn is_transport(&self) -> bool {
        !self.is_parse()
    }

    /// True when a body was received but could not be decoded.
    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::JsonParse { .. })
    }
}
