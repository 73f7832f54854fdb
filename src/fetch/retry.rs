//! Bounded retry around JSON downloads.
//!
//! The public weather APIs rate limit aggressively and drop requests now and then, so
//! every download waits a little before going out, and a failed one is retried after
//! an escalating pause. Exhausting the attempts is reported as a transport failure; a
//! body that does not decode is reported as a parse failure straight away.

use crate::fetch::error::FetchError;
use crate::fetch::http_source::HttpSource;
use bon::Builder;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// How often and how patiently a download is attempted.
///
/// ```
/// use lt_weather_parsers::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder().attempts(5).build();
/// assert_eq!(policy.attempts(), 5);
/// assert_eq!(policy.pre_fetch_delay(), Duration::from_millis(300));
/// assert_eq!(policy.backoff_after(2), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct RetryPolicy {
    #[builder(default = 3)]
    attempts: u32,
    #[builder(default = Duration::from_millis(300))]
    pre_fetch_delay: Duration,
    #[builder(default = Duration::from_secs(30))]
    backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    pub fn pre_fetch_delay(&self) -> Duration {
        self.pre_fetch_delay
    }

    /// Pause after the given (1-based) failed attempt.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Downloads and decodes JSON documents through an [`HttpSource`].
#[derive(Clone)]
pub struct JsonFetcher {
    source: Arc<dyn HttpSource>,
    policy: RetryPolicy,
}

impl JsonFetcher {
    pub fn new(source: Arc<dyn HttpSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches `url` and decodes the body as `T`, retrying transport failures.
    pub async fn fetch_json_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, FetchError> {
        let attempts = self.policy.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            tokio::time::sleep(self.policy.pre_fetch_delay()).await;

            match self.source.get_text(url).await {
                Ok(body) => {
                    debug!("Fetched {} on attempt {}/{}", url, attempt, attempts);
                    return serde_json::from_str::<T>(&body).map_err(|source| {
                        FetchError::JsonParse {
                            url: url.to_string(),
                            source,
                        }
                    });
                }
                Err(e) => {
                    warn!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        let pause = self.policy.backoff_after(attempt);
                        debug!("Waiting {:?} before retrying {}", pause, url);
                        tokio::time::sleep(pause).await;
                    }
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| FetchError::EmptyResponse(url.to_string())),
            ),
        })
    }
}
