use crate::fetch::error::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to retrieve the time series")]
    Fetch(#[from] FetchError),

    #[error("No translation for condition code '{code}'")]
    UnknownCondition { code: String },

    #[error("Unparseable timestamp '{value}'")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
