use crate::stations::error::LocateStationError;
use crate::weather_data::error::IngestError;
use thiserror::Error;

/// Why a single parser run produced no data.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error(transparent)]
    LocateStation(#[from] LocateStationError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidParam { key: String, value: String },
}
