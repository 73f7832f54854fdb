use crate::fetch::error::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateStationError {
    #[error("No qualifying station among {listed} listed candidates")]
    NoCandidates { listed: usize },

    #[error("Nearest station {id} is {distance_km:.1} km away, farther than the {max_distance_km} km limit")]
    TooFar {
        id: String,
        distance_km: f64,
        max_distance_km: f64,
    },

    #[error("Failed to retrieve the station list")]
    Fetch(#[from] FetchError),
}
