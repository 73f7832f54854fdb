//! Response shapes and requests of the api.meteo.lt v1 REST API.

use crate::fetch::error::FetchError;
use crate::fetch::retry::JsonFetcher;
use crate::types::station::{LatLon, Station};
use log::{debug, error, info};
use reqwest::Url;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.meteo.lt/v1";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for LatLon {
    fn from(c: Coordinates) -> Self {
        LatLon(c.latitude, c.longitude)
    }
}

/// Entry of `GET /places`. The list carries no coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSummary {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /places/{code}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetail {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    pub coordinates: Coordinates,
}

/// Entry of `GET /stations`, coordinates included.
#[derive(Debug, Clone, Deserialize)]
pub struct StationSummary {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub forecast_timestamps: Vec<ForecastTimestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastTimestamp {
    pub forecast_time_utc: String,
    pub air_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Percent.
    pub cloud_cover: Option<f64>,
    /// Hectopascal.
    pub sea_level_pressure: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub total_precipitation: Option<f64>,
    pub condition_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservationsResponse {
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    pub observation_time_utc: String,
    pub air_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Millimeters over the hour ending at the observation time.
    pub precipitation: Option<f64>,
}

/// Thin request layer over [`JsonFetcher`] for one meteo.lt deployment.
#[derive(Clone)]
pub struct MeteoLtClient {
    fetcher: JsonFetcher,
    base_url: String,
}

impl MeteoLtClient {
    pub fn new(fetcher: JsonFetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/{segments...}` with every segment percent-encoded, so a code can never
    /// step outside its own path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<String, FetchError> {
        let invalid = |reason: String| FetchError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("not a hierarchical URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    pub async fn list_places(&self) -> Result<Vec<PlaceSummary>, FetchError> {
        let url = self.endpoint(&["places"])?;
        self.fetcher.fetch_json_with_retry(&url).await
    }

    pub async fn place(&self, code: &str) -> Result<PlaceDetail, FetchError> {
        let url = self.endpoint(&["places", code])?;
        self.fetcher.fetch_json_with_retry(&url).await
    }

    /// Lists every forecast place with its coordinates. The list endpoint has no
    /// coordinates, so each place is looked up on its own; places whose lookup fails
    /// are left out.
    pub async fn place_candidates(&self) -> Result<Vec<Station<String>>, FetchError> {
        let places = self.list_places().await?;
        info!("meteo.lt lists {} places, looking up their coordinates", places.len());

        let mut stations = Vec::with_capacity(places.len());
        for place in places {
            match self.place(&place.code).await {
                Ok(detail) => {
                    let mut station = Station::new(detail.code, detail.coordinates.into());
                    if let Some(name) = detail.name.or(place.name) {
                        station = station.with_name(name);
                    }
                    stations.push(station);
                }
                Err(e) => error!("Failed to get meteo.lt place \"{}\": {}", place.code, e),
            }
        }
        debug!("{} places have coordinates", stations.len());
        Ok(stations)
    }

    pub async fn forecast(&self, place_code: &str) -> Result<ForecastResponse, FetchError> {
        let url = self.endpoint(&["places", place_code, "forecasts", "long-term"])?;
        self.fetcher.fetch_json_with_retry(&url).await
    }

    pub async fn station_candidates(&self) -> Result<Vec<Station<String>>, FetchError> {
        let url = self.endpoint(&["stations"])?;
        let stations: Vec<StationSummary> = self.fetcher.fetch_json_with_retry(&url).await?;
        Ok(stations
            .into_iter()
            .map(|s| {
                let station = Station::new(s.code, s.coordinates.into());
                match s.name {
                    Some(name) => station.with_name(name),
                    None => station,
                }
            })
            .collect())
    }

    pub async fn observations(&self, station_code: &str) -> Result<ObservationsResponse, FetchError> {
        let url = self.endpoint(&["stations", station_code, "observations", "latest"])?;
        self.fetcher.fetch_json_with_retry(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::retry::RetryPolicy;
    use crate::fetch::testing::ScriptedSource;
    use std::sync::Arc;

    fn client(base_url: &str) -> MeteoLtClient {
        let fetcher = JsonFetcher::new(Arc::new(ScriptedSource::new()), RetryPolicy::default());
        MeteoLtClient::new(fetcher, base_url)
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let client = client("https://api.meteo.lt/v1/");
        assert_eq!(
            client.endpoint(&["places", "vilnius", "forecasts", "long-term"]).unwrap(),
            "https://api.meteo.lt/v1/places/vilnius/forecasts/long-term"
        );
    }

    #[test]
    fn codes_cannot_escape_their_segment() {
        let client = client("https://api.meteo.lt/v1");
        assert_eq!(
            client.endpoint(&["stations", "a/b?c#d", "observations", "latest"]).unwrap(),
            "https://api.meteo.lt/v1/stations/a%2Fb%3Fc%23d/observations/latest"
        );
    }

    #[test]
    fn unusable_base_url_is_reported() {
        let err = client("not a url").endpoint(&["places"]).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
