//! Road weather stations of the Lithuanian Road Administration (eismoinfo.lt).

use crate::fetch::error::FetchError;
use crate::fetch::retry::JsonFetcher;
use crate::types::lenient;
use crate::types::station::{Capability, LatLon, Station};
use log::debug;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://eismoinfo.lt";

/// Entry of `GET /weather-conditions-service`, the current state of every station.
#[derive(Debug, Clone, Deserialize)]
pub struct StationReading {
    #[serde(deserialize_with = "lenient::identifier")]
    pub id: u32,
    #[serde(default, rename = "pavadinimas")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lng: f64,
    /// Null on stations without a rain sensor.
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub krituliu_kiekis: Option<f64>,
}

impl From<StationReading> for Station<u32> {
    fn from(reading: StationReading) -> Self {
        let mut station = Station::new(reading.id, LatLon(reading.lat, reading.lng));
        if let Some(name) = reading.name {
            station = station.with_name(name);
        }
        if reading.krituliu_kiekis.is_some() {
            station = station.with_capability(Capability::RainSensor);
        }
        station
    }
}

/// Entry of `GET /weather-conditions-retrospective`, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrospectiveRecord {
    /// Local wall-clock time of the reading, `2024-01-01 23:00`.
    pub surinkimo_data: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub surinkimo_data_unix: i64,
    /// Precipitation rate, mm/h.
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub krituliu_kiekis: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub oro_temperatura: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_number")]
    pub vejo_greitis_vidut: Option<f64>,
}

#[derive(Clone)]
pub struct EismoinfoClient {
    fetcher: JsonFetcher,
    base_url: String,
}

impl EismoinfoClient {
    pub fn new(fetcher: JsonFetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn stations_url(&self) -> String {
        format!("{}/weather-conditions-service", self.base_url)
    }

    pub fn retrospective_url(&self, station_id: u32, history_length: u32) -> String {
        format!(
            "{}/weather-conditions-retrospective?id={}&number={}",
            self.base_url, station_id, history_length
        )
    }

    pub async fn station_candidates(&self) -> Result<Vec<Station<u32>>, FetchError> {
        let readings: Vec<StationReading> =
            self.fetcher.fetch_json_with_retry(&self.stations_url()).await?;
        debug!("eismoinfo.lt lists {} stations", readings.len());
        Ok(readings.into_iter().map(Station::from).collect())
    }

    pub async fn retrospective(
        &self,
        station_id: u32,
        history_length: u32,
    ) -> Result<Vec<RetrospectiveRecord>, FetchError> {
        self.fetcher
            .fetch_json_with_retry(&self.retrospective_url(station_id, history_length))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_without_rain_field_has_no_rain_sensor() {
        let readings: Vec<StationReading> = serde_json::from_str(
            r#"[
                {"id": "1164", "pavadinimas": "Kryžkalnis", "lat": "55.35", "lng": 23.09, "krituliu_kiekis": "0.0"},
                {"id": 12, "lat": 54.7, "lng": "25.3", "krituliu_kiekis": null},
                {"id": 13, "lat": 54.7, "lng": 25.3}
            ]"#,
        )
        .unwrap();
        let stations: Vec<Station<u32>> = readings.into_iter().map(Station::from).collect();

        assert_eq!(stations[0].id, 1164);
        assert_eq!(stations[0].name.as_deref(), Some("Kryžkalnis"));
        assert!(stations[0].has(Capability::RainSensor));
        assert!(!stations[1].has(Capability::RainSensor));
        assert!(!stations[2].has(Capability::RainSensor));
        assert_eq!(stations[1].location, LatLon(54.7, 25.3));
    }
}
