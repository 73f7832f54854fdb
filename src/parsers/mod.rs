//! The parser plugin contract and the vendor implementations.
//!
//! A parser knows how to find the upstream station nearest to the controller
//! ([`WeatherParser::locate`]) and how to turn that station's time series into
//! [`Measurement`]s ([`WeatherParser::perform`]). When and how often it runs, where its
//! parameters live and where the measurements go is up to the host.

pub mod eismoinfo;
pub mod meteo_lt;

use crate::error::ParserError;
use crate::fetch::retry::JsonFetcher;
use crate::host::params::Params;
use crate::types::measurement::Measurement;
use crate::types::station::LatLon;
use crate::weather_data::error::IngestError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::Duration;

pub use eismoinfo::retrospective::{EismoinfoConfig, EismoinfoRetrospectiveParser};
pub use meteo_lt::forecast::{MeteoLtForecastConfig, MeteoLtForecastParser};
pub use meteo_lt::observations::{MeteoLtObservationConfig, MeteoLtObservationParser};

/// Static description of a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Provides future data.
    pub forecast: bool,
    /// Provides observed data.
    pub historical: bool,
    /// How often the host should run the parser.
    pub interval: Duration,
    /// Parameter holding the resolved station identifier.
    pub station_param: &'static str,
}

/// What the host hands a parser for one run.
pub struct ParserContext<'a> {
    /// The controller's configured coordinates.
    pub location: LatLon,
    /// The parser's persisted parameters. A parser writes the identifier it resolved
    /// here; the host persists the change.
    pub params: &'a mut Params,
}

#[async_trait]
pub trait WeatherParser: Send + Sync {
    fn info(&self) -> &ParserInfo;

    /// Fresh default parameters for a new installation.
    fn default_params(&self) -> Params;

    /// Finds the nearest station for `location` and returns its identifier as stored
    /// in the parameters.
    async fn locate(&self, location: LatLon, params: &Params) -> Result<String, ParserError>;

    /// One scheduled run: resolve the station if needed, fetch and translate.
    async fn perform(&self, ctx: &mut ParserContext<'_>) -> Result<Vec<Measurement>, ParserError>;
}

/// All parsers this crate provides, sharing one fetcher.
pub fn all_parsers(fetcher: &JsonFetcher) -> Vec<Box<dyn WeatherParser>> {
    vec![
        Box::new(MeteoLtForecastParser::new(
            fetcher.clone(),
            MeteoLtForecastConfig::default(),
        )),
        Box::new(MeteoLtObservationParser::new(
            fetcher.clone(),
            MeteoLtObservationConfig::default(),
        )),
        Box::new(EismoinfoRetrospectiveParser::new(
            fetcher.clone(),
            EismoinfoConfig::default(),
        )),
    ]
}

/// Parses a wall-clock time with `format`, falling back to `alternatives` in order. The
/// error reported is the one from `format`.
pub(crate) fn parse_naive(
    value: &str,
    format: &str,
    alternatives: &[&str],
) -> Result<NaiveDateTime, IngestError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, format).or_else(|source| {
        alternatives
            .iter()
            .find_map(|alternative| NaiveDateTime::parse_from_str(value, alternative).ok())
            .ok_or_else(|| IngestError::Timestamp {
                value: value.to_string(),
                source,
            })
    })
}

/// meteo.lt style `2024-05-01 12:00:00`, always UTC.
pub(crate) fn parse_utc(value: &str) -> Result<DateTime<Utc>, IngestError> {
    parse_naive(value, "%Y-%m-%d %H:%M:%S", &["%Y-%m-%dT%H:%M:%S"]).map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_timestamps_parse() {
        assert_eq!(parse_utc("1970-01-01 01:00:00").unwrap().timestamp(), 3600);
        assert_eq!(parse_utc("2024-01-01T00:00:00").unwrap().timestamp(), 1_704_067_200);
    }

    #[test]
    fn alternative_formats_are_tried_in_order() {
        let parsed = parse_naive("2024-10-27 03:30:15", "%Y-%m-%d %H:%M", &["%Y-%m-%d %H:%M:%S"])
            .unwrap();
        assert_eq!(parsed.to_string(), "2024-10-27 03:30:15");
        assert!(parse_naive("2024-10-27", "%Y-%m-%d %H:%M", &[]).is_err());
    }

    #[test]
    fn bad_timestamp_is_reported_with_its_value() {
        match parse_utc("yesterday") {
            Err(IngestError::Timestamp { value, .. }) => assert_eq!(value, "yesterday"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
