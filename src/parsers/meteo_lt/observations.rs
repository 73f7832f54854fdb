use crate::error::ParserError;
use crate::fetch::retry::JsonFetcher;
use crate::host::params::{Params, NEAREST_STATION_CODE};
use crate::parsers::meteo_lt::api::{MeteoLtClient, Observation, DEFAULT_BASE_URL};
use crate::parsers::{parse_utc, ParserContext, ParserInfo, WeatherParser};
use crate::stations::error::LocateStationError;
use crate::stations::locate_station::StationLocator;
use crate::types::measurement::Measurement;
use crate::types::station::LatLon;
use crate::weather_data::error::IngestError;
use crate::weather_data::rain_accumulator::{accumulate_daily_rain, RainReading, RainSample};
use async_trait::async_trait;
use bon::Builder;
use chrono::{FixedOffset, Local};
use log::{debug, error, info};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MeteoLtObservationConfig {
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,
    #[builder(default = 20.0)]
    pub max_distance_km: f64,
    /// Offset used to decide where a day starts. Defaults to the host's local timezone.
    pub local_offset: Option<FixedOffset>,
}

impl Default for MeteoLtObservationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Observed temperature, wind and rain since local midnight from the nearest meteo.lt
/// automatic weather station.
pub struct MeteoLtObservationParser {
    info: ParserInfo,
    config: MeteoLtObservationConfig,
    client: MeteoLtClient,
}

impl MeteoLtObservationParser {
    pub fn new(fetcher: JsonFetcher, config: MeteoLtObservationConfig) -> Self {
        let client = MeteoLtClient::new(fetcher, &config.base_url);
        Self {
            info: ParserInfo {
                name: "meteo.lt observations",
                description: "Observed weather from meteo.lt automatic weather stations",
                forecast: false,
                historical: true,
                interval: Duration::from_secs(3600),
                station_param: NEAREST_STATION_CODE,
            },
            config,
            client,
        }
    }
}

#[async_trait]
impl WeatherParser for MeteoLtObservationParser {
    fn info(&self) -> &ParserInfo {
        &self.info
    }

    fn default_params(&self) -> Params {
        Params::new().with(NEAREST_STATION_CODE, "")
    }

    async fn locate(&self, location: LatLon, _params: &Params) -> Result<String, ParserError> {
        let stations = self.client.station_candidates().await.map_err(|e| {
            error!("Failed to get meteo.lt stations: {}", e);
            LocateStationError::from(e)
        })?;
        let resolved = StationLocator::new(self.config.max_distance_km)
            .resolve_nearest(location, &stations)?;
        Ok(resolved.id)
    }

    async fn perform(&self, ctx: &mut ParserContext<'_>) -> Result<Vec<Measurement>, ParserError> {
        let cached = ctx.params.get(NEAREST_STATION_CODE).map(str::to_string);
        let station_code = match cached {
            Some(code) => code,
            None => {
                info!("Nearest meteo.lt station is not set yet, trying to find one...");
                let code = self.locate(ctx.location, ctx.params).await.map_err(|e| {
                    error!(
                        "Failed to find nearest station, please recheck the coordinates {}: {}",
                        ctx.location, e
                    );
                    e
                })?;
                ctx.params.set(NEAREST_STATION_CODE, code.clone());
                code
            }
        };

        let response = self
            .client
            .observations(&station_code)
            .await
            .map_err(IngestError::from)?;
        let measurements = translate_observations(&response.observations, self.config.local_offset)?;
        info!(
            "Translated {} observations of '{}' into {} values",
            response.observations.len(),
            station_code,
            measurements.len()
        );
        Ok(measurements)
    }
}

/// Feeds hourly observations through the daily rain accumulator. Each observation's
/// precipitation is the amount of the hour ending at it and counts toward that
/// observation's local day. Observations without a precipitation figure are left out.
pub fn translate_observations(
    observations: &[Observation],
    local_offset: Option<FixedOffset>,
) -> Result<Vec<Measurement>, IngestError> {
    let mut samples = Vec::with_capacity(observations.len());
    for observation in observations {
        let utc = parse_utc(&observation.observation_time_utc)?;
        let Some(amount) = observation.precipitation else {
            debug!("Observation at {} has no precipitation, skipped", utc);
            continue;
        };
        let local_time = match local_offset {
            Some(offset) => utc.with_timezone(&offset).naive_local(),
            None => utc.with_timezone(&Local).naive_local(),
        };
        samples.push(RainSample {
            timestamp: utc.timestamp(),
            local_time,
            rain: amount,
            temperature: observation.air_temperature,
            wind_speed: observation.wind_speed,
        });
    }
    Ok(accumulate_daily_rain(samples, RainReading::Amount))
}
