use crate::error::ParserError;
use crate::fetch::retry::JsonFetcher;
use crate::host::params::{Params, NEAREST_STATION_ID, SKIP_STATION_IDS};
use crate::parsers::eismoinfo::api::{EismoinfoClient, RetrospectiveRecord, DEFAULT_BASE_URL};
use crate::parsers::{parse_naive, ParserContext, ParserInfo, WeatherParser};
use crate::stations::error::LocateStationError;
use crate::stations::locate_station::StationLocator;
use crate::types::measurement::Measurement;
use crate::types::station::{Capability, LatLon};
use crate::weather_data::error::IngestError;
use crate::weather_data::rain_accumulator::{accumulate_daily_rain, RainReading, RainSample};
use async_trait::async_trait;
use bon::Builder;
use log::{debug, error, info, warn};
use std::time::Duration;

/// Stations known to report bogus rain values.
pub const DEFAULT_SKIP_STATION_IDS: &str = "1164";

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const LOCAL_TIME_FORMAT_SECONDS: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct EismoinfoConfig {
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,
    #[builder(default = 20.0)]
    pub max_distance_km: f64,
    /// How many retrospective records to request per run.
    #[builder(default = 500)]
    pub history_length: u32,
}

impl Default for EismoinfoConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Temperature, wind and rain since local midnight from the nearest road weather
/// station that has a rain sensor.
pub struct EismoinfoRetrospectiveParser {
    info: ParserInfo,
    config: EismoinfoConfig,
    client: EismoinfoClient,
}

impl EismoinfoRetrospectiveParser {
    pub fn new(fetcher: JsonFetcher, config: EismoinfoConfig) -> Self {
        let client = EismoinfoClient::new(fetcher, &config.base_url);
        Self {
            info: ParserInfo {
                name: "eismoinfo.lt retrospective",
                description: "Retrospective weather data from weather stations along Lithuanian roads",
                forecast: false,
                historical: true,
                interval: Duration::from_secs(3600),
                station_param: NEAREST_STATION_ID,
            },
            config,
            client,
        }
    }
}

fn skip_list(params: &Params) -> Vec<u32> {
    params
        .get_list(SKIP_STATION_IDS)
        .into_iter()
        .filter_map(|id| match id.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring invalid entry '{}' in {}", id, SKIP_STATION_IDS);
                None
            }
        })
        .collect()
}

fn cached_station_id(params: &Params) -> Result<Option<u32>, ParserError> {
    match params.get(NEAREST_STATION_ID) {
        None => Ok(None),
        Some(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ParserError::InvalidParam {
                key: NEAREST_STATION_ID.to_string(),
                value: value.to_string(),
            }),
    }
}

#[async_trait]
impl WeatherParser for EismoinfoRetrospectiveParser {
    fn info(&self) -> &ParserInfo {
        &self.info
    }

    fn default_params(&self) -> Params {
        Params::new()
            .with(NEAREST_STATION_ID, "")
            .with(SKIP_STATION_IDS, DEFAULT_SKIP_STATION_IDS)
    }

    async fn locate(&self, location: LatLon, params: &Params) -> Result<String, ParserError> {
        let stations = self.client.station_candidates().await.map_err(|e| {
            error!("Failed to get eismoinfo.lt stations: {}", e);
            LocateStationError::from(e)
        })?;
        let resolved = StationLocator::new(self.config.max_distance_km)
            .requiring(Capability::RainSensor)
            .skipping(skip_list(params))
            .resolve_nearest(location, &stations)?;
        Ok(resolved.id.to_string())
    }

    async fn perform(&self, ctx: &mut ParserContext<'_>) -> Result<Vec<Measurement>, ParserError> {
        let station_id = match cached_station_id(ctx.params)? {
            Some(id) => id,
            None => {
                info!("eismoinfo.lt nearest station is not set yet, trying to find one...");
                let id = self.locate(ctx.location, ctx.params).await.map_err(|e| {
                    error!(
                        "Failed to find nearest station, please recheck the coordinates {}: {}",
                        ctx.location, e
                    );
                    e
                })?;
                ctx.params.set(NEAREST_STATION_ID, id.clone());
                cached_station_id(ctx.params)?.ok_or(ParserError::InvalidParam {
                    key: NEAREST_STATION_ID.to_string(),
                    value: id,
                })?
            }
        };

        let records = self
            .client
            .retrospective(station_id, self.config.history_length)
            .await
            .map_err(IngestError::from)?;
        let measurements = translate_retrospective(&records)?;
        info!(
            "Translated {} retrospective records of station {} into {} values",
            records.len(),
            station_id,
            measurements.len()
        );
        Ok(measurements)
    }
}

/// Accumulates daily rain over the retrospective series. The series comes newest first
/// and is reordered; records without a rain value are left out.
pub fn translate_retrospective(
    records: &[RetrospectiveRecord],
) -> Result<Vec<Measurement>, IngestError> {
    let mut samples = Vec::with_capacity(records.len());
    for record in records {
        let local_time = parse_naive(
            &record.surinkimo_data,
            LOCAL_TIME_FORMAT,
            &[LOCAL_TIME_FORMAT_SECONDS],
        )?;
        let Some(rate) = record.krituliu_kiekis else {
            debug!("Record at {} has no rain value, skipped", local_time);
            continue;
        };
        samples.push(RainSample {
            timestamp: record.surinkimo_data_unix,
            local_time,
            rain: rate,
            temperature: record.oro_temperatura,
            wind_speed: record.vejo_greitis_vidut,
        });
    }
    Ok(accumulate_daily_rain(samples, RainReading::Rate))
}
