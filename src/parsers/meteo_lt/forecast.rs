use crate::error::ParserError;
use crate::fetch::retry::JsonFetcher;
use crate::host::params::{Params, NEAREST_PLACE_CODE};
use crate::parsers::meteo_lt::api::{ForecastTimestamp, MeteoLtClient, DEFAULT_BASE_URL};
use crate::parsers::meteo_lt::conditions::condition_from_code;
use crate::parsers::{parse_utc, ParserContext, ParserInfo, WeatherParser};
use crate::stations::error::LocateStationError;
use crate::stations::locate_station::StationLocator;
use crate::types::measurement::{hectopascal_to_kilopascal, percent_to_fraction, Measurement};
use crate::types::station::LatLon;
use crate::weather_data::error::IngestError;
use async_trait::async_trait;
use bon::Builder;
use log::{error, info};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MeteoLtForecastConfig {
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,
    #[builder(default = 10.0)]
    pub max_distance_km: f64,
}

impl Default for MeteoLtForecastConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Long-term forecast for the meteo.lt place nearest to the controller.
pub struct MeteoLtForecastParser {
    info: ParserInfo,
    config: MeteoLtForecastConfig,
    client: MeteoLtClient,
}

impl MeteoLtForecastParser {
    pub fn new(fetcher: JsonFetcher, config: MeteoLtForecastConfig) -> Self {
        let client = MeteoLtClient::new(fetcher, &config.base_url);
        Self {
            info: ParserInfo {
                name: "meteo.lt forecast",
                description: "Weather forecast for Lithuania from api.meteo.lt",
                forecast: true,
                historical: false,
                interval: Duration::from_secs(2 * 3600),
                station_param: NEAREST_PLACE_CODE,
            },
            config,
            client,
        }
    }
}

#[async_trait]
impl WeatherParser for MeteoLtForecastParser {
    fn info(&self) -> &ParserInfo {
        &self.info
    }

    fn default_params(&self) -> Params {
        Params::new().with(NEAREST_PLACE_CODE, "")
    }

    async fn locate(&self, location: LatLon, _params: &Params) -> Result<String, ParserError> {
        let places = self.client.place_candidates().await.map_err(|e| {
            error!("Failed to get meteo.lt places: {}", e);
            LocateStationError::from(e)
        })?;
        let resolved = StationLocator::new(self.config.max_distance_km)
            .resolve_nearest(location, &places)?;
        Ok(resolved.id)
    }

    async fn perform(&self, ctx: &mut ParserContext<'_>) -> Result<Vec<Measurement>, ParserError> {
        let cached = ctx.params.get(NEAREST_PLACE_CODE).map(str::to_string);
        let place_code = match cached {
            Some(code) => code,
            None => {
                info!("Nearest meteo.lt place is not set yet, trying to find one...");
                let code = self.locate(ctx.location, ctx.params).await.map_err(|e| {
                    error!(
                        "Failed to get nearest place, make sure the coordinates {} are within Lithuania: {}",
                        ctx.location, e
                    );
                    e
                })?;
                ctx.params.set(NEAREST_PLACE_CODE, code.clone());
                code
            }
        };

        let forecast = self
            .client
            .forecast(&place_code)
            .await
            .map_err(IngestError::from)?;
        let measurements = translate_forecast(&forecast.forecast_timestamps)?;
        info!(
            "Translated {} forecast timestamps for '{}' into {} values",
            forecast.forecast_timestamps.len(),
            place_code,
            measurements.len()
        );
        Ok(measurements)
    }
}

/// Maps forecast entries to temperature, wind, sky cover, pressure, humidity, QPF and
/// condition values. Missing fields are left out; an undocumented condition code fails
/// the whole batch.
pub fn translate_forecast(entries: &[ForecastTimestamp]) -> Result<Vec<Measurement>, IngestError> {
    let mut measurements = Vec::with_capacity(entries.len() * 7);
    for entry in entries {
        let timestamp = parse_utc(&entry.forecast_time_utc)?.timestamp();

        if let Some(v) = entry.air_temperature {
            measurements.push(Measurement::temperature(timestamp, v));
        }
        if let Some(v) = entry.wind_speed {
            measurements.push(Measurement::wind(timestamp, v));
        }
        if let Some(v) = entry.cloud_cover {
            measurements.push(Measurement::sky_cover(timestamp, percent_to_fraction(v)));
        }
        if let Some(v) = entry.sea_level_pressure {
            measurements.push(Measurement::pressure(timestamp, hectopascal_to_kilopascal(v)));
        }
        if let Some(v) = entry.relative_humidity {
            measurements.push(Measurement::relative_humidity(timestamp, v));
        }
        if let Some(v) = entry.total_precipitation {
            measurements.push(Measurement::qpf(timestamp, v));
        }
        if let Some(code) = &entry.condition_code {
            let condition = condition_from_code(code)
                .ok_or_else(|| IngestError::UnknownCondition { code: code.clone() })?;
            measurements.push(Measurement::condition(timestamp, condition));
        }
    }
    Ok(measurements)
}
