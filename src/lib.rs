mod error;
mod fetch;
mod host;
mod parsers;
mod stations;
mod types;
mod utils;
mod weather_data;

pub use error::ParserError;
pub use fetch::error::FetchError;
pub use host::error::HostError;
pub use stations::error::LocateStationError;
pub use weather_data::error::IngestError;

pub use fetch::http_source::{HttpSource, ReqwestSource};
pub use fetch::retry::{JsonFetcher, RetryPolicy};

pub use stations::locate_station::{distance_km, StationLocator};
pub use types::condition::ConditionType;
pub use types::measurement::*;
pub use types::station::*;

pub use weather_data::rain_accumulator::{
    accumulate_daily_rain, AccumulatorState, DailyRainAccumulator, RainReading, RainSample,
};

pub use parsers::eismoinfo::api::{EismoinfoClient, RetrospectiveRecord, StationReading};
pub use parsers::eismoinfo::retrospective::translate_retrospective;
pub use parsers::meteo_lt::api::{
    ForecastResponse, ForecastTimestamp, MeteoLtClient, Observation, ObservationsResponse,
};
pub use parsers::meteo_lt::conditions::condition_from_code;
pub use parsers::meteo_lt::forecast::translate_forecast;
pub use parsers::meteo_lt::observations::translate_observations;
pub use parsers::*;

pub use host::params::*;
pub use host::registry::{run_parser, ParserRegistry, RunOutcome};
pub use host::sink::{JsonLinesSink, MeasurementSink};
pub use utils::{default_params_file, get_config_dir};
