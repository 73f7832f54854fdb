use async_trait::async_trait;
use lt_weather_parsers::{
    all_parsers, FetchError, HttpSource, JsonFetcher, JsonFileParamStore, JsonLinesSink, LatLon,
    MeasurementKind, ParamStore, ParserRegistry, RetryPolicy, RunOutcome, NEAREST_PLACE_CODE,
    NEAREST_STATION_CODE, NEAREST_STATION_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves canned bodies keyed by URL, counting requests.
#[derive(Default)]
struct CannedUpstream {
    bodies: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl CannedUpstream {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    fn requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpSource for CannedUpstream {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::EmptyResponse(url.to_string()))
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn upstream() -> CannedUpstream {
    CannedUpstream::default()
        .with(
            "https://api.meteo.lt/v1/places",
            r#"[{"code": "vilnius", "name": "Vilnius"}]"#,
        )
        .with(
            "https://api.meteo.lt/v1/places/vilnius",
            r#"{"code": "vilnius", "name": "Vilnius", "coordinates": {"latitude": 54.6872, "longitude": 25.2797}}"#,
        )
        .with(
            "https://api.meteo.lt/v1/places/vilnius/forecasts/long-term",
            r#"{"forecastTimestamps": [
                {"forecastTimeUtc": "2024-05-01 12:00:00", "airTemperature": 14.2, "windSpeed": 3,
                 "cloudCover": 100, "seaLevelPressure": 1000, "relativeHumidity": 80,
                 "totalPrecipitation": 1.2, "conditionCode": "moderate-rain"}
            ]}"#,
        )
        .with(
            "https://api.meteo.lt/v1/stations",
            r#"[{"code": "vilniaus-ams", "name": "Vilniaus AMS", "coordinates": {"latitude": 54.626, "longitude": 25.107}}]"#,
        )
        .with(
            "https://api.meteo.lt/v1/stations/vilniaus-ams/observations/latest",
            r#"{"observations": [
                {"observationTimeUtc": "2024-06-01 08:00:00", "airTemperature": 13.9, "windSpeed": 3, "precipitation": 0.5},
                {"observationTimeUtc": "2024-06-01 09:00:00", "airTemperature": 14.5, "windSpeed": 2, "precipitation": 0}
            ]}"#,
        )
        .with(
            "http://eismoinfo.lt/weather-conditions-service",
            r#"[
                {"id": "1164", "lat": "54.652", "lng": "25.152", "krituliu_kiekis": "0.0"},
                {"id": "2002", "lat": "54.700", "lng": "25.200", "krituliu_kiekis": "0.1"}
            ]"#,
        )
        .with(
            "http://eismoinfo.lt/weather-conditions-retrospective?id=2002&number=500",
            r#"[
                {"surinkimo_data": "2024-01-02 00:30", "surinkimo_data_unix": "1704148200",
                 "krituliu_kiekis": "1.0", "oro_temperatura": "0.4", "vejo_greitis_vidut": "3.1"},
                {"surinkimo_data": "2024-01-01 23:00", "surinkimo_data_unix": "1704142800",
                 "krituliu_kiekis": "2.0", "oro_temperatura": "0.9", "vejo_greitis_vidut": "2.7"}
            ]"#,
        )
}

fn fast_retries() -> RetryPolicy {
    RetryPolicy::builder()
        .pre_fetch_delay(Duration::ZERO)
        .backoff_step(Duration::ZERO)
        .build()
}

#[tokio::test]
async fn every_parser_runs_and_remembers_its_station() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let params_path = dir.path().join("params.json");

    let upstream = Arc::new(upstream());
    let fetcher = JsonFetcher::new(upstream.clone(), fast_retries());
    let mut registry = ParserRegistry::with_parsers(all_parsers(&fetcher));
    let mut store = JsonFileParamStore::new(&params_path);
    let mut sink = JsonLinesSink::new(Vec::new());
    let location = LatLon(54.65, 25.15);

    let outcomes = registry
        .run_due(location, &mut store, &mut sink, chrono::Utc::now())
        .await;
    assert_eq!(outcomes.len(), 3);
    for (name, outcome) in &outcomes {
        assert!(outcome.is_success(), "{} failed: {:?}", name, outcome);
    }

    let lines: Vec<serde_json::Value> = String::from_utf8(sink.into_inner())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    // 7 forecast values, 3 per observation, 3 from the road station
    assert_eq!(lines.len(), 16);
    let road_rain = lines
        .iter()
        .find(|l| l["parser"] == "eismoinfo.lt retrospective" && l["kind"] == "RAIN")
        .unwrap();
    assert!((road_rain["value"].as_f64().unwrap() - 3.0).abs() < 1e-9);
    let condition = lines.iter().find(|l| l["kind"] == "CONDITION").unwrap();
    assert_eq!(condition["value"], "RainShowers");

    let reopened = JsonFileParamStore::new(&params_path);
    let forecast = reopened.load("meteo.lt forecast").await.unwrap().unwrap();
    assert_eq!(forecast.get(NEAREST_PLACE_CODE), Some("vilnius"));
    let observations = reopened.load("meteo.lt observations").await.unwrap().unwrap();
    assert_eq!(observations.get(NEAREST_STATION_CODE), Some("vilniaus-ams"));
    let road = reopened.load("eismoinfo.lt retrospective").await.unwrap().unwrap();
    assert_eq!(road.get(NEAREST_STATION_ID), Some("2002"));

    // second pass goes straight to the series endpoints
    let before = upstream.requests();
    let mut rerun_sink: Vec<lt_weather_parsers::Measurement> = Vec::new();
    for name in registry.names() {
        let outcome = registry
            .run(name, location, &mut store, &mut rerun_sink, chrono::Utc::now())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Completed {
                params_saved: false,
                ..
            }
        ));
    }
    assert_eq!(upstream.requests() - before, 3);
    assert!(rerun_sink
        .iter()
        .any(|m| m.kind() == MeasurementKind::Pressure));
}

#[tokio::test]
async fn far_away_controller_gets_no_values_and_no_cached_station() {
    init_logger();
    let upstream = Arc::new(upstream());
    let fetcher = JsonFetcher::new(upstream, fast_retries());
    let mut registry = ParserRegistry::with_parsers(all_parsers(&fetcher));
    let mut store = lt_weather_parsers::MemoryParamStore::new();
    let mut sink: Vec<lt_weather_parsers::Measurement> = Vec::new();

    let outcomes = registry
        .run_due(LatLon(52.52, 13.405), &mut store, &mut sink, chrono::Utc::now())
        .await;

    assert!(outcomes
        .iter()
        .all(|(_, o)| matches!(o, RunOutcome::ParserFailed(_))));
    assert!(sink.is_empty());
    assert_eq!(store.load("eismoinfo.lt retrospective").await.unwrap(), None);
}
