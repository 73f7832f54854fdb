use crate::error::ParserError;
use crate::host::error::HostError;
use crate::host::params::ParamStore;
use crate::host::sink::MeasurementSink;
use crate::parsers::{ParserContext, WeatherParser};
use crate::types::station::LatLon;
use chrono::{DateTime, TimeDelta, Utc};
use log::{error, info, warn};

/// Result of one scheduled parser run. Failures are reported here rather than
/// propagated, the next run is simply attempted on the next interval.
#[derive(Debug)]
pub enum RunOutcome {
    Completed {
        measurements: usize,
        params_saved: bool,
    },
    ParserFailed(ParserError),
    HostFailed(HostError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

struct Registered {
    parser: Box<dyn WeatherParser>,
    last_run: Option<DateTime<Utc>>,
}

/// Parsers known to the host together with the time each last ran.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Registered>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parsers(parsers: impl IntoIterator<Item = Box<dyn WeatherParser>>) -> Self {
        let mut registry = Self::new();
        for parser in parsers {
            registry.register(parser);
        }
        registry
    }

    /// Adds a parser. A parser with the same name replaces the earlier one.
    pub fn register(&mut self, parser: Box<dyn WeatherParser>) {
        let name = parser.info().name;
        self.parsers.retain(|r| r.parser.info().name != name);
        self.parsers.push(Registered {
            parser,
            last_run: None,
        });
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|r| r.parser.info().name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn WeatherParser> {
        self.find(name).map(|r| r.parser.as_ref())
    }

    pub fn parsers(&self) -> impl Iterator<Item = &dyn WeatherParser> {
        self.parsers.iter().map(|r| r.parser.as_ref())
    }

    fn find(&self, name: &str) -> Option<&Registered> {
        self.parsers.iter().find(|r| r.parser.info().name == name)
    }

    pub fn last_run(&self, name: &str) -> Option<DateTime<Utc>> {
        self.find(name).and_then(|r| r.last_run)
    }

    fn next_run_of(registered: &Registered) -> Option<DateTime<Utc>> {
        let interval =
            TimeDelta::from_std(registered.parser.info().interval).unwrap_or(TimeDelta::MAX);
        registered
            .last_run
            .map(|last| last.checked_add_signed(interval).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Names of the parsers whose interval has elapsed at `now`. Parsers that never ran
    /// are always due.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<&'static str> {
        self.parsers
            .iter()
            .filter(|r| Self::next_run_of(r).map_or(true, |next| next <= now))
            .map(|r| r.parser.info().name)
            .collect()
    }

    /// Earliest instant at which some parser becomes due, `None` when one already is.
    pub fn next_due(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut earliest: Option<DateTime<Utc>> = None;
        for registered in &self.parsers {
            let next = Self::next_run_of(registered)?;
            if next <= now {
                return None;
            }
            earliest = Some(earliest.map_or(next, |e| e.min(next)));
        }
        earliest
    }

    /// Runs the named parser and records `now` as its last run, whatever the outcome.
    pub async fn run(
        &mut self,
        name: &str,
        location: LatLon,
        store: &mut dyn ParamStore,
        sink: &mut dyn MeasurementSink,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, HostError> {
        let registered = self
            .parsers
            .iter_mut()
            .find(|r| r.parser.info().name == name)
            .ok_or_else(|| HostError::UnknownParser(name.to_string()))?;
        let outcome = run_parser(registered.parser.as_ref(), location, store, sink).await;
        registered.last_run = Some(now);
        Ok(outcome)
    }

    /// Runs every parser that is due at `now`, in registration order.
    pub async fn run_due(
        &mut self,
        location: LatLon,
        store: &mut dyn ParamStore,
        sink: &mut dyn MeasurementSink,
        now: DateTime<Utc>,
    ) -> Vec<(&'static str, RunOutcome)> {
        let mut outcomes = Vec::new();
        for name in self.due(now) {
            match self.run(name, location, store, sink, now).await {
                Ok(outcome) => outcomes.push((name, outcome)),
                Err(e) => error!("Failed to run '{}': {}", name, e),
            }
        }
        outcomes
    }
}

/// One scheduled run of a parser.
///
/// Stored parameters are loaded with the parser's defaults filled in underneath. A
/// newly resolved identifier is saved even when the fetch that follows fails, while
/// measurements reach the sink only if the whole run succeeded.
pub async fn run_parser(
    parser: &dyn WeatherParser,
    location: LatLon,
    store: &mut dyn ParamStore,
    sink: &mut dyn MeasurementSink,
) -> RunOutcome {
    let name = parser.info().name;

    let mut params = match store.load(name).await {
        Ok(stored) => stored.unwrap_or_default(),
        Err(e) => {
            error!("Failed to load parameters of '{}': {}", name, e);
            return RunOutcome::HostFailed(e);
        }
    };
    params.merge_defaults(&parser.default_params());
    let before = params.clone();

    info!("Running '{}' for {}", name, location);
    let result = {
        let mut ctx = ParserContext {
            location,
            params: &mut params,
        };
        parser.perform(&mut ctx).await
    };

    let mut params_saved = false;
    if params != before {
        match store.save(name, &params).await {
            Ok(()) => params_saved = true,
            Err(e) => warn!("Failed to save parameters of '{}': {}", name, e),
        }
    }

    let measurements = match result {
        Ok(measurements) => measurements,
        Err(e) => {
            error!("'{}' failed: {}", name, e);
            return RunOutcome::ParserFailed(e);
        }
    };

    if let Err(e) = sink.add_values(name, &measurements) {
        error!("Failed to store measurements of '{}': {}", name, e);
        return RunOutcome::HostFailed(e);
    }
    info!("'{}' produced {} values", name, measurements.len());
    RunOutcome::Completed {
        measurements: measurements.len(),
        params_saved,
    }
}
