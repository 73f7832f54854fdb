//! Turns rain samples into "rain since the start of the local day".
//!
//! Stations along the roads only report how hard it is raining at the moment of the
//! reading, so each interval between two readings contributes the rate reported at its
//! start times its length in hours. meteo.lt stations report the amount that fell over
//! the hour ending at the observation instead, which is added as is. Either way the
//! running total starts over whenever the local calendar date changes.

use crate::types::measurement::Measurement;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

/// What the rain figure of a sample means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RainReading {
    /// mm/h at the moment of the reading, holding until the next reading.
    #[default]
    Rate,
    /// mm fallen over the interval that ends at the reading.
    Amount,
}

/// One reading fed to the accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct RainSample {
    /// Unix timestamp. Orders the samples, measures the intervals and stamps the
    /// emitted measurements.
    pub timestamp: i64,
    /// Wall-clock time at the station, used for the day boundary only.
    pub local_time: NaiveDateTime,
    /// Rain figure, read according to the accumulator's [`RainReading`].
    pub rain: f64,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccumulatorState {
    Uninitialized,
    Accumulating { date: NaiveDate, total: f64 },
}

/// Running daily total, valid for a single ingestion pass.
#[derive(Debug, Clone)]
pub struct DailyRainAccumulator {
    reading: RainReading,
    previous: Option<(i64, f64)>,
    state: AccumulatorState,
}

impl Default for DailyRainAccumulator {
    fn default() -> Self {
        Self::new(RainReading::default())
    }
}

impl DailyRainAccumulator {
    pub fn new(reading: RainReading) -> Self {
        Self {
            reading,
            previous: None,
            state: AccumulatorState::Uninitialized,
        }
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// Feeds the next sample (in timestamp order) and returns the rain accumulated since
    /// local midnight. With [`RainReading::Rate`] the very first sample only opens an
    /// interval and yields `None`.
    pub fn push(&mut self, sample: &RainSample) -> Option<f64> {
        let previous = self.previous.replace((sample.timestamp, sample.rain));

        let contribution = match self.reading {
            RainReading::Rate => {
                let (previous_timestamp, previous_rate) = previous?;
                let hours = (sample.timestamp - previous_timestamp) as f64 / 3600.0;
                previous_rate * hours
            }
            RainReading::Amount => sample.rain,
        };
        let date = sample.local_time.date();

        let total = match self.state {
            AccumulatorState::Accumulating {
                date: current,
                total,
            } if current == date => total + contribution,
            AccumulatorState::Accumulating { .. } => {
                debug!("New day {} started, resetting accumulated rain", date);
                contribution
            }
            AccumulatorState::Uninitialized => contribution,
        };

        self.state = AccumulatorState::Accumulating { date, total };
        Some(total)
    }
}

/// Orders the samples by timestamp, drops repeated timestamps and emits temperature,
/// wind and accumulated rain for every sample that has a daily total.
pub fn accumulate_daily_rain(
    mut samples: Vec<RainSample>,
    reading: RainReading,
) -> Vec<Measurement> {
    samples.sort_by_key(|s| s.timestamp);
    samples.dedup_by_key(|s| s.timestamp);

    let mut accumulator = DailyRainAccumulator::new(reading);
    let mut measurements = Vec::with_capacity(samples.len() * 3);

    for sample in samples {
        let Some(rain) = accumulator.push(&sample) else {
            debug!("Sample at {} only opens the first interval", sample.local_time);
            continue;
        };
        if let Some(temperature) = sample.temperature {
            measurements.push(Measurement::temperature(sample.timestamp, temperature));
        }
        if let Some(wind) = sample.wind_speed {
            measurements.push(Measurement::wind(sample.timestamp, wind));
        }
        measurements.push(Measurement::rain(sample.timestamp, rain));
    }

    measurements
}
