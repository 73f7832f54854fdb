//! Defines the normalized measurement tuples handed to the host's measurement sink.

use crate::types::condition::ConditionType;
use serde::Serialize;
use std::fmt;

/// Kind of value carried by a [`Measurement`], together with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeasurementKind {
    /// Air temperature in °C.
    #[serde(rename = "TEMPERATURE")]
    Temperature,
    /// Wind speed in m/s.
    #[serde(rename = "WIND")]
    Wind,
    /// Rain in mm accumulated since the start of the local day.
    #[serde(rename = "RAIN")]
    Rain,
    /// Forecast precipitation in mm.
    #[serde(rename = "QPF")]
    Qpf,
    /// Sky cover as a fraction between 0 and 1.
    #[serde(rename = "SKYCOVER")]
    SkyCover,
    /// Pressure in kPa.
    #[serde(rename = "PRESSURE")]
    Pressure,
    /// Relative humidity in percent.
    #[serde(rename = "RH")]
    RelativeHumidity,
    /// Condition category, see [`ConditionType`].
    #[serde(rename = "CONDITION")]
    Condition,
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementKind::Temperature => "TEMPERATURE",
            MeasurementKind::Wind => "WIND",
            MeasurementKind::Rain => "RAIN",
            MeasurementKind::Qpf => "QPF",
            MeasurementKind::SkyCover => "SKYCOVER",
            MeasurementKind::Pressure => "PRESSURE",
            MeasurementKind::RelativeHumidity => "RH",
            MeasurementKind::Condition => "CONDITION",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasurementValue {
    Number(f64),
    Condition(ConditionType),
}

impl MeasurementValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasurementValue::Number(v) => Some(*v),
            MeasurementValue::Condition(_) => None,
        }
    }

    pub fn as_condition(&self) -> Option<ConditionType> {
        match self {
            MeasurementValue::Condition(c) => Some(*c),
            MeasurementValue::Number(_) => None,
        }
    }
}

/// One `(kind, unix timestamp, value)` tuple.
///
/// Built through the kind-specific constructors so that a condition kind always
/// carries a [`ConditionType`] and every other kind carries a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    kind: MeasurementKind,
    timestamp: i64,
    value: MeasurementValue,
}

impl Measurement {
    fn number(kind: MeasurementKind, timestamp: i64, value: f64) -> Self {
        Self {
            kind,
            timestamp,
            value: MeasurementValue::Number(value),
        }
    }

    pub fn temperature(timestamp: i64, celsius: f64) -> Self {
        Self::number(MeasurementKind::Temperature, timestamp, celsius)
    }

    pub fn wind(timestamp: i64, meters_per_second: f64) -> Self {
        Self::number(MeasurementKind::Wind, timestamp, meters_per_second)
    }

    pub fn rain(timestamp: i64, millimeters: f64) -> Self {
        Self::number(MeasurementKind::Rain, timestamp, millimeters)
    }

    pub fn qpf(timestamp: i64, millimeters: f64) -> Self {
        Self::number(MeasurementKind::Qpf, timestamp, millimeters)
    }

    pub fn sky_cover(timestamp: i64, fraction: f64) -> Self {
        Self::number(MeasurementKind::SkyCover, timestamp, fraction)
    }

    pub fn pressure(timestamp: i64, kilopascal: f64) -> Self {
        Self::number(MeasurementKind::Pressure, timestamp, kilopascal)
    }

    pub fn relative_humidity(timestamp: i64, percent: f64) -> Self {
        Self::number(MeasurementKind::RelativeHumidity, timestamp, percent)
    }

    pub fn condition(timestamp: i64, condition: ConditionType) -> Self {
        Self {
            kind: MeasurementKind::Condition,
            timestamp,
            value: MeasurementValue::Condition(condition),
        }
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn value(&self) -> MeasurementValue {
        self.value
    }
}

/// Vendor sky cover percentage (0-100) to the sink's fraction (0-1).
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Vendor pressure in hectopascal to the sink's kilopascal.
pub fn hectopascal_to_kilopascal(hpa: f64) -> f64 {
    hpa * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_cover_percent_becomes_fraction() {
        assert!((percent_to_fraction(50.0) - 0.5).abs() < 1e-12);
        assert_eq!(percent_to_fraction(0.0), 0.0);
        assert_eq!(percent_to_fraction(100.0), 1.0);
    }

    #[test]
    fn pressure_hpa_becomes_kpa() {
        assert!((hectopascal_to_kilopascal(1013.0) - 101.3).abs() < 1e-9);
    }

    #[test]
    fn measurement_serializes_as_flat_tuple() {
        let json = serde_json::to_value(Measurement::pressure(1_700_000_000, 101.3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "PRESSURE", "timestamp": 1_700_000_000i64, "value": 101.3})
        );

        let json = serde_json::to_value(Measurement::condition(10, ConditionType::Fog)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "CONDITION", "timestamp": 10, "value": "Fog"})
        );
    }

    #[test]
    fn condition_measurement_carries_no_number() {
        let m = Measurement::condition(0, ConditionType::Snow);
        assert_eq!(m.kind(), MeasurementKind::Condition);
        assert_eq!(m.value().as_f64(), None);
        assert_eq!(m.value().as_condition(), Some(ConditionType::Snow));
    }
}
