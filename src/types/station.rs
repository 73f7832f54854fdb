//! Defines the data structures representing candidate weather stations (or forecast places)
//! offered by an upstream API, together with the coordinates used to measure distance to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are decimal degrees.
///
/// # Examples
///
/// ```
/// use lt_weather_parsers::LatLon;
///
/// let vilnius = LatLon(54.6872, 25.2797);
/// assert_eq!(vilnius.0, 54.6872); // Latitude
/// assert_eq!(vilnius.1, 25.2797); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.0, self.1)
    }
}

/// Optional sensor capabilities a station may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The station reports a precipitation rate.
    RainSensor,
}

/// A single candidate station or place, as listed by an upstream API.
///
/// `Id` is the vendor's canonical identifier type (`u32` for eismoinfo.lt,
/// `String` place/station codes for meteo.lt). Stations are fetched fresh for each
/// lookup; only the chosen identifier is ever persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Station<Id> {
    /// Vendor identifier of the station.
    pub id: Id,
    /// Human readable name, if the vendor provides one.
    pub name: Option<String>,
    /// Where the station is.
    pub location: LatLon,
    /// Capabilities the station advertises.
    pub capabilities: Vec<Capability>,
}

impl<Id> Station<Id> {
    pub fn new(id: Id, location: LatLon) -> Self {
        Self {
            id,
            name: None,
            location,
            capabilities: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// The outcome of a successful nearest-station lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation<Id> {
    /// Identifier of the nearest qualifying station.
    pub id: Id,
    /// Great-circle distance to it, in kilometers.
    pub distance_km: f64,
}
