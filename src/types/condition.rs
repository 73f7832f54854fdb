//! Defines the `ConditionType` enum, the fixed set of weather condition categories
//! the controller understands, independent of any vendor's code list.

use serde::Serialize;
use std::fmt;

/// Weather condition category accepted by the measurement sink.
///
/// Vendor modules translate their own condition codes into one of these variants
/// through a static lookup table. Every vendor table maps its "not available" code
/// to [`ConditionType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionType {
    /// Clear or mostly clear sky.
    Fair,
    /// A few isolated clouds.
    FewClouds,
    /// Scattered clouds, sun in between.
    PartlyCloudy,
    /// Sky fully covered.
    Overcast,
    /// Visibility reduced by fog.
    Fog,
    /// Light rain or drizzle.
    LightRain,
    /// Moderate rain, usually showers.
    RainShowers,
    /// Heavy rain.
    HeavyRain,
    /// Mixed rain and snow.
    RainSnow,
    /// Freezing rain or sleet.
    FreezingRain,
    /// Ice pellets or hail.
    IcePellets,
    /// Any intensity of snowfall.
    Snow,
    /// Thunder heard, storm not overhead.
    ThunderstormInVicinity,
    /// Thunderstorm overhead.
    Thunderstorm,
    /// The vendor did not report a condition.
    Unknown,
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
