use crate::types::condition::ConditionType;

/// Translates a meteo.lt `conditionCode` into the controller's condition category.
///
/// Covers both the long-term forecast vocabulary (`isolated-clouds`, `moderate-rain`, ...)
/// and the codes used by the observation feed (`partly-cloudy`, `thunder`, ...).
/// Returns `None` for codes meteo.lt has not documented.
pub fn condition_from_code(code: &str) -> Option<ConditionType> {
    let condition = match code {
        "clear" => ConditionType::Fair,
        "isolated-clouds" | "partly-cloudy" => ConditionType::FewClouds,
        "scattered-clouds" | "cloudy-with-sunny-intervals" | "variable-cloudiness" => {
            ConditionType::PartlyCloudy
        }
        "overcast" | "cloudy" => ConditionType::Overcast,
        "light-rain" | "drizzle" => ConditionType::LightRain,
        "moderate-rain" | "rain" | "rain-showers" => ConditionType::RainShowers,
        "heavy-rain" => ConditionType::HeavyRain,
        "light-sleet" | "sleet-showers" => ConditionType::RainSnow,
        "sleet" | "freezing-rain" => ConditionType::FreezingRain,
        "hail" | "ice-pellets" => ConditionType::IcePellets,
        "light-snow" | "moderate-snow" | "snow" | "heavy-snow" | "snow-showers" | "snowstorm" => {
            ConditionType::Snow
        }
        "fog" | "mist" => ConditionType::Fog,
        "thunder" | "isolated-thunderstorms" => ConditionType::ThunderstormInVicinity,
        "thunderstorms" | "heavy-rain-with-thunderstorms" => ConditionType::Thunderstorm,
        "na" => ConditionType::Unknown,
        _ => return None,
    };
    Some(condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_codes_all_translate() {
        let expected = [
            ("clear", ConditionType::Fair),
            ("isolated-clouds", ConditionType::FewClouds),
            ("scattered-clouds", ConditionType::PartlyCloudy),
            ("overcast", ConditionType::Overcast),
            ("light-rain", ConditionType::LightRain),
            ("moderate-rain", ConditionType::RainShowers),
            ("heavy-rain", ConditionType::HeavyRain),
            ("sleet", ConditionType::FreezingRain),
            ("light-snow", ConditionType::Snow),
            ("moderate-snow", ConditionType::Snow),
            ("heavy-snow", ConditionType::Snow),
            ("fog", ConditionType::Fog),
            ("na", ConditionType::Unknown),
        ];
        for (code, condition) in expected {
            assert_eq!(condition_from_code(code), Some(condition), "{}", code);
        }
    }

    #[test]
    fn thunder_codes_distinguish_vicinity() {
        assert_eq!(
            condition_from_code("isolated-thunderstorms"),
            Some(ConditionType::ThunderstormInVicinity)
        );
        assert_eq!(
            condition_from_code("thunderstorms"),
            Some(ConditionType::Thunderstorm)
        );
    }

    #[test]
    fn undocumented_codes_are_not_guessed() {
        assert_eq!(condition_from_code("tornado"), None);
        assert_eq!(condition_from_code(""), None);
        assert_eq!(condition_from_code("Clear"), None);
    }
}
