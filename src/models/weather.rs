//! Weather and calendar categories used as forecast inputs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather condition reported for the forecast day.
///
/// Unrecognised strings are kept verbatim in [`WeatherCondition::Other`]
/// and contribute nothing to the demand estimate.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Mist,
    LightRain,
    HeavyRain,
    #[serde(untagged)]
    Other(String),
}

impl WeatherCondition {
    /// Wire name of the condition
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Mist => "mist",
            WeatherCondition::LightRain => "light_rain",
            WeatherCondition::HeavyRain => "heavy_rain",
            WeatherCondition::Other(name) => name,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season of the forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    #[serde(untagged)]
    Other(String),
}

impl Season {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
            Season::Other(name) => name,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
