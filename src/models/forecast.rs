//! Forecast request/result models and result classification

use super::{Season, WeatherCondition};
use serde::{Deserialize, Serialize};

/// Input to the forecast engine, as submitted by the client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    /// Forecast day in ISO-8601 form (`YYYY-MM-DD`)
    pub date: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    pub weather: WeatherCondition,
    pub season: Season,
    pub holiday: bool,
    pub working_day: bool,
}

/// Output of the forecast engine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ForecastResult {
    /// Predicted number of rentals
    pub prediction: i64,
    /// Confidence percentage (0-100)
    pub confidence: u8,
}

/// Demand band a prediction falls into
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl DemandLevel {
    /// Classify a prediction
    #[must_use]
    pub fn classify(prediction: i64) -> Self {
        match prediction {
            p if p < 2000 => DemandLevel::Low,
            p if p < 5000 => DemandLevel::Medium,
            p if p < 7000 => DemandLevel::High,
            _ => DemandLevel::VeryHigh,
        }
    }

    #[must_use]
    pub fn is_elevated(self) -> bool {
        matches!(self, DemandLevel::High | DemandLevel::VeryHigh)
    }
}

/// Whether the predicted volume counts as peak usage
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UsageCategory {
    Peak,
    Normal,
}

impl UsageCategory {
    #[must_use]
    pub fn classify(prediction: i64) -> Self {
        if prediction > 4000 {
            UsageCategory::Peak
        } else {
            UsageCategory::Normal
        }
    }
}

/// Operational recommendations attached to a forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ForecastInsights {
    pub stock: String,
    pub temperature: String,
    pub monitoring: String,
}

impl ForecastInsights {
    /// Derive recommendations from a prediction and the temperature it was made for
    #[must_use]
    pub fn derive(prediction: i64, temperature: f64) -> Self {
        let stock = if DemandLevel::classify(prediction).is_elevated() {
            "High demand expected, consider increasing the bicycle stock"
        } else {
            "Moderate demand, normal stock is sufficient"
        };

        let temperature = if temperature > 25.0 {
            "High temperature favours bicycle use"
        } else if temperature < 10.0 {
            "Low temperature may reduce demand"
        } else {
            "Temperature is suitable for cycling"
        };

        Self {
            stock: stock.to_string(),
            temperature: temperature.to_string(),
            monitoring: "Monitor live conditions to adjust fleet distribution".to_string(),
        }
    }
}
