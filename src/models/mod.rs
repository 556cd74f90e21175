//! Data models for the BikeCast service
//!
//! - Weather: weather and season categories
//! - Forecast: engine request/result and result classification

pub mod forecast;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DemandLevel, ForecastInsights, ForecastRequest, ForecastResult, UsageCategory};
pub use weather::{Season, WeatherCondition};
