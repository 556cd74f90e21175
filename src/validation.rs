//! Range checks applied to forecast requests before they reach a provider
//!
//! Only temperature and humidity are checked. Wind speed, weather, season and
//! the calendar flags pass through untouched.

use crate::models::ForecastRequest;
use crate::{BikecastError, Result};
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -20.0..=50.0;
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Validate a forecast request, temperature first, then humidity.
pub fn validate(request: &ForecastRequest) -> Result<()> {
    if !TEMPERATURE_RANGE.contains(&request.temperature) {
        return Err(BikecastError::validation(
            "Temperature must be between -20°C and 50°C",
        ));
    }

    if !HUMIDITY_RANGE.contains(&request.humidity) {
        return Err(BikecastError::validation(
            "Humidity must be between 0% and 100%",
        ));
    }

    Ok(())
}
