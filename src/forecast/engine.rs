//! Heuristic demand engine
//!
//! A linear score over temperature, weather, season, calendar and comfort
//! factors, clamped to a floor and perturbed with uniform jitter. The floor is
//! applied before jitter, so a final prediction can land below it.

use super::random::RandomSource;
use crate::models::{ForecastRequest, ForecastResult, Season, WeatherCondition};

pub const BASE_DEMAND: f64 = 3000.0;
pub const DEMAND_FLOOR: f64 = 500.0;
/// Jitter spans `[-JITTER_SPAN / 2, +JITTER_SPAN / 2)`
pub const JITTER_SPAN: f64 = 400.0;
pub const CONFIDENCE_BASE: f64 = 85.0;
pub const CONFIDENCE_SPAN: f64 = 10.0;

fn temperature_adjustment(temperature: f64) -> f64 {
    if temperature > 25.0 {
        1500.0
    } else if temperature > 15.0 {
        800.0
    } else if temperature < 5.0 {
        -1000.0
    } else {
        0.0
    }
}

fn weather_adjustment(weather: &WeatherCondition) -> f64 {
    match weather {
        WeatherCondition::Clear => 1200.0,
        WeatherCondition::Mist => 200.0,
        WeatherCondition::LightRain => -800.0,
        WeatherCondition::HeavyRain => -2000.0,
        WeatherCondition::Other(_) => 0.0,
    }
}

fn season_adjustment(season: &Season) -> f64 {
    match season {
        Season::Summer => 1000.0,
        Season::Spring => 500.0,
        Season::Fall => 200.0,
        Season::Winter => -800.0,
        Season::Other(_) => 0.0,
    }
}

fn calendar_adjustment(working_day: bool, holiday: bool) -> f64 {
    let mut adjustment = 0.0;
    if !working_day {
        adjustment += 800.0;
    }
    if holiday {
        adjustment += 400.0;
    }
    adjustment
}

fn comfort_adjustment(humidity: f64, wind_speed: f64) -> f64 {
    let mut adjustment = 0.0;
    if humidity > 80.0 {
        adjustment -= 300.0;
    }
    if wind_speed > 30.0 {
        adjustment -= 500.0;
    }
    adjustment
}

/// Unscored total before the floor is applied
#[must_use]
pub fn raw_demand(request: &ForecastRequest) -> f64 {
    BASE_DEMAND
        + temperature_adjustment(request.temperature)
        + weather_adjustment(&request.weather)
        + season_adjustment(&request.season)
        + calendar_adjustment(request.working_day, request.holiday)
        + comfort_adjustment(request.humidity, request.wind_speed)
}

/// Deterministic pre-jitter demand, clamped to [`DEMAND_FLOOR`]
#[must_use]
pub fn base_demand(request: &ForecastRequest) -> f64 {
    raw_demand(request).max(DEMAND_FLOOR)
}

/// Heuristic forecast for one request.
///
/// Draws two samples from `random`: the first for jitter, the second for
/// confidence.
pub fn predict(request: &ForecastRequest, random: &mut dyn RandomSource) -> ForecastResult {
    let base = base_demand(request);
    let jitter = (random.next_unit() - 0.5) * JITTER_SPAN;
    let prediction = (base + jitter).round() as i64;
    let confidence = (CONFIDENCE_BASE + random.next_unit() * CONFIDENCE_SPAN).round() as u8;

    ForecastResult {
        prediction,
        confidence,
    }
}
