//! Fixed illustrative analytics shown on the dashboard
//!
//! None of this is derived from session history.

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TrendPoint {
    pub month: &'static str,
    pub predicted: u32,
    pub actual: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WeatherDemand {
    pub weather: &'static str,
    pub bikes: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DashboardAnalytics {
    /// Model accuracy percentage
    pub model_accuracy: f64,
    pub monthly_trend: Vec<TrendPoint>,
    pub demand_by_weather: Vec<WeatherDemand>,
    pub insights: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
}

const MONTHLY_TREND: [(&str, u32, u32); 6] = [
    ("Jan", 3200, 3100),
    ("Feb", 3500, 3400),
    ("Mar", 4200, 4000),
    ("Apr", 4800, 4900),
    ("May", 5200, 5100),
    ("Jun", 5800, 5700),
];

const DEMAND_BY_WEATHER: [(&str, u32); 4] = [
    ("clear", 5800),
    ("mist", 4200),
    ("light_rain", 2800),
    ("heavy_rain", 1200),
];

#[must_use]
pub fn dashboard() -> DashboardAnalytics {
    DashboardAnalytics {
        model_accuracy: 94.2,
        monthly_trend: MONTHLY_TREND
            .iter()
            .map(|&(month, predicted, actual)| TrendPoint {
                month,
                predicted,
                actual,
            })
            .collect(),
        demand_by_weather: DEMAND_BY_WEATHER
            .iter()
            .map(|&(weather, bikes)| WeatherDemand { weather, bikes })
            .collect(),
        insights: vec![
            "Demand peaks in spring and summer",
            "Clear weather raises demand by 40%",
            "Weekends see 25% more rentals",
        ],
        recommendations: vec![
            "Concentrate stock on sunny days",
            "Schedule maintenance on rainy days",
            "Run promotional campaigns in winter",
        ],
    }
}
