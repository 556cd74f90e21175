//! `BikeCast` - bicycle rental demand forecasting
//!
//! This library provides request validation, the heuristic demand engine
//! behind a pluggable provider, per-session forecast history with CSV export,
//! and the HTTP API that serves them.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod history;
pub mod logging;
pub mod models;
pub mod session;
pub mod validation;
pub mod web;

// Re-export core types for public API
pub use config::BikecastConfig;
pub use error::{BikecastError, ErrorCode};
pub use forecast::{ForecastProvider, RemoteProvider, SimulatedProvider};
pub use history::{HistoryEntry, HistoryLedger, LedgerSummary, SortOrder};
pub use models::{ForecastRequest, ForecastResult, Season, WeatherCondition};
pub use session::{ForecastSession, SessionRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, BikecastError>;
