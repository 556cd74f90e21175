//! Error types and handling for the BikeCast service

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the BikeCast service
#[derive(Error, Debug)]
pub enum BikecastError {
    /// A forecast request failed a range check
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The forecast provider could not produce a result
    #[error("Forecast engine failure: {message}")]
    EngineFailure { message: String },

    /// Export requested against an empty history
    #[error("Export refused: history is empty")]
    ExportRefused,

    /// A forecast is already outstanding for the session
    #[error("A forecast is already in progress for this session")]
    Busy,

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Stable machine-readable error identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    EngineFailure,
    ExportRefused,
    Busy,
    SessionNotFound,
    Config,
}

impl BikecastError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new engine failure
    pub fn engine<S: Into<String>>(message: S) -> Self {
        Self::EngineFailure {
            message: message.into(),
        }
    }

    pub fn session_not_found<S: Into<String>>(id: S) -> Self {
        Self::SessionNotFound { id: id.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            BikecastError::Validation { .. } => ErrorCode::Validation,
            BikecastError::EngineFailure { .. } => ErrorCode::EngineFailure,
            BikecastError::ExportRefused => ErrorCode::ExportRefused,
            BikecastError::Busy => ErrorCode::Busy,
            BikecastError::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            BikecastError::Config { .. } => ErrorCode::Config,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BikecastError::Validation { message } => message.clone(),
            BikecastError::EngineFailure { .. } => {
                "The forecast could not be processed. Please try again.".to_string()
            }
            BikecastError::ExportRefused => "There is no data to export.".to_string(),
            BikecastError::Busy => {
                "A forecast is already running. Wait for it to finish.".to_string()
            }
            BikecastError::SessionNotFound { .. } => {
                "Session not found. Start a new session.".to_string()
            }
            BikecastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}
