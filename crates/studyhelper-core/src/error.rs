//! Core error types for studyhelper-core.
//!
//! None of these are fatal to the process. Validation errors are reported
//! back to the user through the activity log, notification errors are
//! absorbed by the fallback popup, and config errors fall back to defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyhelper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Custom reminder input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was blank
    #[error("'{field}' must not be empty")]
    EmptyField { field: String },

    /// Interval text did not parse as an integer
    #[error("Invalid interval '{input}': expected a whole number of minutes")]
    InvalidInterval { input: String },

    /// Interval parsed but is zero or negative
    #[error("Interval must be a positive number of minutes, got {minutes}")]
    NonPositiveInterval { minutes: i64 },
}

impl ValidationError {
    /// The short notice shown in the activity log for this failure.
    pub fn user_notice(&self) -> &'static str {
        match self {
            ValidationError::EmptyField { .. } => "Please fill in all fields!",
            ValidationError::InvalidInterval { .. }
            | ValidationError::NonPositiveInterval { .. } => "Please enter valid minutes!",
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from a single notifier backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The backend is not usable on this machine
    #[error("Notifier unavailable: {0}")]
    Unavailable(String),

    /// The backend accepted the call but delivery failed
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
