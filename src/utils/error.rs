//! Error types and handling
//!
//! Common error types used across the application.

use crate::capture::CaptureError;
use crate::session::{SessionError, ValidationError};
use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        match error {
            // Surface the form error as-is so the toast text stays stable
            SessionError::Validation(e) => AppError::Validation(e),
            other => AppError::Session(other.to_string()),
        }
    }
}

/// Error response for frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Capture(_) => "CAPTURE_ERROR",
            AppError::Settings(_) => "SETTINGS_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

impl From<SessionError> for ErrorResponse {
    fn from(error: SessionError) -> Self {
        AppError::from(error).into()
    }
}

impl From<CaptureError> for ErrorResponse {
    fn from(error: CaptureError) -> Self {
        AppError::from(error).into()
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
