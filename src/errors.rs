//! # Application Errors
//!
//! Errors raised while starting the application. Runtime failures of the
//! collaborators have their own types ([`crate::ocr_errors::OcrError`],
//! [`crate::product_lookup::LookupError`]).

/// Application-level error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing or invalid configuration value
    Config(String),
    /// Localization resources could not be loaded
    Localization(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::Localization(msg) => write!(f, "Localization error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
