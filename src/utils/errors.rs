//! Error handling for PriceTracker
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for PriceTracker application
#[derive(Error, Debug)]
pub enum PriceTrackerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Subscription limit exceeded: at most {limit} goods per user")]
    ExceedLimit { limit: i64 },

    #[error("Good not found: {good_id}")]
    GoodNotFound { good_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Vendor page parsing errors
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid price text: {0:?}")]
    InvalidPrice(String),
}

/// Result type alias for PriceTracker operations
pub type Result<T> = std::result::Result<T, PriceTrackerError>;

impl From<config::ConfigError> for PriceTrackerError {
    fn from(err: config::ConfigError) -> Self {
        PriceTrackerError::Config(err.to_string())
    }
}

impl PriceTrackerError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PriceTrackerError::Database(_) => false,
            PriceTrackerError::Migration(_) => false,
            PriceTrackerError::Telegram(_) => true,
            PriceTrackerError::Http(_) => true,
            PriceTrackerError::Scrape(_) => true,
            PriceTrackerError::UrlParse(_) => false,
            PriceTrackerError::Io(_) => true,
            PriceTrackerError::Config(_) => false,
            PriceTrackerError::ExceedLimit { .. } => false,
            PriceTrackerError::GoodNotFound { .. } => false,
            PriceTrackerError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PriceTrackerError::Database(_) => ErrorSeverity::Critical,
            PriceTrackerError::Migration(_) => ErrorSeverity::Critical,
            PriceTrackerError::Config(_) => ErrorSeverity::Critical,
            PriceTrackerError::ExceedLimit { .. } => ErrorSeverity::Info,
            PriceTrackerError::InvalidInput(_) => ErrorSeverity::Info,
            PriceTrackerError::GoodNotFound { .. } => ErrorSeverity::Info,
            PriceTrackerError::Scrape(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
