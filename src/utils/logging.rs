//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the PriceTracker application.

use std::path::Path;
use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::services::sync::SyncReport;
use crate::utils::errors::{PriceTrackerError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file appender on drop and must be kept
/// alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let path = Path::new(&config.file_path);
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("price_tracker.log");

    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| PriceTrackerError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log the outcome of a sync pass
pub fn log_sync_summary(report: &SyncReport) {
    if report.failed > 0 {
        warn!(
            checked = report.checked,
            removed = report.removed,
            updated = report.updated,
            price_changed = report.price_changed,
            notified = report.notified,
            failed = report.failed,
            "Price sync finished with failures"
        );
    } else {
        info!(
            checked = report.checked,
            removed = report.removed,
            updated = report.updated,
            price_changed = report.price_changed,
            notified = report.notified,
            "Price sync finished"
        );
    }
}

/// Log a good that could not be synced
pub fn log_good_failure(good_id: &str, error: &PriceTrackerError) {
    if error.is_recoverable() {
        warn!(
            good_id = good_id,
            error = %error,
            severity = %error.severity(),
            "Failed to sync good, will retry next pass"
        );
    } else {
        error!(
            good_id = good_id,
            error = %error,
            severity = %error.severity(),
            "Failed to sync good"
        );
    }
}

/// Log a price drop notification attempt
pub fn log_notification(good_id: &str, user_id: i64, chat_id: i64, success: bool) {
    if success {
        debug!(
            good_id = good_id,
            user_id = user_id,
            chat_id = chat_id,
            "Price drop notification delivered"
        );
    } else {
        warn!(
            good_id = good_id,
            user_id = user_id,
            chat_id = chat_id,
            "Price drop notification failed"
        );
    }
}
