//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{PriceTrackerError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_scraper_config(&settings.scraper)?;
    validate_subscription_config(&settings.subscription)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(PriceTrackerError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PriceTrackerError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(PriceTrackerError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PriceTrackerError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate scraper configuration
fn validate_scraper_config(config: &super::ScraperConfig) -> Result<()> {
    url::Url::parse(&config.good_url).map_err(|e| {
        PriceTrackerError::Config(format!("Invalid good URL {}: {}", config.good_url, e))
    })?;

    if config.timeout_seconds == 0 {
        return Err(PriceTrackerError::Config(
            "Scraper timeout must be greater than 0".to_string()
        ));
    }

    let selectors = [
        ("name_selector", &config.name_selector),
        ("single_price_selector", &config.single_price_selector),
        ("two_price_selector", &config.two_price_selector),
    ];
    for (field, selector) in selectors {
        if scraper::Selector::parse(selector).is_err() {
            return Err(PriceTrackerError::Config(
                format!("Invalid CSS selector in scraper.{}: {}", field, selector)
            ));
        }
    }

    Ok(())
}

/// Validate subscription configuration
fn validate_subscription_config(config: &super::SubscriptionConfig) -> Result<()> {
    if config.max_per_user <= 0 {
        return Err(PriceTrackerError::Config(
            "Subscription limit must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PriceTrackerError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PriceTrackerError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
