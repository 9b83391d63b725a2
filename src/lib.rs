//! Price Tracker Telegram Bot
//!
//! Tracks product prices on an online store for Telegram users. Users
//! subscribe to products with a recorded price, a periodic sync re-scrapes
//! every tracked product and users are alerted once the price drops below
//! what they recorded.

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PriceTrackerError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryStore, PriceStore};
pub use services::{ServiceFactory, SyncReport, SyncService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
