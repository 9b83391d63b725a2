//! Bot handlers module
//!
//! This module contains the Telegram bot command handlers

pub mod commands;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
