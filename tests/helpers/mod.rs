//! Test helpers module
//!
//! Shared fakes, mock servers and database helpers for the integration tests.

#![allow(dead_code)]

pub mod fakes;
pub mod telegram_mock;
pub mod database_helper;

pub use fakes::*;
pub use telegram_mock::*;
pub use database_helper::*;
