//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod good;
pub mod subscription;

// Re-export commonly used models
pub use user::User;
pub use good::{Good, GoodInfo};
pub use subscription::{Subscription, CreateSubscriptionRequest, SubscribedGood, PendingAlert};
