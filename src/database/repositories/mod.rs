//! Database repositories module
//! 
//! This module contains all repository implementations for data access

pub mod user;
pub mod good;
pub mod subscription;

// Re-export repositories
pub use user::UserRepository;
pub use good::GoodRepository;
pub use subscription::SubscriptionRepository;
