//! Services module
//!
//! This module contains business logic services

pub mod notification;
pub mod scraper;
pub mod subscription;
pub mod sync;

// Re-export commonly used services
pub use notification::{Notifier, TelegramNotifier, format_price_drop_message};
pub use scraper::{PriceSource, ScraperClient, GoodPageParser};
pub use subscription::{SubscriptionService, TrackedGood};
pub use sync::{SyncService, SyncReport};

use std::sync::Arc;
use teloxide::Bot;
use crate::config::settings::Settings;
use crate::database::PriceStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub subscription_service: SubscriptionService,
    pub sync_service: Arc<SyncService>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory backed by the vendor scraper and Telegram
    pub fn new(bot: Bot, settings: &Settings, store: Arc<dyn PriceStore>) -> Result<Self> {
        let source: Arc<dyn PriceSource> = Arc::new(ScraperClient::new(&settings.scraper)?);
        let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(bot));
        Ok(Self::with_components(settings, store, source, notifier))
    }

    /// Wire the services over explicit components
    pub fn with_components(
        settings: &Settings,
        store: Arc<dyn PriceStore>,
        source: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let subscription_service = SubscriptionService::new(
            store.clone(),
            source.clone(),
            settings.subscription.clone(),
        );
        let sync_service = Arc::new(SyncService::new(store, source, notifier));

        Self {
            subscription_service,
            sync_service,
        }
    }
}
