//! Price synchronization workflow
//!
//! Re-scrapes every tracked good, removes goods nobody follows any more and
//! alerts users whose recorded price is now above the current price.

use std::sync::Arc;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use crate::database::PriceStore;
use crate::models::Good;
use crate::services::notification::{Notifier, format_price_drop_message};
use crate::services::scraper::PriceSource;
use crate::utils::errors::Result;
use crate::utils::logging::{log_good_failure, log_notification, log_sync_summary};

/// Counters for one sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Goods looked at
    pub checked: usize,
    /// Goods deleted because nobody subscribes to them
    pub removed: usize,
    /// Goods re-scraped and stored
    pub updated: usize,
    pub price_changed: usize,
    /// Alerts delivered
    pub notified: usize,
    /// Goods whose processing failed
    pub failed: usize,
}

enum GoodOutcome {
    Removed,
    Synced { price_changed: bool, notified: usize },
}

pub struct SyncService {
    store: Arc<dyn PriceStore>,
    source: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
}

impl SyncService {
    pub fn new(store: Arc<dyn PriceStore>, source: Arc<dyn PriceSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, source, notifier }
    }

    /// Run one pass over every tracked good.
    ///
    /// Goods are processed one after another. A failure on one good is
    /// logged and counted, and the pass moves on to the next good. Only a
    /// failure to list the goods aborts the pass.
    pub async fn run(&self) -> Result<SyncReport> {
        debug!("Price sync started");
        let goods = self.store.all_goods().await?;
        let mut report = SyncReport::default();

        for good in goods {
            report.checked += 1;
            match self.sync_good(&good).await {
                Ok(GoodOutcome::Removed) => report.removed += 1,
                Ok(GoodOutcome::Synced { price_changed, notified }) => {
                    report.updated += 1;
                    report.notified += notified;
                    if price_changed {
                        report.price_changed += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    log_good_failure(&good.id, &e);
                }
            }
        }

        log_sync_summary(&report);
        Ok(report)
    }

    async fn sync_good(&self, good: &Good) -> Result<GoodOutcome> {
        if self.store.delete_good_if_unreferenced(&good.id).await? {
            info!(good_id = %good.id, "Removed good without subscriptions");
            return Ok(GoodOutcome::Removed);
        }

        let latest = self.source.fetch_good(&good.id).await?;
        self.store.upsert_good(&latest).await?;

        let price_changed = latest.price != good.price;
        if price_changed {
            let reset = self.store.reset_notified(&good.id).await?;
            info!(
                good_id = %good.id,
                old_price = good.price,
                new_price = latest.price,
                reset = reset,
                "Price changed"
            );
        }

        let alerts = self.store.find_pending_alerts(&good.id, latest.price).await?;
        let mut delivered = Vec::with_capacity(alerts.len());

        for alert in &alerts {
            let text = format_price_drop_message(&latest.name, latest.price, alert.recorded_price);
            let success = self.notifier.send(alert.chat_id, &text).await.is_ok();
            log_notification(&good.id, alert.user_id, alert.chat_id, success);
            if success {
                delivered.push(alert.subscription_id);
            }
        }

        self.store.mark_notified(&delivered).await?;

        Ok(GoodOutcome::Synced {
            price_changed,
            notified: delivered.len(),
        })
    }

    /// Run a pass every `period` until the task is dropped.
    ///
    /// The first pass starts immediately. A pass that overruns the period
    /// delays the next one instead of stacking runs.
    pub async fn run_periodic(self: Arc<Self>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.run().await {
                tracing::error!(error = %e, "Price sync pass aborted");
            }
        }
    }
}
