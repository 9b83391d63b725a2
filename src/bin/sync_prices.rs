//! One-shot price sync
//!
//! Runs a single sync pass over every tracked product and exits.

use std::sync::Arc;
use anyhow::Context;
use teloxide::Bot;
use tracing::info;

use price_tracker::{
    config::Settings,
    utils::logging,
    database::{DatabaseConfig, DatabaseService, PriceStore, create_pool, run_migrations},
    services::ServiceFactory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::new().context("failed to load settings")?;
    settings.validate().context("invalid settings")?;

    let _log_guard = logging::init_logging(&settings.logging)?;

    let db_pool = create_pool(&DatabaseConfig::from(&settings.database))
        .await
        .context("failed to connect to database")?;
    run_migrations(&db_pool).await?;

    let store: Arc<dyn PriceStore> = Arc::new(DatabaseService::new(db_pool));
    let bot = Bot::new(&settings.bot.token);
    let services = ServiceFactory::new(bot, &settings, store)?;

    let report = services.sync_service.run().await?;
    info!(
        checked = report.checked,
        removed = report.removed,
        notified = report.notified,
        failed = report.failed,
        "One-shot price sync complete"
    );

    Ok(())
}
