//! Price Tracker Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{info, warn, error};

use price_tracker::{
    config::Settings,
    utils::logging,
    database::{DatabaseConfig, DatabaseService, PriceStore, create_pool, run_migrations},
    services::ServiceFactory,
    handlers::{Command, handle_command},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", price_tracker::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    // Run database migrations
    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let store: Arc<dyn PriceStore> = Arc::new(DatabaseService::new(db_pool));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(bot.clone(), &settings, store)?;

    let sync_task = match settings.sync.interval() {
        Some(period) => {
            info!(interval_seconds = period.as_secs(), "Starting periodic price sync");
            Some(tokio::spawn(services.sync_service.clone().run_periodic(period)))
        }
        None => {
            warn!("Periodic price sync disabled");
            None
        }
    };

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![services])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    if let Some(task) = sync_task {
        task.abort();
    }

    info!("Price tracker has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_commands)
}

/// Handle bot commands
async fn handle_commands(bot: Bot, msg: Message, cmd: Command, services: ServiceFactory) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, services).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}
