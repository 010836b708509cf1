//! Micro payment Telegram bot - Main executable
//!
//! Connects to a wallet on an EVM test network, sends small native transfers,
//! and keeps a local history whose pending entries are polled until confirmed.
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use micropay_history_bot::{
    create_application, AppConfig, Command, FileStore, KeyValueStore, PostgresStore, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use teloxide::{dptree, prelude::*, utils::command::BotCommands};

/// Pick the history backend: Postgres when configured, local files otherwise
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .context("Failed to create database connection pool")?;

            let store = PostgresStore::new(Arc::new(db_pool));
            store.migrate().await.context("Failed to run migrations")?;

            Ok(Arc::new(store))
        }
        None => {
            info!("Storing history under {}", config.history_dir);
            let store = FileStore::open(&config.history_dir)
                .await
                .context("Failed to open history directory")?;

            Ok(Arc::new(store))
        }
    }
}

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!(
        "Starting micro payment bot v{}",
        micropay_history_bot::VERSION
    );

    let config = AppConfig::from_env()
        .context("TELEGRAM_BOT_TOKEN and OWNER_CHAT_ID must be set in environment variables")?;

    let store = open_store(&config).await?;

    let bot = Bot::new(config.telegram_bot_token.clone());

    info!("Initializing bot application...");
    let (router, bot, services, storage) = create_application(bot, &config, store);

    bot.set_my_commands(Command::bot_commands())
        .await
        .context("Failed to register bot commands")?;

    // Start status polling in the background
    let status_poller = services.status_poller();
    status_poller.start().await;

    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services, storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    info!("Stopping status poller...");
    status_poller.stop().await;

    Ok(())
}
