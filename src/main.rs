use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telelog::config::Config;
use telelog::platform::{telegram, TelegramTransport};
use telelog::{LoggerOptions, TeleLogger, Transport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telelog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Log chat: {}", config.telegram.log_chat_id);
    info!("  Format: {}", config.logging.format);

    let bot = Bot::new(&config.telegram.bot_token);

    // Learn our own identity so the bot's messages are not logged back
    let (bot_id, bot_username) = match bot.get_me().await {
        Ok(me) => (Some(me.user.id.0 as i64), me.user.username.clone()),
        Err(e) => {
            warn!("Could not fetch bot identity: {}", e);
            (None, None)
        }
    };

    let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(bot.clone()));
    let logger = Arc::new(TeleLogger::new(LoggerOptions {
        transport: Some(transport),
        log_chat_id: config.telegram.log_chat_id,
        bot_id,
        bot_username: config.telegram.bot_username.clone().or(bot_username),
        render: config.logging.render_config(),
    }));

    if config.deploy.notify_on_start {
        let record = config.deploy.record(env!("CARGO_PKG_VERSION"));
        logger.send_deploy_notification(&record).await;
    }

    telegram::run(bot, logger).await?;

    Ok(())
}
