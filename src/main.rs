use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pawcheck::bot::{self, BotContext};
use pawcheck::config::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting PawCheck Telegram bot");

    let config = AppConfig::from_env()?;
    info!(
        api = %config.lookup.base_url,
        ocr_languages = %config.ocr.languages,
        cache_capacity = config.report_cache_capacity,
        extra_harmful = config.extra_harmful_terms.len(),
        extra_moderate = config.extra_moderate_terms.len(),
        "Configuration loaded"
    );

    let context = Arc::new(BotContext::new(&config));
    let bot = Bot::new(&config.bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let context = Arc::clone(&context);
        move |bot: Bot, msg: Message| {
            let context = Arc::clone(&context);
            async move { bot::message_handler(bot, msg, context).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
