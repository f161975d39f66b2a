use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recipe_finder::bot;
use recipe_finder::localization::init_localization;
use recipe_finder::lookup::RecipeLookup;
use recipe_finder::lookup_config::LookupConfig;
use recipe_finder::recipe_source::build_source;
use recipe_finder::session::WidgetSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Recipe Finder Telegram Bot");

    init_localization()?;

    // Get bot token from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

    let config = LookupConfig::from_env();
    let source = build_source(&config)?;
    let lookup = Arc::new(RecipeLookup::new(source, &config));
    info!(
        mode = config.mode.name(),
        base_url = %config.base_url,
        detail_concurrency = config.detail_concurrency,
        "Recipe lookup configured"
    );

    // Initialize the bot
    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<WidgetSession>, WidgetSession>()
                .endpoint(bot::message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<WidgetSession>, WidgetSession>()
                .endpoint(bot::callback_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<WidgetSession>::new(), lookup])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
