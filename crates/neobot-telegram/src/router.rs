use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};

use neobot_core::{
    chart::PngBarChart,
    commands::{Command, CommandRouter},
    config::Config,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    ports::AstronomyApi,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CommandRouter>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>, api: Arc<dyn AstronomyApi>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "neobot started"),
        Err(e) => tracing::warn!(error = %e, "get_me failed"),
    }
    tracing::info!(locale = ?cfg.locale, nasa_api_base = %cfg.nasa_api_base, "configuration loaded");

    // Best-effort: the slash menu in Telegram clients.
    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        tracing::warn!(error = %e, "failed to register bot commands");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        MessagingCapabilities {
            max_message_len: cfg.telegram_message_limit,
            max_caption_len: cfg.telegram_caption_limit,
        },
    ));
    let router = Arc::new(CommandRouter::new(
        api,
        Arc::new(PngBarChart::default()),
        cfg.locale,
    ));

    let state = Arc::new(AppState {
        router,
        messenger,
    });

    let handler = Update::filter_message().endpoint(handlers::handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("dispatcher stopped");
    Ok(())
}

/// One entry per command, under its primary slash name.
pub fn bot_commands() -> Vec<BotCommand> {
    Command::ALL
        .iter()
        .filter_map(|&cmd| {
            let name = cmd.slash_names().first()?;
            Some(BotCommand::new(*name, describe(cmd)))
        })
        .collect()
}

fn describe(cmd: Command) -> &'static str {
    match cmd {
        Command::Start => "Show the menu",
        Command::Today => "Objects approaching today",
        Command::Tomorrow => "Objects approaching tomorrow",
        Command::Yesterday => "Objects that passed yesterday",
        Command::Dangerous => "Potentially hazardous objects today",
        Command::Large => "Objects over 100 m today",
        Command::Small => "Objects under 20 m today",
        Command::Week => "Objects over the coming week",
        Command::PictureOfTheDay => "Astronomy Picture of the Day",
        Command::Chart => "Miss distances of today's objects",
    }
}
