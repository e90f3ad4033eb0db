use std::sync::Arc;

use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::config::Settings;
use crate::handlers::commands::{self, Command};
use crate::handlers::message;

pub async fn run(settings: Settings, pool: SqlitePool) -> Result<(), Error> {
    let bot = Bot::new(settings.bot_token.clone());
    let data = Arc::new(Data::new(pool, settings));

    bot.set_my_commands(Command::bot_commands()).await?;

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(commands::dispatch),
        )
        .branch(
            // Plain text only; unrecognized commands are ignored
            dptree::filter(|msg: Message| {
                msg.text().is_some_and(|t| !t.trim_start().starts_with('/'))
            })
            .endpoint(message::handle_link),
        );

    info!("Bot is running...");

    // Each update is dispatched on its own task, so one user's slow download
    // never blocks another's
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![data])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
