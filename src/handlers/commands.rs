use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::{error, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::messages;
use crate::services::access::Access;
use crate::services::stats::reporter::ReportOutcome;
use crate::utils::formatting;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "start the bot.")]
    Start,
    #[command(description = "usage statistics (admin only).")]
    Stats,
    #[command(description = "block a user by id (admin only).")]
    Block(i64),
    #[command(description = "unblock a user by id (admin only).")]
    Unblock(i64),
}

pub async fn dispatch(bot: Bot, msg: Message, cmd: Command, data: Arc<Data>) -> Result<(), Error> {
    match cmd {
        Command::Start => start(bot, msg, data).await,
        Command::Stats => stats(bot, msg, data).await,
        Command::Block(user_id) => set_blocked(bot, msg, data, user_id, true).await,
        Command::Unblock(user_id) => set_blocked(bot, msg, data, user_id, false).await,
    }
}

async fn start(bot: Bot, msg: Message, data: Arc<Data>) -> Result<(), Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0.cast_signed();

    match data.access.check(user_id).await {
        Ok(Access::Allowed) => {}
        Ok(Access::Blocked) => {
            bot.send_message(msg.chat.id, messages::BLOCKED).await?;
            return Ok(());
        }
        Err(e) => {
            error!(user_id, error = %e, "Access check failed");
            bot.send_message(msg.chat.id, messages::GENERIC_ERROR).await?;
            return Ok(());
        }
    }

    if let Err(e) = data
        .tracker
        .record_contact(user_id, user.username.as_deref(), Utc::now())
        .await
    {
        error!(user_id, error = %e, "Failed to register user");
        bot.send_message(msg.chat.id, messages::GENERIC_ERROR).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, messages::GREETING).await?;
    Ok(())
}

async fn stats(bot: Bot, msg: Message, data: Arc<Data>) -> Result<(), Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let caller_id = user.id.0.cast_signed();

    match data.reporter.report(caller_id, Utc::now()).await {
        Ok(ReportOutcome::Unauthorized) => {
            bot.send_message(msg.chat.id, messages::ADMIN_ONLY).await?;
        }
        Ok(ReportOutcome::Throttled) => {
            bot.send_message(msg.chat.id, messages::REPORT_THROTTLED)
                .await?;
        }
        Ok(ReportOutcome::Ready(report)) => {
            bot.send_message(msg.chat.id, formatting::render_report(&report))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Err(e) => {
            error!(caller_id, error = %e, "Failed to build stats report");
            bot.send_message(msg.chat.id, messages::GENERIC_ERROR).await?;
        }
    }

    Ok(())
}

/// The out-of-band administrative path that flips `blocked`; nothing in
/// normal traffic ever writes the flag.
async fn set_blocked(
    bot: Bot,
    msg: Message,
    data: Arc<Data>,
    user_id: i64,
    blocked: bool,
) -> Result<(), Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let caller_id = user.id.0.cast_signed();

    if data.settings.admin_id != Some(caller_id) {
        bot.send_message(msg.chat.id, messages::ADMIN_ONLY).await?;
        return Ok(());
    }

    match data.registry.set_blocked(user_id, blocked).await {
        Ok(true) => {
            info!(user_id, blocked, "Admin changed blocked flag");
            let verb = if blocked { "blocked" } else { "unblocked" };
            bot.send_message(msg.chat.id, format!("User {} is now {}.", user_id, verb))
                .await?;
        }
        Ok(false) => {
            bot.send_message(msg.chat.id, format!("No known user with id {}.", user_id))
                .await?;
        }
        Err(e) => {
            error!(user_id, error = %e, "Failed to update blocked flag");
            bot.send_message(msg.chat.id, messages::GENERIC_ERROR).await?;
        }
    }

    Ok(())
}
