use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};
use tracing::error;

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::messages;
use crate::services::access::Access;
use crate::services::download::{DownloadOutcome, MediaSink};

/// Sends the fetched artifact back through the chat that asked for it
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

#[async_trait]
impl MediaSink for TelegramSink {
    async fn send_media(&self, file: &Path) -> Result<(), Error> {
        self.bot
            .send_video(self.chat_id, InputFile::file(file.to_path_buf()))
            .await?;
        Ok(())
    }
}

/// Plain-text messages are treated as download requests
pub async fn handle_link(bot: Bot, msg: Message, data: Arc<Data>) -> Result<(), Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let url = text.trim().to_string();
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

    // A store failure means the request fails; we never proceed as if the
    // user were registered
    if let Err(e) = data
        .tracker
        .record_contact(user_id, user.username.as_deref(), Utc::now())
        .await
    {
        error!(user_id, error = %e, "Failed to record user activity");
        bot.send_message(msg.chat.id, messages::GENERIC_ERROR).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, messages::DOWNLOADING).await?;

    let sink = TelegramSink {
        bot: bot.clone(),
        chat_id: msg.chat.id,
    };

    match data.downloads.handle(&url, &sink).await {
        DownloadOutcome::Delivered => {}
        // Details are already in the operator logs; the user gets the
        // generic text either way
        DownloadOutcome::Failed(_) => {
            bot.send_message(msg.chat.id, messages::DOWNLOAD_FAILED)
                .await?;
        }
    }

    Ok(())
}
