//! Live status message in a Discord channel.
//!
//! One message is kept up to date by editing it on every tick. When the
//! server comes online (or the message is lost) the bot's old messages are
//! cleared and a fresh one is posted, so the channel notifies subscribers.

use lantern_core::{ReferenceZone, StatusBoard, StatusView};
use poise::serenity_prelude::{
    self as serenity, ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage,
    GetMessages, Http, MessageId, Timestamp, UserId,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::helpers;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}

/// Build the status embed shown both in the live message and by `/status`.
pub fn status_embed(view: &StatusView, zone: ReferenceZone, refresh: Duration) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(helpers::status_title(view))
        .description("💠 **Status overview**")
        .color(view.color.rgb())
        .field("⏱️ Uptime", view.uptime_text(), true)
        .field("👥 Players online", helpers::players_line(view), true)
        .field("📊 Online today", helpers::activity_lines(view), false)
        .footer(CreateEmbedFooter::new(format!(
            "🕒 Last update: {} • refreshes every {} seconds",
            helpers::last_update_text(view, zone),
            refresh.as_secs()
        )));

    match view
        .last_update
        .and_then(|at| Timestamp::from_unix_timestamp(at.timestamp()).ok())
    {
        Some(ts) => embed.timestamp(ts),
        None => embed,
    }
}

pub struct StatusMessage {
    http: Arc<Http>,
    channel: ChannelId,
    bot_user: UserId,
    message: Option<MessageId>,
    history_limit: u8,
    zone: ReferenceZone,
    refresh: Duration,
}

impl StatusMessage {
    pub fn new(
        http: Arc<Http>,
        channel: ChannelId,
        bot_user: UserId,
        history_limit: u8,
        zone: ReferenceZone,
        refresh: Duration,
    ) -> Self {
        Self {
            http,
            channel,
            bot_user,
            message: None,
            history_limit,
            zone,
            refresh,
        }
    }

    /// Post or edit the status message for `view`.
    pub async fn publish(&mut self, view: &StatusView, recreate: bool) -> Result<(), PublishError> {
        let embed = status_embed(view, self.zone, self.refresh);

        let existing = match self.message {
            Some(id) if !recreate => id,
            _ => {
                self.purge_own_messages().await?;
                return self.post(embed).await;
            }
        };

        let edited = self
            .channel
            .edit_message(
                self.http.as_ref(),
                existing,
                EditMessage::new().embed(embed.clone()),
            )
            .await;
        match edited {
            Ok(_) => Ok(()),
            Err(err) => {
                debug!(error = %err, "editing status message failed, posting a new one");
                self.post(embed).await
            }
        }
    }

    async fn post(&mut self, embed: CreateEmbed) -> Result<(), PublishError> {
        let http: &Http = &self.http;
        let message = self
            .channel
            .send_message(http, CreateMessage::new().embed(embed))
            .await?;
        info!(message_id = %message.id, "posted status message");
        self.message = Some(message.id);
        Ok(())
    }

    /// Delete this bot's messages among the most recent ones in the channel.
    async fn purge_own_messages(&mut self) -> Result<(), PublishError> {
        let http: &Http = &self.http;
        let recent = self
            .channel
            .messages(http, GetMessages::new().limit(self.history_limit))
            .await?;

        for message in recent.iter().filter(|m| m.author.id == self.bot_user) {
            if let Err(err) = self.channel.delete_message(http, message.id).await {
                warn!(message_id = %message.id, error = %err, "could not delete old status message");
            }
        }
        self.message = None;
        Ok(())
    }
}

/// Keep the channel message in sync with the board until the board goes away.
pub async fn run_status_message(mut message: StatusMessage, board: StatusBoard) {
    let mut updates = board.subscribe();
    while updates.changed().await.is_ok() {
        let view = updates.borrow_and_update().clone();
        let recreate = board.take_became_online();
        if let Err(err) = message.publish(&view, recreate).await {
            warn!(error = %err, "could not update status message");
        }
    }
}
