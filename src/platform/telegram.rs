use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{Chat, ChatId, ParseMode};
use tracing::{info, warn};

use crate::dispatch::TeleLogger;
use crate::error::TelelogError;
use crate::event::{
    Attachments, ChatKind, RawChat, RawDocument, RawLocation, RawMessage, RawSticker, RawUser,
};
use crate::transport::{Markup, Transport};

/// [`Transport`] backed by a teloxide bot
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<Markup>,
    ) -> crate::error::Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(Markup::Html) = markup {
            request = request.parse_mode(ParseMode::Html);
        }

        request
            .await
            .map(|_| ())
            .map_err(|e| TelelogError::Transport {
                chat_id,
                reason: e.to_string(),
            })
    }
}

fn chat_kind(chat: &Chat) -> ChatKind {
    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_group() {
        ChatKind::Group
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Unknown
    }
}

impl TryFrom<&Message> for RawMessage {
    type Error = TelelogError;

    fn try_from(msg: &Message) -> Result<Self, Self::Error> {
        let user = msg.from.as_ref().ok_or(TelelogError::MissingSender {
            message_id: msg.id.0,
        })?;

        Ok(RawMessage {
            message_id: msg.id.0,
            date: msg.date.timestamp(),
            from: RawUser {
                id: user.id.0 as i64,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                username: user.username.clone(),
                language_code: user.language_code.clone(),
                is_bot: user.is_bot,
            },
            chat: RawChat {
                id: msg.chat.id.0,
                title: msg.chat.title().map(str::to_string),
                kind: chat_kind(&msg.chat),
            },
            text: msg.text().map(str::to_string),
            attachments: Attachments {
                photo: msg.photo().is_some_and(|sizes| !sizes.is_empty()),
                sticker: msg.sticker().map(|s| RawSticker {
                    emoji: s.emoji.clone(),
                }),
                document: msg.document().map(|d| RawDocument {
                    file_name: d.file_name.clone(),
                    mime_type: d.mime_type.as_ref().map(ToString::to_string),
                }),
                voice: msg.voice().map(|v| v.duration.seconds()),
                location: msg.location().map(|l| RawLocation {
                    latitude: l.latitude,
                    longitude: l.longitude,
                }),
                video: msg.video().map(|v| v.duration.seconds()),
            },
            reply_to_message_id: msg.reply_to_message().map(|m| m.id.0),
            forward_from_user_id: msg.forward_from_user().map(|u| u.id.0 as i64),
        })
    }
}

/// Command name from `/name@bot args`, without the slash or bot suffix.
pub fn command_token(text: Option<&str>) -> Option<&str> {
    let rest = text?.strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    (!name.is_empty()).then_some(name)
}

/// Log every message the bot receives until the dispatcher stops.
pub async fn run(bot: Bot, logger: Arc<TeleLogger>) -> Result<()> {
    info!("Starting Telegram message logging...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![logger])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telelog"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(msg: Message, logger: Arc<TeleLogger>) -> ResponseResult<()> {
    let raw = match RawMessage::try_from(&msg) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping message: {}", e);
            return Ok(());
        }
    };

    match command_token(raw.text.as_deref()) {
        Some(command) => logger.log_command(&raw, command).await,
        None => logger.log_message(&raw, raw.chat.kind).await,
    }

    Ok(())
}
