use chrono::Local;
use std::fmt::Write;

use super::RenderConfig;
use crate::event::{ChatEvent, Media};

const INDENT: &str = "   ";

/// Multi-line report, one labelled field per line.
pub fn render_text(event: &ChatEvent, config: &RenderConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", config.label("📥", 36, "INCOMING MESSAGE:"));

    if config.include_date {
        let date = event.timestamp.with_timezone(&Local);
        let _ = writeln!(
            out,
            "{INDENT}{} {}",
            config.label("📅", 33, "Date:"),
            date.format("%Y-%m-%d %H:%M:%S")
        );
    }

    if config.include_user {
        let user = &event.from;
        let handle = match user.username.as_deref() {
            Some(name) => format!(", @{name}"),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "{INDENT}{} {} (ID: {}{})",
            config.label("👤", 34, "User:"),
            user.full_name(),
            user.id,
            handle
        );
    }

    if config.include_chat {
        let _ = writeln!(
            out,
            "{INDENT}{} {} (ID: {}, Type: {})",
            config.label("💬", 35, "Chat:"),
            event.chat.title,
            event.chat.id,
            event.chat.kind
        );
    }

    if let Some(text) = &event.text {
        let _ = writeln!(out, "{INDENT}{} {}", config.label("📝", 32, "Text:"), text);
    }

    if config.include_media {
        if let Some(media) = &event.media {
            let _ = writeln!(out, "{INDENT}{}", media_line(media, config));
        }
    }

    if let Some(reply_to) = event.reply_to_id {
        let _ = writeln!(
            out,
            "{INDENT}{} {}",
            config.label("↪️", 90, "Reply to:"),
            reply_to
        );
    }

    if let Some(user_id) = event.forward_from_user_id {
        let _ = writeln!(
            out,
            "{INDENT}{} {}",
            config.label("↩️", 90, "Forwarded from user ID:"),
            user_id
        );
    }

    // Only the newline written after the last line
    out.pop();
    out
}

fn media_line(media: &Media, config: &RenderConfig) -> String {
    match media {
        Media::Photo => config.label("📸", 36, "Photo"),
        Media::Sticker { emoji } => format!(
            "{} {}",
            config.label("🎭", 36, "Sticker:"),
            emoji.as_deref().unwrap_or_default()
        ),
        Media::Document { file_name, .. } => format!(
            "{} {}",
            config.label("📎", 36, "Document:"),
            file_name.as_deref().unwrap_or("(no name)")
        ),
        Media::Voice { duration_seconds } => format!(
            "{} {} sec",
            config.label("🎤", 36, "Voice:"),
            duration_seconds
        ),
        Media::Location {
            latitude,
            longitude,
        } => format!(
            "{} lat={:.6}, lon={:.6}",
            config.label("📍", 36, "Location:"),
            latitude,
            longitude
        ),
        Media::Video { duration_seconds } => format!(
            "{} {} sec",
            config.label("🎬", 36, "Video:"),
            duration_seconds
        ),
    }
}
