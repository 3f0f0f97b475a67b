use std::fmt::Write;

use super::Formatter;
use crate::event::ChatEvent;
use crate::util::safe_string;

/// `username: text`
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFormatter;

impl Formatter for SimpleFormatter {
    fn format(&self, event: &ChatEvent) -> String {
        format!("{}: {}", event.from.username_or_id(), event.text_or_empty())
    }
}

/// Dumps every extracted field, for debugging handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugFormatter;

impl Formatter for DebugFormatter {
    fn format(&self, event: &ChatEvent) -> String {
        let user = &event.from;
        let mut out = String::from("=== DEBUG MESSAGE ===\n");

        let _ = writeln!(
            out,
            "User: ID={}, First={}, Last={}, @{}, Lang={}, Bot={}",
            user.id,
            user.first_name.as_deref().unwrap_or_default(),
            user.last_name.as_deref().unwrap_or_default(),
            user.username.as_deref().unwrap_or_default(),
            user.language_code.as_deref().unwrap_or_default(),
            user.is_bot
        );
        let _ = writeln!(
            out,
            "Chat: ID={}, Title={}, Type={}",
            event.chat.id, event.chat.title, event.chat.kind
        );
        let _ = writeln!(
            out,
            "Time: {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S%.3f")
        );
        let _ = writeln!(out, "Text: {}", safe_string(event.text_or_empty()));

        if let Some(media) = &event.media {
            let _ = writeln!(out, "Media: Type={}", media.kind());
        }
        if let Some(reply_to) = event.reply_to_id {
            let _ = writeln!(out, "ReplyTo: {reply_to}");
        }

        out
    }
}
