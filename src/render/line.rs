use chrono::{Local, SecondsFormat};

use crate::event::ChatEvent;
use crate::util::shorten;

/// Maximum characters of message text shown in compact lines
pub const COMPACT_TEXT_LIMIT: usize = 50;

/// `[HH:MM:SS] @user (kind): text`
pub fn compact(event: &ChatEvent) -> String {
    let time = event.timestamp.with_timezone(&Local).format("%H:%M:%S");
    format!(
        "[{}] {} ({}): {}",
        time,
        event.from.handle(),
        event.chat.kind,
        shorten(event.text_or_empty(), COMPACT_TEXT_LIMIT)
    )
}

/// Single-line JSON-like record. Only the fields below are emitted and only
/// `"`, `\`, newline and tab are escaped.
pub fn json(event: &ChatEvent) -> String {
    format!(
        r#"{{"timestamp":"{}","user_id":{},"username":"{}","chat_id":{},"text":"{}"}}"#,
        event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        event.from.id,
        escape(&event.from.username_or_id()),
        event.chat.id,
        escape(event.text_or_empty())
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
