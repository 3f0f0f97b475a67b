use chrono::{DateTime, Local};
use std::fmt::{Display, Write};

use crate::event::{ChatEvent, DeployRecord};
use crate::util::{escape_html, escape_html_capped, MAX_REMOTE_CHARS, TIMESTAMP_FORMAT};

/// Shown in place of the error text when the caller has no error value
pub const DEFAULT_ERROR_TEXT: &str = "unknown error";

fn glyph(glyph: &str, color: u8, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{color}m{glyph}\x1b[0m")
    } else {
        glyph.to_string()
    }
}

/// `⚡ Command from @user in <chat>: /<command>`
pub fn render_command(event: &ChatEvent, command: &str, colorize: bool) -> String {
    format!(
        "{} Command from {} in {}: /{}",
        glyph("⚡", 35, colorize),
        event.from.handle(),
        event.chat.title,
        command.trim_start_matches('/')
    )
}

/// `❌ Error in <chat>: <error> (Context: <context>)`
pub fn render_error(
    event: &ChatEvent,
    error: Option<&dyn Display>,
    context: &str,
    colorize: bool,
) -> String {
    let error = error.map_or_else(|| DEFAULT_ERROR_TEXT.to_string(), ToString::to_string);
    format!(
        "{} Error in {}: {} (Context: {})",
        glyph("❌", 31, colorize),
        event.chat.title,
        error,
        context
    )
}

const REPORT_CONTEXT_LIMIT: usize = 256;
const REPORT_ERROR_LIMIT: usize = 1024;

/// HTML-marked error report for the log chat.
///
/// The message text is shortened so the whole report, error line included,
/// stays within [`MAX_REMOTE_CHARS`].
pub fn error_report(
    event: &ChatEvent,
    error: Option<&dyn Display>,
    context: &str,
    now: DateTime<Local>,
) -> String {
    let error = error.map_or_else(|| DEFAULT_ERROR_TEXT.to_string(), ToString::to_string);
    let first_name = event.from.first_name.as_deref().unwrap_or_default();
    let context = escape_html_capped(context, REPORT_CONTEXT_LIMIT);
    let error = escape_html_capped(&error, REPORT_ERROR_LIMIT);
    let user = escape_html(&event.from.handle());
    let first_name = escape_html(first_name);
    let chat = escape_html(&event.chat.title);
    let time = now.format("%H:%M:%S").to_string();

    let report = |message: &str| {
        format!(
            "🚨 <b>ERROR</b>\n\n\
             <b>Context:</b> {context}\n\
             <b>Message:</b> {message}\n\
             <b>User:</b> {user} ({first_name})\n\
             <b>Chat:</b> {chat}\n\
             <b>Time:</b> {time}\n\n\
             <b>Error:</b> <code>{error}</code>"
        )
    };

    let budget = MAX_REMOTE_CHARS.saturating_sub(report("").chars().count());
    report(&escape_html_capped(event.text_or_empty(), budget))
}

/// Release announcement with the well-known fields first, then any extras in
/// insertion order.
pub fn deploy_message(
    record: &DeployRecord,
    bot_username: Option<&str>,
    now: DateTime<Local>,
) -> String {
    let generated = now.format(TIMESTAMP_FORMAT).to_string();

    let mut extras = String::new();
    for (key, value) in record.extras() {
        let _ = writeln!(extras, "• {key}: {value}");
    }
    if !extras.is_empty() {
        extras.insert_str(0, "\n📊 Additional info:\n");
    }

    format!(
        "🚀 DEPLOY NOTIFICATION\n\n\
         📦 version: {}\n\
         🔧 environment: {}\n\
         🌿 branch: {}\n\
         📝 commit_hash: {}\n\
         👤 deployer: {}\n\
         ⏰ timestamp: {}\n\
         🤖 bot: @{}\n\
         {}\n\
         ✅ Deploy completed successfully!",
        record.get_or("version", "unknown"),
        record.get_or("environment", "production"),
        record.get_or("branch", "unknown"),
        record.get_or("commit_hash", "unknown"),
        record.get_or("deployer", "unknown"),
        record.get_or("timestamp", &generated),
        bot_username.filter(|name| !name.is_empty()).unwrap_or("unknown"),
        extras
    )
}
