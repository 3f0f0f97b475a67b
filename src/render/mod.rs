pub mod formatters;
pub mod line;
pub mod templates;
pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::event::ChatEvent;
use crate::output::LineWriter;

pub use formatters::{DebugFormatter, SimpleFormatter};
pub use templates::{
    deploy_message, error_report, render_command, render_error, DEFAULT_ERROR_TEXT,
};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Compact,
    Json,
    Custom,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Compact => write!(f, "compact"),
            Format::Json => write!(f, "json"),
            Format::Custom => write!(f, "custom"),
        }
    }
}

/// Caller-supplied rendering strategy that replaces the built-in formats.
///
/// Any `Fn(&ChatEvent) -> String` closure is a formatter.
pub trait Formatter: Send + Sync {
    fn format(&self, event: &ChatEvent) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&ChatEvent) -> String + Send + Sync,
{
    fn format(&self, event: &ChatEvent) -> String {
        self(event)
    }
}

/// Rendering options shared by every logger.
#[derive(Clone)]
pub struct RenderConfig {
    pub format: Format,
    pub include_emojis: bool,
    pub include_date: bool,
    pub include_user: bool,
    pub include_chat: bool,
    pub include_media: bool,
    pub colorize: bool,
    /// Overrides `format` entirely when set
    pub custom_formatter: Option<Arc<dyn Formatter>>,
    /// Destination for local output; `None` means the tracing writer
    pub writer: Option<Arc<dyn LineWriter>>,
}

/// Text format, every field, colorized, no hooks.
pub const DEFAULT_OPTIONS: RenderConfig = RenderConfig {
    format: Format::Text,
    include_emojis: true,
    include_date: true,
    include_user: true,
    include_chat: true,
    include_media: true,
    colorize: true,
    custom_formatter: None,
    writer: None,
};

impl Default for RenderConfig {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("format", &self.format)
            .field("include_emojis", &self.include_emojis)
            .field("include_date", &self.include_date)
            .field("include_user", &self.include_user)
            .field("include_chat", &self.include_chat)
            .field("include_media", &self.include_media)
            .field("colorize", &self.colorize)
            .field("custom_formatter", &self.custom_formatter.is_some())
            .field("writer", &self.writer.is_some())
            .finish()
    }
}

impl RenderConfig {
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.custom_formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn LineWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Same options with ANSI colors off, for payloads leaving the terminal.
    pub fn without_color(&self) -> Self {
        self.clone().with_colorize(false)
    }

    /// Line prefix for one labelled field: ANSI-colored glyph, plain glyph,
    /// or nothing, followed by the label.
    pub(crate) fn label(&self, glyph: &str, color: u8, label: &str) -> String {
        if self.colorize {
            format!("\x1b[{color}m{glyph}\x1b[0m {label}")
        } else if self.include_emojis {
            format!("{glyph} {label}")
        } else {
            label.to_string()
        }
    }
}

/// Render an event with the configured strategy.
pub fn render(event: &ChatEvent, config: &RenderConfig) -> String {
    if let Some(formatter) = &config.custom_formatter {
        return formatter.format(event);
    }
    match config.format {
        Format::Compact => line::compact(event),
        Format::Json => line::json(event),
        // Custom without a hook has nothing to delegate to
        Format::Text | Format::Custom => text::render_text(event, config),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_event;
    use super::*;

    #[test]
    fn test_default_options() {
        let config = RenderConfig::default();
        assert_eq!(config.format, Format::Text);
        assert!(config.include_emojis && config.include_date && config.include_user);
        assert!(config.include_chat && config.include_media && config.colorize);
        assert!(config.custom_formatter.is_none());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(Format::Json.to_string(), "json");
        assert_eq!(Format::Compact.to_string(), "compact");
    }

    #[test]
    fn test_custom_formatter_overrides_format() {
        let config = RenderConfig::default()
            .with_format(Format::Json)
            .with_formatter(|event: &ChatEvent| format!("custom:{}", event.message_id));
        assert_eq!(render(&sample_event(), &config), "custom:123");
    }

    #[test]
    fn test_custom_format_without_hook_renders_text() {
        let config = RenderConfig::default()
            .with_format(Format::Custom)
            .with_colorize(false);
        assert!(render(&sample_event(), &config).starts_with("📥 INCOMING MESSAGE:"));
    }

    #[test]
    fn test_label_variants() {
        let mut config = RenderConfig::default();
        assert_eq!(config.label("📅", 33, "Date:"), "\x1b[33m📅\x1b[0m Date:");
        config.colorize = false;
        assert_eq!(config.label("📅", 33, "Date:"), "📅 Date:");
        config.include_emojis = false;
        assert_eq!(config.label("📅", 33, "Date:"), "Date:");
    }
}
