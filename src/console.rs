use std::fmt::Display;
use std::sync::Arc;

use crate::event::{ChatKind, RawMessage};
use crate::extract::extract;
use crate::output::{LineWriter, TracingWriter};
use crate::render::{self, RenderConfig};

/// Local-only logger that prints fully rendered events.
///
/// Unlike the fallback path of [`crate::TeleLogger`], output here goes through
/// the configured format with colors and every enabled field.
pub struct ConsoleLogger {
    config: RenderConfig,
    writer: Arc<dyn LineWriter>,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl ConsoleLogger {
    pub fn new(config: RenderConfig) -> Self {
        let writer = config
            .writer
            .clone()
            .unwrap_or_else(|| Arc::new(TracingWriter));
        Self { config, writer }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn log_message(&self, raw: &RawMessage, kind_hint: ChatKind) {
        let event = extract(raw, kind_hint);
        self.writer.write_line(&render::render(&event, &self.config));
    }

    pub fn log_command(&self, raw: &RawMessage, command: &str) {
        let event = extract(raw, raw.chat.kind);
        self.writer
            .write_line(&render::render_command(&event, command, self.config.colorize));
    }

    pub fn log_error(
        &self,
        raw: &RawMessage,
        error: Option<&(dyn Display + Sync)>,
        context: &str,
    ) {
        let event = extract(raw, raw.chat.kind);
        self.writer.write_line(&render::render_error(
            &event,
            error.map(|e| e as &dyn Display),
            context,
            self.config.colorize,
        ));
    }
}
