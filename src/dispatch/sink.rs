use async_trait::async_trait;
use chrono::Local;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

use crate::event::{ChatEvent, DeployRecord};
use crate::output::LineWriter;
use crate::render::{self, RenderConfig};
use crate::transport::{Markup, Transport};
use crate::util::truncate_payload;

/// One thing to be logged, borrowed from the caller for the duration of a call.
#[derive(Clone, Copy)]
pub enum LogRecord<'a> {
    Message {
        event: &'a ChatEvent,
    },
    Command {
        event: &'a ChatEvent,
        command: &'a str,
    },
    Error {
        event: &'a ChatEvent,
        error: Option<&'a (dyn Display + Sync)>,
        context: &'a str,
    },
    Deploy(&'a DeployRecord),
}

impl LogRecord<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            LogRecord::Message { .. } => "message",
            LogRecord::Command { .. } => "command",
            LogRecord::Error { .. } => "error",
            LogRecord::Deploy(_) => "deploy",
        }
    }

    fn error_text(error: Option<&(dyn Display + Sync)>) -> String {
        error.map_or_else(
            || render::DEFAULT_ERROR_TEXT.to_string(),
            |e| e.to_string(),
        )
    }
}

/// Where a log record ends up. Emitting never fails from the caller's view.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn emit(&self, record: LogRecord<'_>);
}

fn one_line(text: &str) -> String {
    text.replace("\r\n", " ⏎ ").replace(['\n', '\r'], " ⏎ ")
}

/// Writes one short summary line per record to the local writer.
#[derive(Clone)]
pub struct LocalSink {
    writer: Arc<dyn LineWriter>,
}

impl LocalSink {
    pub fn new(writer: Arc<dyn LineWriter>) -> Self {
        Self { writer }
    }

    pub fn summary(record: &LogRecord<'_>) -> String {
        match *record {
            LogRecord::Message { event } => format!(
                "📨 Message from {} in {}: {}",
                event.from.handle(),
                event.chat.kind,
                one_line(event.text_or_empty())
            ),
            LogRecord::Command { event, command } => format!(
                "⚡ Command /{} from {}",
                command.trim_start_matches('/'),
                event.from.handle()
            ),
            LogRecord::Error {
                event,
                error,
                context,
            } => format!(
                "❌ Error [{}] from {}: {}",
                one_line(context),
                event.from.handle(),
                one_line(&LogRecord::error_text(error))
            ),
            LogRecord::Deploy(info) => {
                let fields = info
                    .iter()
                    .map(|(k, v)| format!("{k}={}", one_line(v)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("🚀 Deploy notification: {fields}")
            }
        }
    }
}

#[async_trait]
impl LogSink for LocalSink {
    async fn emit(&self, record: LogRecord<'_>) {
        self.writer.write_line(&Self::summary(&record));
    }
}

/// Renders records in full and sends them to the log chat.
pub struct RemoteSink<'a> {
    pub transport: &'a dyn Transport,
    pub chat_id: i64,
    /// Must have colors off; ANSI escapes mean nothing in a chat client
    pub config: &'a RenderConfig,
    pub bot_username: Option<&'a str>,
}

impl RemoteSink<'_> {
    /// Payload and markup hint for a record, before truncation.
    pub fn payload(&self, record: &LogRecord<'_>) -> (String, Option<Markup>) {
        match *record {
            LogRecord::Message { event } => (render::render(event, self.config), None),
            LogRecord::Command { event, command } => {
                (render::render_command(event, command, false), None)
            }
            LogRecord::Error {
                event,
                error,
                context,
            } => (
                render::error_report(
                    event,
                    error.map(|e| e as &dyn Display),
                    context,
                    Local::now(),
                ),
                Some(Markup::Html),
            ),
            LogRecord::Deploy(info) => (
                render::deploy_message(info, self.bot_username, Local::now()),
                None,
            ),
        }
    }
}

#[async_trait]
impl<'a> LogSink for RemoteSink<'a> {
    async fn emit(&self, record: LogRecord<'_>) {
        let (payload, markup) = self.payload(&record);
        let payload = truncate_payload(payload);

        match self.transport.send(self.chat_id, &payload, markup).await {
            Ok(()) => info!(
                chat_id = self.chat_id,
                kind = record.kind(),
                "Log sent to chat"
            ),
            Err(e) => warn!(
                chat_id = self.chat_id,
                kind = record.kind(),
                "Failed to send log to chat: {}",
                e
            ),
        }
    }
}
