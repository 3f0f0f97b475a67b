pub mod sink;

use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::event::{ChatKind, DeployRecord, RawMessage};
use crate::extract::extract;
use crate::output::{LineWriter, TracingWriter};
use crate::render::RenderConfig;
use crate::transport::Transport;

pub use sink::{LocalSink, LogRecord, LogSink, RemoteSink};

/// Construction options for [`TeleLogger`]
#[derive(Clone, Default)]
pub struct LoggerOptions {
    /// Platform client used to reach the log chat
    pub transport: Option<Arc<dyn Transport>>,
    /// Log chat id; 0 disables remote logging
    pub log_chat_id: i64,
    /// The bot's own user id, used to skip its own messages
    pub bot_id: Option<i64>,
    pub bot_username: Option<String>,
    pub render: RenderConfig,
}

/// Mutable, process-scoped logger state.
#[derive(Debug, Clone, Default)]
pub struct LoggerState {
    enabled: bool,
    remote_channel_id: Option<i64>,
    self_user_id: Option<i64>,
    self_username: Option<String>,
}

impl LoggerState {
    fn new(
        has_transport: bool,
        channel_id: i64,
        self_user_id: Option<i64>,
        self_username: Option<String>,
    ) -> Self {
        let mut state = Self {
            enabled: false,
            remote_channel_id: None,
            self_user_id,
            self_username,
        };
        state.set_channel(has_transport, channel_id);
        state
    }

    /// The only place `enabled` is written.
    fn set_channel(&mut self, has_transport: bool, channel_id: i64) {
        self.remote_channel_id = (channel_id != 0).then_some(channel_id);
        self.enabled = has_transport && self.remote_channel_id.is_some();
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn remote_channel_id(&self) -> Option<i64> {
        self.remote_channel_id
    }

    pub fn self_user_id(&self) -> Option<i64> {
        self.self_user_id
    }

    pub fn self_username(&self) -> Option<&str> {
        self.self_username.as_deref()
    }

    fn is_self(&self, user_id: i64) -> bool {
        self.self_user_id == Some(user_id)
    }
}

/// Mirrors bot activity into a log chat, or into the local writer while no
/// log chat is configured.
///
/// None of the logging calls return errors: transport failures are reported
/// as warnings and the call completes normally.
pub struct TeleLogger {
    transport: Option<Arc<dyn Transport>>,
    state: RwLock<LoggerState>,
    remote_config: RenderConfig,
    local: LocalSink,
}

impl TeleLogger {
    pub fn new(options: LoggerOptions) -> Self {
        let state = LoggerState::new(
            options.transport.is_some(),
            options.log_chat_id,
            options.bot_id,
            options.bot_username,
        );
        let writer: Arc<dyn LineWriter> = options
            .render
            .writer
            .clone()
            .unwrap_or_else(|| Arc::new(TracingWriter));

        if state.enabled() {
            info!("Remote logging enabled for chat {}", options.log_chat_id);
        } else {
            info!("Remote logging disabled, using local output");
        }

        Self {
            transport: options.transport,
            state: RwLock::new(state),
            remote_config: options.render.without_color(),
            local: LocalSink::new(writer),
        }
    }

    /// Logger with no transport: everything goes to the local writer.
    pub fn local(render: RenderConfig) -> Self {
        Self::new(LoggerOptions {
            render,
            ..Default::default()
        })
    }

    pub async fn is_enabled(&self) -> bool {
        self.state.read().await.enabled()
    }

    pub async fn state(&self) -> LoggerState {
        self.state.read().await.clone()
    }

    /// Point remote logging at another chat. 0 disables it.
    pub async fn set_log_channel(&self, chat_id: i64) {
        let mut state = self.state.write().await;
        state.set_channel(self.transport.is_some(), chat_id);
        info!(
            chat_id,
            enabled = state.enabled(),
            "Log channel reconfigured"
        );
    }

    pub async fn log_message(&self, raw: &RawMessage, kind_hint: ChatKind) {
        let event = extract(raw, kind_hint);
        self.dispatch(LogRecord::Message { event: &event }, Some(event.from.id))
            .await;
    }

    pub async fn log_command(&self, raw: &RawMessage, command: &str) {
        let event = extract(raw, raw.chat.kind);
        self.dispatch(
            LogRecord::Command {
                event: &event,
                command,
            },
            Some(event.from.id),
        )
        .await;
    }

    pub async fn log_error(
        &self,
        raw: &RawMessage,
        error: Option<&(dyn Display + Sync)>,
        context: &str,
    ) {
        let event = extract(raw, raw.chat.kind);
        self.dispatch(
            LogRecord::Error {
                event: &event,
                error,
                context,
            },
            Some(event.from.id),
        )
        .await;
    }

    pub async fn send_deploy_notification(&self, record: &DeployRecord) {
        self.dispatch(LogRecord::Deploy(record), None).await;
    }

    async fn dispatch(&self, record: LogRecord<'_>, sender_id: Option<i64>) {
        let state = self.state().await;

        if sender_id.is_some_and(|id| state.is_self(id)) {
            return;
        }

        self.sink(&state).emit(record).await;
    }

    fn sink<'a>(&'a self, state: &'a LoggerState) -> Box<dyn LogSink + 'a> {
        match (&self.transport, state.remote_channel_id) {
            (Some(transport), Some(chat_id)) if state.enabled() => Box::new(RemoteSink {
                transport: transport.as_ref(),
                chat_id,
                config: &self.remote_config,
                bot_username: state.self_username(),
            }),
            _ => Box::new(self.local.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TelelogError};
    use crate::event::{RawChat, RawUser};
    use crate::output::BufferWriter;
    use crate::render::Format;
    use crate::transport::Markup;
    use crate::util::{MAX_REMOTE_CHARS, TRUNCATION_MARKER};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const LOG_CHAT: i64 = -1001234567890;
    const BOT_ID: i64 = 999;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(i64, String, Option<Markup>)>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<(i64, String, Option<Markup>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, chat_id: i64, text: &str, markup: Option<Markup>) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((chat_id, text.to_string(), markup));
            if self.fail {
                return Err(TelelogError::Transport {
                    chat_id,
                    reason: "Bad Request: chat not found".to_string(),
                });
            }
            Ok(())
        }
    }

    fn raw_message(sender_id: i64, text: &str) -> RawMessage {
        RawMessage {
            message_id: 1,
            date: 1_700_000_000,
            from: RawUser {
                id: sender_id,
                first_name: "John".to_string(),
                last_name: Some("Doe".to_string()),
                username: Some("johndoe".to_string()),
                ..Default::default()
            },
            chat: RawChat {
                id: 789,
                title: Some("Test Chat".to_string()),
                kind: ChatKind::Supergroup,
            },
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn logger(
        transport: Option<Arc<RecordingTransport>>,
        log_chat_id: i64,
    ) -> (TeleLogger, BufferWriter) {
        let writer = BufferWriter::new();
        let logger = TeleLogger::new(LoggerOptions {
            transport: transport.map(|t| t as Arc<dyn Transport>),
            log_chat_id,
            bot_id: Some(BOT_ID),
            bot_username: Some("log_bot".to_string()),
            render: RenderConfig::default().with_writer(Arc::new(writer.clone())),
        });
        (logger, writer)
    }

    async fn log_everything(logger: &TeleLogger, raw: &RawMessage) {
        let err = std::io::Error::other("db down");
        logger.log_message(raw, ChatKind::Private).await;
        logger.log_command(raw, "start").await;
        logger.log_error(raw, Some(&err), "handling /start").await;
        logger
            .send_deploy_notification(&DeployRecord::new().with("version", "1.0.0"))
            .await;
    }

    #[tokio::test]
    async fn test_enabled_requires_transport_and_channel() {
        let transport = Arc::new(RecordingTransport::default());

        assert!(logger(Some(transport.clone()), LOG_CHAT).0.is_enabled().await);
        assert!(!logger(Some(transport), 0).0.is_enabled().await);
        assert!(!logger(None, LOG_CHAT).0.is_enabled().await);
    }

    #[tokio::test]
    async fn test_set_log_channel_rederives_enabled() {
        let transport = Arc::new(RecordingTransport::default());
        let (logger, _) = logger(Some(transport), LOG_CHAT);

        logger.set_log_channel(0).await;
        assert!(!logger.is_enabled().await);
        assert_eq!(logger.state().await.remote_channel_id(), None);

        logger.set_log_channel(42).await;
        assert!(logger.is_enabled().await);
        assert_eq!(logger.state().await.remote_channel_id(), Some(42));
    }

    #[tokio::test]
    async fn test_set_log_channel_without_transport_stays_disabled() {
        let (logger, _) = logger(None, 0);
        logger.set_log_channel(LOG_CHAT).await;
        assert!(!logger.is_enabled().await);
    }

    #[tokio::test]
    async fn test_disabled_logger_never_calls_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let (logger, writer) = logger(Some(transport.clone()), 0);

        log_everything(&logger, &raw_message(456, "Hello, world!")).await;

        assert!(transport.sent().is_empty());
        let lines = writer.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "📨 Message from @johndoe in private: Hello, world!"
        );
        assert_eq!(lines[1], "⚡ Command /start from @johndoe");
        assert_eq!(lines[2], "❌ Error [handling /start] from @johndoe: db down");
        assert!(lines[3].starts_with("🚀 Deploy notification: version=1.0.0"));
    }

    #[tokio::test]
    async fn test_local_fallback_is_not_truncated() {
        let (logger, writer) = logger(None, 0);
        let long = "x".repeat(MAX_REMOTE_CHARS * 2);
        logger
            .log_message(&raw_message(456, &long), ChatKind::Private)
            .await;
        assert!(writer.lines()[0].ends_with(&long));
    }

    #[tokio::test]
    async fn test_enabled_logger_sends_rendered_payloads() {
        let transport = Arc::new(RecordingTransport::default());
        let (logger, writer) = logger(Some(transport.clone()), LOG_CHAT);

        log_everything(&logger, &raw_message(456, "Hello, world!")).await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 4);
        assert!(sent.iter().all(|(chat, _, _)| *chat == LOG_CHAT));
        assert!(writer.lines().is_empty());

        let (_, message, markup) = &sent[0];
        assert!(message.starts_with("📥 INCOMING MESSAGE:"));
        assert!(message.contains("📝 Text: Hello, world!"));
        assert!(!message.contains('\x1b'));
        assert_eq!(*markup, None);

        assert_eq!(sent[1].1, "⚡ Command from @johndoe in Test Chat: /start");

        let (_, report, markup) = &sent[2];
        assert!(report.contains("<b>Context:</b> handling /start"));
        assert!(report.contains("<code>db down</code>"));
        assert_eq!(*markup, Some(Markup::Html));

        assert!(sent[3].1.contains("version: 1.0.0"));
        assert!(sent[3].1.contains("bot: @log_bot"));
    }

    #[tokio::test]
    async fn test_remote_uses_configured_format() {
        let transport = Arc::new(RecordingTransport::default());
        let logger = TeleLogger::new(LoggerOptions {
            transport: Some(transport.clone() as Arc<dyn Transport>),
            log_chat_id: LOG_CHAT,
            render: RenderConfig::default().with_format(Format::Compact),
            ..Default::default()
        });

        logger
            .log_message(&raw_message(456, "Hello, world!"), ChatKind::Private)
            .await;

        let sent = transport.sent();
        assert!(sent[0].1.ends_with("] @johndoe (private): Hello, world!"));
    }

    #[tokio::test]
    async fn test_self_messages_are_dropped_on_both_paths() {
        let transport = Arc::new(RecordingTransport::default());
        let (enabled, enabled_writer) = logger(Some(transport.clone()), LOG_CHAT);
        let (disabled, disabled_writer) = logger(None, 0);

        let own = raw_message(BOT_ID, "I am the bot");
        let err = std::io::Error::other("x");
        for logger in [&enabled, &disabled] {
            logger.log_message(&own, ChatKind::Private).await;
            logger.log_command(&own, "start").await;
            logger.log_error(&own, Some(&err), "ctx").await;
        }

        assert!(transport.sent().is_empty());
        assert!(enabled_writer.lines().is_empty());
        assert!(disabled_writer.lines().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_payload_is_truncated() {
        let transport = Arc::new(RecordingTransport::default());
        let (logger, _) = logger(Some(transport.clone()), LOG_CHAT);

        let long = "ю".repeat(MAX_REMOTE_CHARS + 1000);
        logger
            .log_message(&raw_message(456, &long), ChatKind::Private)
            .await;

        let (_, payload, _) = &transport.sent()[0];
        assert!(payload.ends_with(TRUNCATION_MARKER));
        assert!(payload.chars().count() <= MAX_REMOTE_CHARS + TRUNCATION_MARKER.chars().count());
    }

    #[tokio::test]
    async fn test_error_report_for_long_message_stays_valid_html() {
        let transport = Arc::new(RecordingTransport::default());
        let (logger, _) = logger(Some(transport.clone()), LOG_CHAT);

        let err = "database connection refused";
        logger
            .log_error(&raw_message(456, &"a&b ".repeat(1200)), Some(&err), "db")
            .await;

        let (_, payload, markup) = &transport.sent()[0];
        assert_eq!(*markup, Some(Markup::Html));
        assert!(!payload.ends_with(TRUNCATION_MARKER));
        assert!(payload.ends_with("<code>database connection refused</code>"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed_and_keeps_mode() {
        let transport = Arc::new(RecordingTransport::failing());
        let (logger, writer) = logger(Some(transport.clone()), LOG_CHAT);

        log_everything(&logger, &raw_message(456, "Hello")).await;

        assert_eq!(transport.sent().len(), 4);
        assert!(logger.is_enabled().await);
        // Failures go to tracing, not the fallback writer
        assert!(writer.lines().is_empty());
    }
}
