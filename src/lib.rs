//! Message and deploy logging for Telegram bots.
//!
//! Incoming messages, commands and errors are extracted into a [`ChatEvent`],
//! rendered with a [`RenderConfig`], and sent to a log chat through a
//! [`Transport`]. Without a transport or log chat, a one-line summary goes to
//! the local writer instead.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod extract;
pub mod output;
pub mod platform;
pub mod render;
pub mod transport;
pub mod util;

pub use console::ConsoleLogger;
pub use dispatch::{LoggerOptions, LoggerState, TeleLogger};
pub use error::TelelogError;
pub use event::{ChatEvent, ChatKind, DeployRecord, Media, RawMessage};
pub use extract::extract;
pub use output::{BufferWriter, LineWriter, StdoutWriter, TracingWriter};
pub use render::{render, Format, Formatter, RenderConfig, DEFAULT_OPTIONS};
pub use transport::{Markup, Transport};
