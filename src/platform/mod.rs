pub mod telegram;

pub use telegram::{command_token, TelegramTransport};
