use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelelogError {
    /// The platform client could not deliver a payload to the log chat.
    #[error("failed to send to chat {chat_id}: {reason}")]
    Transport { chat_id: i64, reason: String },

    /// Inbound message carried no sender. Message, command and error
    /// logging all rely on sender identity, so this is never defaulted.
    #[error("message {message_id} has no sender")]
    MissingSender { message_id: i32 },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TelelogError>;
