use async_trait::async_trait;

use crate::error::Result;

/// How the platform should interpret a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Html,
}

/// Outbound capability of the chat platform client.
///
/// One call is one delivery attempt; implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str, markup: Option<Markup>) -> Result<()>;
}
