use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// The outbound half of the messaging channel.
///
/// Every call may fail independently; callers decide whether a failure is
/// surfaced (relay, reply) or only logged (thread deletion).
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Forward `original` into `to`, returning the forwarded copy.
    async fn forward_message(&self, to: ChatId, original: MessageRef) -> Result<MessageRef>;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_text(&self, msg: MessageRef, text: &str) -> Result<()>;

    async fn send_document(&self, chat_id: ChatId, bytes: Vec<u8>, filename: &str) -> Result<()>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;
}
