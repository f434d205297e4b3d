use std::collections::HashMap;

use crate::{
    domain::{MessageId, MessageRef, RelayedContent, UserId},
    errors::Error,
    Result,
};

/// Everything needed to act on a relayed message after the fact.
///
/// The operator only ever sees the forwarded copy and the control summary;
/// this record ties both back to the sender's original message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLink {
    pub sender_id: UserId,
    pub original: MessageRef,
    pub forwarded: MessageRef,
    pub control: MessageRef,
    pub content: RelayedContent,
    pub display_name: String,
    pub handle: Option<String>,
}

/// Links keyed by the forwarded copy's message id.
#[derive(Clone, Debug, Default)]
pub struct MessageLinkRegistry {
    links: HashMap<MessageId, MessageLink>,
}

impl MessageLinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new link. An existing key is never overwritten.
    pub fn register(&mut self, key: MessageId, link: MessageLink) -> Result<()> {
        if self.links.contains_key(&key) {
            return Err(Error::DuplicateLink(key));
        }
        self.links.insert(key, link);
        Ok(())
    }

    pub fn resolve(&self, key: MessageId) -> Option<&MessageLink> {
        self.links.get(&key)
    }

    pub fn forget(&mut self, key: MessageId) -> Option<MessageLink> {
        self.links.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatId;

    fn link(sender: i64, text: &str) -> MessageLink {
        let at = |chat: i64, id: i32| MessageRef {
            chat_id: ChatId(chat),
            message_id: MessageId(id),
        };
        MessageLink {
            sender_id: UserId(sender),
            original: at(sender, 10),
            forwarded: at(1, 20),
            control: at(1, 21),
            content: RelayedContent::Text(text.to_string()),
            display_name: "Ann".to_string(),
            handle: None,
        }
    }

    #[test]
    fn register_then_resolve() {
        let mut reg = MessageLinkRegistry::new();
        reg.register(MessageId(20), link(5, "hi")).unwrap();
        let got = reg.resolve(MessageId(20)).unwrap();
        assert_eq!(got.sender_id, UserId(5));
        assert!(reg.resolve(MessageId(21)).is_none());
    }

    #[test]
    fn duplicate_key_is_rejected_and_original_kept() {
        let mut reg = MessageLinkRegistry::new();
        reg.register(MessageId(20), link(5, "first")).unwrap();
        let err = reg.register(MessageId(20), link(6, "second")).unwrap_err();
        assert!(matches!(err, Error::DuplicateLink(MessageId(20))));
        assert_eq!(
            reg.resolve(MessageId(20)).unwrap().content,
            RelayedContent::Text("first".to_string())
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn forget_is_idempotent() {
        let mut reg = MessageLinkRegistry::new();
        reg.register(MessageId(20), link(5, "hi")).unwrap();
        assert!(reg.forget(MessageId(20)).is_some());
        assert!(reg.forget(MessageId(20)).is_none());
        assert!(reg.is_empty());
    }
}
