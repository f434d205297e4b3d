/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl UserId {
    /// Private chats share the numeric id of the user.
    pub fn private_chat(self) -> ChatId {
        ChatId(self.0)
    }
}

/// Who sent an inbound message, as reported by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub display_name: Option<String>,
    pub handle: Option<String>,
}

impl Sender {
    pub fn display_name_or_default(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Not specified")
            .to_string()
    }
}

/// Payload of a relayed message.
///
/// Anything that is not plain text collapses into `Media`, which can be
/// forwarded but never archived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayedContent {
    Text(String),
    Media { kind: String },
}

impl RelayedContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Media { .. } => None,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, Self::Media { .. })
    }
}

/// An inbound user message: where it lives and what it carries.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub origin: MessageRef,
    pub content: RelayedContent,
}
