use crate::domain::{MessageId, UserId};

/// Operator button actions.
///
/// Encoded as `verb[:operand[:operand]]`, which keeps every token well under
/// Telegram's 64-byte callback data limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Delete forwarded copy, control summary and the sender's original.
    DeleteThread { forwarded: MessageId },
    DeleteSaved { index: usize },
    ViewSaved { index: usize },
    /// Reply to the sender of a saved message.
    Reply { index: usize },
    /// Reply straight from a control summary.
    QuickReply { sender: UserId },
    Save { sender: UserId, forwarded: MessageId },
    Export,
    ClearAll,
}

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Self::DeleteThread { forwarded } => format!("delete_thread:{}", forwarded.0),
            Self::DeleteSaved { index } => format!("delete_saved:{index}"),
            Self::ViewSaved { index } => format!("view_saved:{index}"),
            Self::Reply { index } => format!("reply:{index}"),
            Self::QuickReply { sender } => format!("quick_reply:{}", sender.0),
            Self::Save { sender, forwarded } => format!("save:{}:{}", sender.0, forwarded.0),
            Self::Export => "export".to_string(),
            Self::ClearAll => "clear_all".to_string(),
        }
    }

    /// `None` for anything that is not a well-formed token.
    pub fn decode(data: &str) -> Option<Self> {
        let mut parts = data.split(':');
        let verb = parts.next()?;
        let operands: Vec<&str> = parts.collect();

        let action = match (verb, operands.as_slice()) {
            ("delete_thread", [id]) => Self::DeleteThread {
                forwarded: MessageId(id.parse().ok()?),
            },
            ("delete_saved", [idx]) => Self::DeleteSaved {
                index: idx.parse().ok()?,
            },
            ("view_saved", [idx]) => Self::ViewSaved {
                index: idx.parse().ok()?,
            },
            ("reply", [idx]) => Self::Reply {
                index: idx.parse().ok()?,
            },
            ("quick_reply", [sender]) => Self::QuickReply {
                sender: UserId(sender.parse().ok()?),
            },
            ("save", [sender, id]) => Self::Save {
                sender: UserId(sender.parse().ok()?),
                forwarded: MessageId(id.parse().ok()?),
            },
            ("export", []) => Self::Export,
            ("clear_all", []) => Self::ClearAll,
            _ => return None,
        };
        Some(action)
    }
}
