//! Operator side: text commands, button actions and the pending-reply state machine.

pub mod action;
pub mod command;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    archive::{SavedMessage, HANDLE_NONE},
    domain::{ChatId, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard},
    },
    state::RelayState,
    utils::{display_timestamp, truncate_text},
};

use self::{action::Action, command::Command};

pub const NOTHING_SAVED: &str = "No saved messages.";
pub const NOTHING_TO_EXPORT: &str = "No messages to export.";
pub const REPLY_PROMPT: &str = "Type your reply:";
pub const LIST_FAILED: &str = "Failed to send the saved message list.";

const MAX_LIST_CHARS: usize = 4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Export {
    Sent,
    Empty,
    Failed,
}

const HELP_TEXT: &str = "Operator commands:\n\
/saved - list saved messages\n\
/download - download saved messages as CSV\n\
/stats - statistics\n\
/limit <count> - set the default hourly limit\n\
/limit <user_id> <count> - set a per-user hourly limit\n\
/limits - show limits\n\
/help - this help";

/// Drives everything the operator does.
///
/// Input from anyone other than the operator is ignored without a response.
pub struct ModerationDispatcher {
    state: Arc<RelayState>,
    messenger: Arc<dyn MessagingPort>,
    operator: UserId,
    list_preview_chars: usize,
    export_filename: String,
}

impl ModerationDispatcher {
    pub fn new(
        state: Arc<RelayState>,
        messenger: Arc<dyn MessagingPort>,
        operator: UserId,
        list_preview_chars: usize,
        export_filename: impl Into<String>,
    ) -> Self {
        Self {
            state,
            messenger,
            operator,
            list_preview_chars,
            export_filename: export_filename.into(),
        }
    }

    pub fn is_operator(&self, user: UserId) -> bool {
        user == self.operator
    }

    fn operator_chat(&self) -> ChatId {
        self.operator.private_chat()
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.messenger.send_text(self.operator_chat(), text).await {
            warn!(error = %e, "failed to message operator");
        }
    }

    // ============== Commands ==============

    pub async fn handle_command(&self, caller: UserId, cmd: Command) {
        if !self.is_operator(caller) || !cmd.is_operator_only() {
            debug!(caller = caller.0, ?cmd, "command ignored");
            return;
        }

        match cmd {
            Command::ListSaved => self.list_saved().await,
            Command::Export => {
                if self.export().await == Export::Empty {
                    self.say(NOTHING_TO_EXPORT).await;
                }
            }
            Command::Stats => {
                let text = {
                    let st = self.state.lock().await;
                    format!(
                        "Statistics:\n\
Total messages: {}\n\
Unique users: {}\n\
Default limit: {} messages/hour",
                        st.archive.count(),
                        st.archive.unique_senders(),
                        st.limiter.default_quota()
                    )
                };
                self.say(&text).await;
            }
            Command::SetQuota { target, value } => {
                let text = {
                    let mut st = self.state.lock().await;
                    match target {
                        Some(user) => {
                            st.limiter.set_quota(user, value);
                            format!("Limit for user {} set: {value} messages/hour", user.0)
                        }
                        None => {
                            st.limiter.set_default_quota(value);
                            format!("Default limit set: {value} messages/hour")
                        }
                    }
                };
                info!(user = ?target.map(|u| u.0), value, "quota changed");
                self.say(&text).await;
            }
            Command::ListQuotas => {
                let text = {
                    let st = self.state.lock().await;
                    let mut text = format!(
                        "Default limit: {} messages/hour\n\n",
                        st.limiter.default_quota()
                    );
                    let overrides: Vec<_> = st.limiter.overrides().collect();
                    if overrides.is_empty() {
                        text.push_str("No per-user limits");
                    } else {
                        text.push_str("Per-user limits:\n");
                        for (user, quota) in overrides {
                            text.push_str(&format!("User {}: {quota} messages/hour\n", user.0));
                        }
                    }
                    text
                };
                self.say(&text).await;
            }
            Command::Help => self.say(HELP_TEXT).await,
            Command::Start => {}
        }
    }

    /// Surface a malformed command to the operator. Nothing is mutated.
    pub async fn report_usage(&self, caller: UserId, err: &Error) {
        if !self.is_operator(caller) {
            return;
        }
        self.say(&err.to_string()).await;
    }

    async fn list_saved(&self) {
        let (text, keyboard) = {
            let st = self.state.lock().await;
            if st.archive.is_empty() {
                (None, InlineKeyboard::default())
            } else {
                let items = st.archive.list();
                let mut text = String::from("Saved messages:\n\n");
                let mut keyboard = InlineKeyboard::default();
                for (index, msg) in items.iter().enumerate() {
                    let n = index + 1;
                    text.push_str(&format!(
                        "{n}. {}\n   From: {} (ID: {})\n   Time: {}\n\n",
                        truncate_text(&msg.text, self.list_preview_chars),
                        msg.display_name,
                        msg.sender_id,
                        msg.timestamp
                    ));
                    keyboard.push_row(vec![
                        InlineButton::new(
                            format!("Delete {n}"),
                            Action::DeleteSaved { index }.encode(),
                        ),
                        InlineButton::new(format!("View {n}"), Action::ViewSaved { index }.encode()),
                        InlineButton::new(format!("Reply {n}"), Action::Reply { index }.encode()),
                    ]);
                }
                keyboard.push_row(vec![InlineButton::new(
                    "Download CSV",
                    Action::Export.encode(),
                )]);
                keyboard.push_row(vec![InlineButton::new("Clear all", Action::ClearAll.encode())]);
                (Some(truncate_text(&text, MAX_LIST_CHARS)), keyboard)
            }
        };

        let Some(text) = text else {
            self.say(NOTHING_SAVED).await;
            return;
        };
        if let Err(e) = self
            .messenger
            .send_inline_keyboard(self.operator_chat(), &text, keyboard)
            .await
        {
            warn!(error = %e, "failed to send saved message list");
            self.say(LIST_FAILED).await;
        }
    }

    /// Send the archive as a CSV document. An empty archive produces no file.
    async fn export(&self) -> Export {
        let csv = {
            let st = self.state.lock().await;
            if st.archive.is_empty() {
                return Export::Empty;
            }
            st.archive.export_csv()
        };

        let bytes = match csv {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "csv export failed");
                self.say("Failed to build the export.").await;
                return Export::Failed;
            }
        };
        match self
            .messenger
            .send_document(self.operator_chat(), bytes, &self.export_filename)
            .await
        {
            Ok(()) => Export::Sent,
            Err(e) => {
                warn!(error = %e, "failed to send export document");
                self.say("Failed to send the export.").await;
                Export::Failed
            }
        }
    }

    // ============== Button actions ==============

    /// Run a button action. Returns the short acknowledgement for the button press, if any.
    ///
    /// `origin` is the message carrying the pressed button.
    pub async fn handle_action(
        &self,
        caller: UserId,
        action: Action,
        origin: Option<MessageRef>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        if !self.is_operator(caller) {
            debug!(caller = caller.0, ?action, "action ignored");
            return None;
        }

        match action {
            Action::Export => match self.export().await {
                Export::Sent => Some("File sent".to_string()),
                Export::Empty => Some(NOTHING_TO_EXPORT.to_string()),
                Export::Failed => Some("Export failed".to_string()),
            },
            Action::ClearAll => {
                self.state.lock().await.archive.clear();
                info!("saved messages cleared");
                self.edit_origin(origin, "All saved messages deleted.").await;
                Some("All messages deleted".to_string())
            }
            Action::DeleteSaved { index } => {
                self.state.lock().await.archive.delete_at(index)?;
                info!(index, "saved message deleted");
                self.edit_origin(origin, &format!("Message {} deleted.", index + 1))
                    .await;
                Some("Message deleted".to_string())
            }
            Action::DeleteThread { forwarded } => {
                let link = self.state.lock().await.links.forget(forwarded)?;
                for (what, msg) in [
                    ("forwarded copy", link.forwarded),
                    ("control summary", link.control),
                    ("original", link.original),
                ] {
                    if let Err(e) = self.messenger.delete_message(msg).await {
                        warn!(
                            what,
                            chat = msg.chat_id.0,
                            message_id = msg.message_id.0,
                            error = %e,
                            "thread deletion step failed"
                        );
                    }
                }
                info!(forwarded = forwarded.0, sender = link.sender_id.0, "thread deleted");
                Some("Message deleted".to_string())
            }
            Action::ViewSaved { index } => {
                let item = self.state.lock().await.archive.get(index).cloned()?;
                self.say(&render_saved(index, &item)).await;
                None
            }
            Action::Reply { index } => {
                let target = {
                    let mut st = self.state.lock().await;
                    let target = st.archive.get(index).map(SavedMessage::sender)?;
                    st.pending.arm(target);
                    target
                };
                info!(reply_to = target.0, "awaiting operator reply");
                Some(REPLY_PROMPT.to_string())
            }
            Action::QuickReply { sender } => {
                self.state.lock().await.pending.arm(sender);
                info!(reply_to = sender.0, "awaiting operator reply");
                Some(REPLY_PROMPT.to_string())
            }
            Action::Save { sender, forwarded } => {
                let mut st = self.state.lock().await;
                let Some(link) = st.links.resolve(forwarded) else {
                    return Some("Message not found".to_string());
                };
                let Some(text) = link.content.text() else {
                    return Some("Cannot save media messages".to_string());
                };
                if link.sender_id != sender {
                    warn!(
                        token_sender = sender.0,
                        link_sender = link.sender_id.0,
                        "save token sender differs from link; using link"
                    );
                }
                let saved = SavedMessage {
                    timestamp: display_timestamp(now),
                    sender_id: link.sender_id.0,
                    display_name: link.display_name.clone(),
                    handle: link
                        .handle
                        .clone()
                        .filter(|h| !h.is_empty())
                        .unwrap_or_else(|| HANDLE_NONE.to_string()),
                    text: text.to_string(),
                };
                st.archive.append(saved);
                info!(forwarded = forwarded.0, total = st.archive.count(), "message saved");
                Some("Message saved".to_string())
            }
        }
    }

    async fn edit_origin(&self, origin: Option<MessageRef>, text: &str) {
        let Some(msg) = origin else {
            return;
        };
        if let Err(e) = self.messenger.edit_text(msg, text).await {
            warn!(error = %e, "failed to update operator message");
        }
    }

    // ============== Plain text ==============

    /// Route operator text to the pending reply target, if one is armed.
    ///
    /// Returns `true` when the text was consumed as a reply. The slot is
    /// cleared whether or not delivery succeeds.
    pub async fn handle_operator_text(&self, caller: UserId, text: &str) -> bool {
        if !self.is_operator(caller) {
            return false;
        }
        let Some(target) = self.state.lock().await.pending.take() else {
            debug!("operator text ignored: no reply pending");
            return false;
        };

        match self
            .messenger
            .send_text(target.private_chat(), &format!("Reply: {text}"))
            .await
        {
            Ok(_) => {
                info!(reply_to = target.0, "operator reply delivered");
                self.say("Reply sent.").await;
            }
            Err(e) => {
                warn!(reply_to = target.0, error = %e, "operator reply failed");
                self.say("Failed to send reply.").await;
            }
        }
        true
    }
}

fn render_saved(index: usize, msg: &SavedMessage) -> String {
    format!(
        "Message {}:\n\n\
Time: {}\n\
From: {}\n\
ID: {}\n\
Username: {}\n\
Text: {}",
        index + 1,
        msg.timestamp,
        msg.display_name,
        msg.sender_id,
        msg.handle,
        msg.text
    )
}
