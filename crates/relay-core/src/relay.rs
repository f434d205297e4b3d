//! Inbound user messages: admission, forwarding, control summary, link registration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    domain::{ChatId, InboundMessage, MessageId, RelayedContent, Sender, UserId},
    links::MessageLink,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard},
    },
    moderation::action::Action,
    state::RelayState,
    utils::{display_timestamp, truncate_text},
};

pub const QUOTA_EXHAUSTED_NOTICE: &str = "Message limit reached. Try again in an hour.";
pub const RELAY_FAILED_NOTICE: &str = "Failed to deliver your message.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    QuotaExhausted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    Relayed {
        forwarded: MessageId,
        remaining: u32,
    },
    Rejected(RejectReason),
    Failed {
        reason: String,
    },
}

/// Turns a sender's message into a forwarded copy + control summary for the operator.
pub struct RelayRouter {
    state: Arc<RelayState>,
    messenger: Arc<dyn MessagingPort>,
    operator: UserId,
    preview_chars: usize,
}

impl RelayRouter {
    pub fn new(
        state: Arc<RelayState>,
        messenger: Arc<dyn MessagingPort>,
        operator: UserId,
        preview_chars: usize,
    ) -> Self {
        Self {
            state,
            messenger,
            operator,
            preview_chars,
        }
    }

    fn operator_chat(&self) -> ChatId {
        self.operator.private_chat()
    }

    /// `/start`: greet the sender with their quota.
    pub async fn handle_start(&self, sender: &Sender, chat_id: ChatId, now: DateTime<Utc>) {
        let (quota, remaining) = {
            let st = self.state.lock().await;
            (
                st.limiter.effective_quota(sender.id),
                st.limiter.remaining(sender.id, now),
            )
        };
        let text = format!(
            "Bot is running. Write your message.\n\
Limit: {quota} messages per hour\n\
Messages left: {remaining}"
        );
        if let Err(e) = self.messenger.send_text(chat_id, &text).await {
            warn!(sender = sender.id.0, error = %e, "failed to answer /start");
        }
    }

    pub async fn handle_user_message(
        &self,
        sender: &Sender,
        message: &InboundMessage,
        now: DateTime<Utc>,
    ) -> RelayOutcome {
        let reply_chat = message.origin.chat_id;

        // Admission: check and record under one lock so the decision is final.
        let admitted = {
            let mut st = self.state.lock().await;
            if st.limiter.remaining(sender.id, now) == 0 {
                None
            } else {
                st.limiter.record_message(sender.id, now);
                Some((
                    st.limiter.effective_quota(sender.id),
                    st.limiter.remaining(sender.id, now),
                ))
            }
        };
        let Some((quota, remaining)) = admitted else {
            info!(sender = sender.id.0, "relay rejected: quota exhausted");
            self.notify(reply_chat, QUOTA_EXHAUSTED_NOTICE).await;
            return RelayOutcome::Rejected(RejectReason::QuotaExhausted);
        };

        let forwarded = match self
            .messenger
            .forward_message(self.operator_chat(), message.origin)
            .await
        {
            Ok(m) => m,
            Err(e) => return self.fail(sender, reply_chat, "forward", e).await,
        };

        let summary = control_summary(
            sender,
            &message.content,
            &display_timestamp(now),
            quota,
            remaining,
            self.preview_chars,
        );
        let keyboard = control_keyboard(sender.id, forwarded.message_id);
        let control = match self
            .messenger
            .send_inline_keyboard(self.operator_chat(), &summary, keyboard)
            .await
        {
            Ok(m) => m,
            Err(e) => return self.fail(sender, reply_chat, "control summary", e).await,
        };

        let link = MessageLink {
            sender_id: sender.id,
            original: message.origin,
            forwarded,
            control,
            content: message.content.clone(),
            display_name: sender.display_name_or_default(),
            handle: sender.handle.clone(),
        };
        {
            let mut st = self.state.lock().await;
            if let Err(e) = st.links.register(forwarded.message_id, link) {
                // The transport handed out a reused id; keep the older link.
                warn!(error = %e, "message link not registered");
            }
        }

        info!(
            sender = sender.id.0,
            forwarded = forwarded.message_id.0,
            remaining,
            media = message.content.is_media(),
            "message relayed"
        );
        self.notify(
            reply_chat,
            &format!("Message delivered. Messages left: {remaining}"),
        )
        .await;

        RelayOutcome::Relayed {
            forwarded: forwarded.message_id,
            remaining,
        }
    }

    async fn fail(
        &self,
        sender: &Sender,
        reply_chat: ChatId,
        stage: &str,
        err: crate::Error,
    ) -> RelayOutcome {
        warn!(sender = sender.id.0, stage, error = %err, "relay failed");
        self.notify(reply_chat, RELAY_FAILED_NOTICE).await;
        RelayOutcome::Failed {
            reason: err.to_string(),
        }
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text).await {
            warn!(chat = chat_id.0, error = %e, "failed to notify sender");
        }
    }
}

/// Operator-facing description of a relayed message.
pub fn control_summary(
    sender: &Sender,
    content: &RelayedContent,
    timestamp: &str,
    quota: u32,
    remaining: u32,
    preview_chars: usize,
) -> String {
    let mut out = String::from("New message\n");
    out.push_str(&format!("From: {}\n", sender.display_name_or_default()));
    out.push_str(&format!("ID: {}\n", sender.id.0));
    if let Some(handle) = sender.handle.as_deref().filter(|h| !h.is_empty()) {
        out.push_str(&format!("Username: @{handle}\n"));
    }
    out.push_str(&format!("Time: {timestamp}\n"));
    out.push_str(&format!("Limit: {quota}/hour\n"));
    out.push_str(&format!("Remaining: {remaining}\n"));
    match content {
        RelayedContent::Text(t) => {
            out.push_str(&format!("Text: {}", truncate_text(t, preview_chars)));
        }
        RelayedContent::Media { kind } => out.push_str(&format!("Type: {kind}")),
    }
    out
}

pub fn control_keyboard(sender: UserId, forwarded: MessageId) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            InlineButton::new("Reply", Action::QuickReply { sender }.encode()),
            InlineButton::new("Save", Action::Save { sender, forwarded }.encode()),
        ],
        vec![InlineButton::new(
            "Delete",
            Action::DeleteThread { forwarded }.encode(),
        )],
    ])
}
