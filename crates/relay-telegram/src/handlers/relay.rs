use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;

use relay_core::domain::{ChatId, InboundMessage, MessageId, MessageRef, RelayedContent, Sender};

use crate::router::AppState;

pub async fn handle_relay(msg: &Message, sender: &Sender, state: Arc<AppState>) -> ResponseResult<()> {
    let inbound = InboundMessage {
        origin: MessageRef {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
        },
        content: content_of(msg),
    };

    // Outcome is logged and reported to the sender by the router.
    state
        .relay
        .handle_user_message(sender, &inbound, Utc::now())
        .await;
    Ok(())
}

fn content_of(msg: &Message) -> RelayedContent {
    match msg.text() {
        Some(text) => RelayedContent::Text(text.to_string()),
        None => RelayedContent::Media {
            kind: media_kind(msg).to_string(),
        },
    }
}

fn media_kind(msg: &Message) -> &'static str {
    if msg.photo().is_some() {
        "photo"
    } else if msg.video().is_some() {
        "video"
    } else if msg.voice().is_some() {
        "voice"
    } else if msg.audio().is_some() {
        "audio"
    } else if msg.document().is_some() {
        "document"
    } else if msg.sticker().is_some() {
        "sticker"
    } else if msg.animation().is_some() {
        "animation"
    } else if msg.video_note().is_some() {
        "video_note"
    } else if msg.location().is_some() {
        "location"
    } else if msg.contact().is_some() {
        "contact"
    } else {
        "media"
    }
}
