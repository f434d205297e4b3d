use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;
use tracing::{debug, warn};

use relay_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    moderation::action::Action,
};

use crate::router::AppState;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let data = q.data.clone().unwrap_or_default();
    let caller = UserId(q.from.id.0 as i64);
    let origin = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    let ack = match Action::decode(&data) {
        Some(action) => {
            state
                .moderation
                .handle_action(caller, action, origin, Utc::now())
                .await
        }
        None => {
            debug!(data = %data, "unrecognized callback data");
            None
        }
    };

    // Always answer so the client stops its spinner.
    let mut req = bot.answer_callback_query(q.id.clone());
    if let Some(text) = ack {
        req = req.text(text);
    }
    if let Err(e) = req.await {
        warn!(error = %e, "failed to answer callback query");
    }
    Ok(())
}
