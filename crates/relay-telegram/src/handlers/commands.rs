use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;

use relay_core::{
    domain::{ChatId, Sender},
    moderation::command::Command,
};

use crate::router::AppState;

pub async fn handle_command(
    msg: &Message,
    sender: &Sender,
    cmd: Command,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            state
                .relay
                .handle_start(sender, ChatId(msg.chat.id.0), Utc::now())
                .await;
        }
        // Operator-only; the dispatcher drops anyone else silently.
        other => state.moderation.handle_command(sender.id, other).await,
    }
    Ok(())
}
