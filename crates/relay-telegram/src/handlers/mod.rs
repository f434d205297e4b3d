//! Telegram update handlers.
//!
//! Each handler turns a teloxide update into core types and hands it to
//! either the relay router (senders) or the moderation dispatcher (operator).

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message, User},
};
use tracing::debug;

use relay_core::{
    domain::{Sender, UserId},
    errors::Error,
    moderation::command::Command,
};

use crate::router::AppState;
mod callback;
mod commands;
mod relay;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

/// Where an incoming message goes.
#[derive(Debug)]
pub(crate) enum Route<'a> {
    Command(Command),
    UsageError(Error),
    /// Plain operator text; consumed by the pending reply slot, never relayed.
    OperatorReply(&'a str),
    Ignored,
    Relay,
}

/// Commands win over a pending reply. Operator input is never relayed, and
/// operator-only commands from anyone else are dropped.
pub(crate) fn route(is_operator: bool, text: Option<&str>) -> Route<'_> {
    if let Some(text) = text {
        match Command::parse(text) {
            Ok(Some(cmd)) if is_operator || !cmd.is_operator_only() => {
                return Route::Command(cmd)
            }
            Ok(Some(_)) => return Route::Ignored,
            Err(e) if is_operator => return Route::UsageError(e),
            Err(_) => return Route::Ignored,
            Ok(None) => {}
        }
    }

    match (is_operator, text) {
        (true, Some(text)) => Route::OperatorReply(text),
        (true, None) => Route::Ignored,
        (false, _) => Route::Relay,
    }
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let sender = sender_of(user);

    match route(state.moderation.is_operator(sender.id), msg.text()) {
        Route::Command(cmd) => commands::handle_command(&msg, &sender, cmd, state).await,
        Route::UsageError(e) => {
            state.moderation.report_usage(sender.id, &e).await;
            Ok(())
        }
        Route::OperatorReply(text) => {
            state.moderation.handle_operator_text(sender.id, text).await;
            Ok(())
        }
        Route::Ignored => {
            debug!(user = sender.id.0, "message ignored");
            Ok(())
        }
        Route::Relay => relay::handle_relay(&msg, &sender, state).await,
    }
}

pub(crate) fn sender_of(user: &User) -> Sender {
    Sender {
        id: UserId(user.id.0 as i64),
        display_name: Some(user.first_name.clone()),
        handle: user.username.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_commands_win_over_a_pending_reply() {
        assert!(matches!(
            route(true, Some("/stats")),
            Route::Command(Command::Stats)
        ));
    }

    #[test]
    fn operator_unknown_slash_text_is_a_reply() {
        assert!(matches!(
            route(true, Some("/unknown text")),
            Route::OperatorReply("/unknown text")
        ));
        assert!(matches!(
            route(true, Some("thanks!")),
            Route::OperatorReply("thanks!")
        ));
    }

    #[test]
    fn operator_media_is_never_relayed() {
        assert!(matches!(route(true, None), Route::Ignored));
    }

    #[test]
    fn operator_usage_errors_are_reported() {
        assert!(matches!(
            route(true, Some("/limit x")),
            Route::UsageError(Error::Usage(_))
        ));
    }

    #[test]
    fn operator_commands_from_senders_are_dropped() {
        assert!(matches!(route(false, Some("/saved")), Route::Ignored));
        assert!(matches!(route(false, Some("/limit 7 1")), Route::Ignored));
        assert!(matches!(route(false, Some("/limit x")), Route::Ignored));
    }

    #[test]
    fn sender_input_is_relayed() {
        assert!(matches!(
            route(false, Some("/start")),
            Route::Command(Command::Start)
        ));
        assert!(matches!(route(false, Some("hello")), Route::Relay));
        assert!(matches!(route(false, Some("/unknown")), Route::Relay));
        assert!(matches!(route(false, None), Route::Relay));
    }
}
