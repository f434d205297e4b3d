use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use relay_core::{
    config::Config, messaging::port::MessagingPort, moderation::ModerationDispatcher,
    relay::RelayRouter, state::RelayState,
};

use crate::handlers;
use crate::health;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayRouter>,
    pub moderation: Arc<ModerationDispatcher>,
}

impl AppState {
    pub fn new(cfg: &Config, messenger: Arc<dyn MessagingPort>) -> Self {
        // Volatile: everything lives for the process lifetime only.
        let state = Arc::new(RelayState::new(cfg.default_quota));
        let relay = Arc::new(RelayRouter::new(
            state.clone(),
            messenger.clone(),
            cfg.admin_id,
            cfg.summary_preview_chars,
        ));
        let moderation = Arc::new(ModerationDispatcher::new(
            state,
            messenger,
            cfg.admin_id,
            cfg.list_preview_chars,
            cfg.export_filename.clone(),
        ));
        Self { relay, moderation }
    }
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "relay bot started"),
        Err(e) => warn!(error = %e, "get_me failed; continuing"),
    }
    info!(
        admin = cfg.admin_id.0,
        default_quota = cfg.default_quota,
        "relay configuration loaded"
    );

    if cfg.health_enabled {
        let port = cfg.health_port;
        tokio::spawn(async move {
            if let Err(e) = health::serve(port).await {
                warn!(port, error = %e, "health endpoint stopped");
            }
        });
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState::new(&cfg, messenger));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
