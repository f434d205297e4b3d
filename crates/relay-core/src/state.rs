use tokio::sync::{Mutex, MutexGuard};

use crate::{
    archive::SavedMessageArchive, links::MessageLinkRegistry, pending::PendingReplySlot,
    quota::RateLimiter,
};

/// All mutable relay state. Only ever touched through `RelayState::lock`.
#[derive(Debug)]
pub struct Registries {
    pub limiter: RateLimiter,
    pub archive: SavedMessageArchive,
    pub links: MessageLinkRegistry,
    pub pending: PendingReplySlot,
}

/// Process-wide application state shared by the router and the dispatcher.
///
/// One mutex serializes every mutation. Callers must drop the guard before
/// awaiting any outbound messenger call.
#[derive(Debug)]
pub struct RelayState {
    inner: Mutex<Registries>,
}

impl RelayState {
    pub fn new(default_quota: u32) -> Self {
        Self {
            inner: Mutex::new(Registries {
                limiter: RateLimiter::new(default_quota),
                archive: SavedMessageArchive::new(),
                links: MessageLinkRegistry::new(),
                pending: PendingReplySlot::default(),
            }),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Registries> {
        self.inner.lock().await
    }
}
