use crate::domain::UserId;

/// Whether the operator's next plain-text message is a reply.
///
/// `Idle` ⇄ `AwaitingReply(target)`: arming replaces any previous target and
/// `take` reads and clears in one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingReplySlot {
    target: Option<UserId>,
}

impl PendingReplySlot {
    pub fn arm(&mut self, target: UserId) {
        self.target = Some(target);
    }

    pub fn take(&mut self) -> Option<UserId> {
        self.target.take()
    }

    pub fn target(&self) -> Option<UserId> {
        self.target
    }
}
