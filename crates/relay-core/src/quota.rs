use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};

use crate::domain::UserId;

/// Length of a sender's quota window.
pub const WINDOW_SECS: i64 = 3600;

// ============== Rate Limiter (fixed hourly window) ==============

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UsageRecord {
    window_start: DateTime<Utc>,
    count: u32,
}

impl UsageRecord {
    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.window_start) >= Duration::seconds(WINDOW_SECS)
    }
}

/// Per-sender hourly quota.
///
/// The window opens with a sender's first admitted message and resets once
/// `WINDOW_SECS` have passed since it opened. Quota overrides apply to the
/// next `remaining` call and never rewrite the count already consumed.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    default_quota: u32,
    overrides: BTreeMap<UserId, u32>,
    usage: HashMap<UserId, UsageRecord>,
}

impl RateLimiter {
    pub fn new(default_quota: u32) -> Self {
        Self {
            default_quota,
            overrides: BTreeMap::new(),
            usage: HashMap::new(),
        }
    }

    pub fn default_quota(&self) -> u32 {
        self.default_quota
    }

    pub fn effective_quota(&self, user_id: UserId) -> u32 {
        self.overrides
            .get(&user_id)
            .copied()
            .unwrap_or(self.default_quota)
    }

    /// Messages `user_id` may still send at `now`. Never negative.
    pub fn remaining(&self, user_id: UserId, now: DateTime<Utc>) -> u32 {
        let quota = self.effective_quota(user_id);
        match self.usage.get(&user_id) {
            Some(rec) if !rec.expired_at(now) => quota.saturating_sub(rec.count),
            _ => quota,
        }
    }

    /// Count one admitted message. Call only after admission was granted.
    pub fn record_message(&mut self, user_id: UserId, now: DateTime<Utc>) {
        match self.usage.get_mut(&user_id) {
            Some(rec) if !rec.expired_at(now) => {
                rec.count = rec.count.saturating_add(1);
            }
            _ => {
                self.usage.insert(
                    user_id,
                    UsageRecord {
                        window_start: now,
                        count: 1,
                    },
                );
            }
        }
    }

    pub fn set_quota(&mut self, user_id: UserId, quota: u32) {
        self.overrides.insert(user_id, quota);
    }

    pub fn set_default_quota(&mut self, quota: u32) {
        self.default_quota = quota;
    }

    /// Per-sender overrides in ascending id order.
    pub fn overrides(&self) -> impl Iterator<Item = (UserId, u32)> + '_ {
        self.overrides.iter().map(|(id, q)| (*id, *q))
    }
}
