//! Cooldown timers for outbound calls (chat, workflow webhooks, profile sync).
//!
//! Callers pass the current time in; the limiter never reads the clock.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::workspace::{read_json, write_json, KeyValueStore, RateLimitSettings};

pub const RATE_LIMIT_KEY: &str = "rate-limits";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    CoolingDown { remaining: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_secs(&self) -> u64 {
        match self {
            RateLimitDecision::Allowed => 0,
            RateLimitDecision::CoolingDown { remaining } => {
                let millis = remaining.num_milliseconds().max(0) as u64;
                millis.div_ceil(1000)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct RateLimitState {
    #[serde(default)]
    last_calls: BTreeMap<String, DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    state: RateLimitState,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            state: RateLimitState::default(),
        }
    }

    /// Restores last-call timestamps so a reload does not reset cooldowns.
    pub fn load(settings: RateLimitSettings, store: &dyn KeyValueStore) -> Result<Self> {
        let state = read_json(store, RATE_LIMIT_KEY)?.unwrap_or_default();
        Ok(Self { settings, state })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        write_json(store, RATE_LIMIT_KEY, &self.state)
    }

    pub fn cooldown(&self, action: &str) -> Duration {
        Duration::seconds(self.settings.cooldown_for(action) as i64)
    }

    pub fn last_call(&self, action: &str) -> Option<DateTime<Utc>> {
        self.state.last_calls.get(action).copied()
    }

    pub fn check(&self, action: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let Some(last) = self.last_call(action) else {
            return RateLimitDecision::Allowed;
        };
        let cooldown = self.cooldown(action);
        let ready_at = last + cooldown;
        if now >= ready_at {
            return RateLimitDecision::Allowed;
        }
        // A clock that moved backwards never extends the wait past one cooldown.
        let remaining = (ready_at - now).min(cooldown);
        RateLimitDecision::CoolingDown { remaining }
    }

    pub fn record(&mut self, action: &str, now: DateTime<Utc>) {
        self.state.last_calls.insert(action.to_string(), now);
    }

    /// Checks and, when allowed, records the call in one step.
    pub fn try_acquire(&mut self, action: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let decision = self.check(action, now);
        if decision.is_allowed() {
            self.record(action, now);
        }
        decision
    }

    pub fn reset(&mut self, action: &str) {
        self.state.last_calls.remove(action);
    }
}
