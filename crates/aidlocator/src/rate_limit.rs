//! Minimum spacing between outbound provider calls.
use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Serialises provider calls so consecutive calls start at least a minimum
/// delay apart.
///
/// Each caller reserves the next free slot under the lock and then sleeps
/// outside it, so concurrent callers queue up instead of bunching together.
/// A throttled caller can [`hold_for`](Self::hold_for) a back-off, which only
/// delays the next reserved slot.
#[derive(Debug, Default)]
pub struct RateLimiter {
    state: Mutex<LimiterState>,
}

#[derive(Debug, Default)]
struct LimiterState {
    last_call: Option<Instant>,
    /// No call may start before this
    held_until: Option<Instant>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LimiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until `min_delay` has passed since the previous call, then record
    /// this call. Returns how long the caller was held back.
    pub async fn wait(&self, min_delay: Duration) -> Duration {
        let now = Instant::now();
        let slot = {
            let mut state = self.state();
            let mut slot = state
                .last_call
                .map_or(now, |last| (last + min_delay).max(now));
            if let Some(held_until) = state.held_until {
                slot = slot.max(held_until);
            }
            state.last_call = Some(slot);
            slot
        };

        let wait = slot - now;
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Rate limiting provider call");
            sleep_until(slot).await;
        }
        wait
    }

    /// Keep the next call from starting until `backoff` has passed.
    pub fn hold_for(&self, backoff: Duration) {
        let until = Instant::now() + backoff;
        let mut state = self.state();
        state.held_until = Some(state.held_until.map_or(until, |held| held.max(until)));
    }

    /// Time of the most recent call, if any.
    pub fn last_call(&self) -> Option<Instant> {
        self.state().last_call
    }
}
