//! Per-caller fixed-window request limiting.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use copydeck_common_config::RateLimitConfig;
use tracing::{debug, warn};

/// Caller identity used when none is supplied.
pub const ANONYMOUS: &str = "anonymous";

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Store of per-caller request counts.
pub trait RateLimitStore: Send + Sync {
    /// Count a request from `caller` at `now`, or refuse it.
    fn check_at(&self, caller: &str, now: Instant) -> RateDecision;

    fn check(&self, caller: &str) -> RateDecision {
        self.check_at(caller, Instant::now())
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// In-memory store: each caller gets `max_requests` per window, the window
/// starting at the caller's first request.
#[derive(Debug)]
pub struct FixedWindowStore {
    max_requests: u32,
    window: Duration,
    callers: Mutex<HashMap<String, Window>>,
}

impl FixedWindowStore {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            callers: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn tracked_callers(&self) -> usize {
        self.callers.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl RateLimitStore for FixedWindowStore {
    fn check_at(&self, caller: &str, now: Instant) -> RateDecision {
        let mut callers = self.callers.lock().unwrap_or_else(|e| e.into_inner());

        let tracked = callers.len();
        callers.retain(|_, window| now <= window.reset_at);
        if callers.len() < tracked {
            debug!(
                expired = tracked - callers.len(),
                "Dropped expired rate limit windows"
            );
        }

        let window = callers.entry(caller.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if window.count >= self.max_requests {
            warn!(caller, "Rate limit exceeded");
            return RateDecision::Limited {
                retry_after: window.reset_at.saturating_duration_since(now),
            };
        }

        window.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - window.count,
        }
    }
}
