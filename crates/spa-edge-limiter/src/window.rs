//! Fixed-window counter table.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

/// How many `check` calls pass between opportunistic sweeps of idle entries.
const SWEEP_INTERVAL: u64 = 1024;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request is within quota and has been counted.
    Allowed {
        /// Requests left in the current window after this one.
        remaining: u32,
    },
    /// The request exceeds the quota for the current window.
    Limited,
}

impl Decision {
    /// Returns `true` if the request was rejected.
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::Limited)
    }
}

/// Per-window counter state for one client address.
#[derive(Debug, Clone, Copy)]
struct Window {
    /// When the current window opened.
    started: Instant,
    /// Accepted requests counted in the current window.
    count: u32,
}

/// Per-address fixed-window rate limiter.
///
/// The counter table is shared mutably across all concurrent requests.
/// Updates go through the map's entry API, which holds the shard lock for
/// the duration of the increment-and-compare, so concurrent requests from
/// one address cannot lose updates or overshoot the quota.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    /// Counter table, keyed by client address. Entries are created lazily
    /// on first request and swept after a full window of inactivity.
    windows: DashMap<IpAddr, Window>,

    /// Window length.
    window: Duration,

    /// Accepted requests per window per address.
    max_requests: u32,

    /// Calls since the last sweep.
    checks: AtomicU64,
}

impl FixedWindowLimiter {
    /// Create a new limiter.
    ///
    /// # Arguments
    ///
    /// * `window` - Window length
    /// * `max_requests` - Accepted requests per window per address
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests,
            checks: AtomicU64::new(0),
        }
    }

    /// Count a request from `addr` against its current window.
    ///
    /// Returns [`Decision::Allowed`] and increments the counter if the
    /// address is under quota, [`Decision::Limited`] otherwise. An elapsed
    /// window is replaced by a fresh one before counting.
    pub fn check(&self, addr: IpAddr) -> Decision {
        self.maybe_sweep();

        let now = Instant::now();
        let mut entry = self.windows.entry(addr).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            Decision::Allowed {
                remaining: self.max_requests - entry.count,
            }
        } else {
            warn!(
                addr = %addr,
                count = entry.count,
                max = self.max_requests,
                "Telemetry rate limit exceeded"
            );
            Decision::Limited
        }
    }

    /// Drop entries whose window has fully elapsed.
    ///
    /// Such entries carry no information: the next request from that
    /// address starts a fresh window either way.
    pub fn sweep(&self) {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);

        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            debug!(removed, remaining = self.windows.len(), "Swept idle rate-limit entries");
        }
    }

    /// Number of addresses currently tracked.
    pub fn tracked_addresses(&self) -> usize {
        self.windows.len()
    }

    /// Sweep every `SWEEP_INTERVAL` checks, amortizing the cost.
    fn maybe_sweep(&self) {
        let n = self.checks.fetch_add(1, Ordering::Relaxed);
        if n != 0 && n % SWEEP_INTERVAL == 0 {
            self.sweep();
        }
    }
}
