use dashmap::DashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

// Short window: 1 request per second
pub const SHORT_WINDOW: Duration = Duration::from_secs(1);
pub const SHORT_WINDOW_LIMIT: u32 = 1;

// Burst window: 30 requests per 5 minutes, then a 15 minute block
pub const BURST_WINDOW: Duration = Duration::from_secs(5 * 60);
pub const BURST_LIMIT: u32 = 30;
pub const BLOCK_DURATION: Duration = Duration::from_secs(15 * 60);

pub const BLOCKED_MESSAGE: &str = "You have been blocked for 15 minutes due to too many requests.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

// Rate limit entry - tracks both windows and the block for one address
#[derive(Debug, Clone)]
pub struct ClientState {
    pub short_count: u32,
    pub short_start: Instant,
    pub burst_count: u32,
    pub burst_start: Instant,
    pub blocked_until: Option<Instant>,
}

impl ClientState {
    fn fresh(now: Instant) -> Self {
        Self {
            short_count: 0,
            short_start: now,
            burst_count: 0,
            burst_start: now,
            blocked_until: None,
        }
    }

    fn is_blocked(&self, now: Instant) -> bool {
        self.blocked_until.is_some_and(|until| now < until)
    }
}

/// Which limiter a request tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateViolation {
    ShortWindow,
    Burst,
}

impl RateViolation {
    pub fn message(&self) -> &'static str {
        match self {
            RateViolation::ShortWindow => RATE_LIMITED_MESSAGE,
            RateViolation::Burst => BLOCKED_MESSAGE,
        }
    }
}

/// Why a request was turned away. Always surfaced as HTTP 429.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{}", .violation.message())]
    RateExceeded {
        violation: RateViolation,
        retry_after: Duration,
    },
    #[error("{}", BLOCKED_MESSAGE)]
    AlreadyBlocked { retry_after: Duration },
}

impl Rejection {
    pub fn retry_after(&self) -> Duration {
        match self {
            Rejection::RateExceeded { retry_after, .. }
            | Rejection::AlreadyBlocked { retry_after } => *retry_after,
        }
    }

    // label used for the rejection metric
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::RateExceeded {
                violation: RateViolation::ShortWindow,
                ..
            } => "short_window",
            Rejection::RateExceeded {
                violation: RateViolation::Burst,
                ..
            } => "burst",
            Rejection::AlreadyBlocked { .. } => "blocked",
        }
    }
}

/// Burst window quota left after an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admit(Quota),
    Reject(Rejection),
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admit(_))
    }
}

/// Per-address admission state: a 1s/1 request limiter composed with a
/// 5min/30 request limiter that blocks the address for 15 minutes.
///
/// Every check for one address runs under that address's map entry lock, so
/// concurrent requests from the same address are serialised while distinct
/// addresses proceed in parallel. Windows and blocks expire lazily when the
/// address is next seen; `sweep` only reclaims memory.
#[derive(Default)]
pub struct AdmissionController {
    clients: DashMap<String, ClientState>,
}

impl AdmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&self, addr: &str, now: Instant) -> Decision {
        let mut entry = self
            .clients
            .entry(addr.to_string())
            .or_insert_with(|| ClientState::fresh(now));
        let state = entry.value_mut();

        // blocked..? Reject without touching the counters
        if let Some(until) = state.blocked_until {
            if now < until {
                return Decision::Reject(Rejection::AlreadyBlocked {
                    retry_after: until - now,
                });
            }
            info!(client = %addr, "Unblocked after cooldown");
            *state = ClientState::fresh(now);
        }

        // short window expired..? Reset it
        if now.duration_since(state.short_start) >= SHORT_WINDOW {
            state.short_count = 0;
            state.short_start = now;
        }
        if state.short_count >= SHORT_WINDOW_LIMIT {
            return Decision::Reject(Rejection::RateExceeded {
                violation: RateViolation::ShortWindow,
                retry_after: (state.short_start + SHORT_WINDOW).saturating_duration_since(now),
            });
        }
        state.short_count += 1;

        if now.duration_since(state.burst_start) >= BURST_WINDOW {
            state.burst_count = 0;
            state.burst_start = now;
        }
        state.burst_count += 1;

        // over the burst limit -> block
        if state.burst_count > BURST_LIMIT {
            state.blocked_until = Some(now + BLOCK_DURATION);
            warn!(
                client = %addr,
                requests = state.burst_count,
                "Burst limit reached, blocking for {} minutes",
                BLOCK_DURATION.as_secs() / 60
            );
            return Decision::Reject(Rejection::RateExceeded {
                violation: RateViolation::Burst,
                retry_after: BLOCK_DURATION,
            });
        }

        Decision::Admit(Quota {
            limit: BURST_LIMIT,
            remaining: BURST_LIMIT - state.burst_count,
            reset_after: (state.burst_start + BURST_WINDOW).saturating_duration_since(now),
        })
    }

    pub fn is_blocked(&self, addr: &str, now: Instant) -> bool {
        self.clients
            .get(addr)
            .is_some_and(|state| state.is_blocked(now))
    }

    // Addresses still blocked at `now`, with the cooldown left
    pub fn blocked(&self, now: Instant) -> Vec<(String, Duration)> {
        self.clients
            .iter()
            .filter_map(|entry| {
                let until = entry.blocked_until?;
                (now < until).then(|| (entry.key().clone(), until - now))
            })
            .collect()
    }

    /// Drops entries that carry no information any more: not blocked and with
    /// an expired burst window. Returns how many were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, state| {
            state.is_blocked(now) || now.duration_since(state.burst_start) < BURST_WINDOW
        });
        before.saturating_sub(self.clients.len())
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
