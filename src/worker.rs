use std::sync::Arc;
use std::time::Instant;
use tokio::time::{Duration, interval};
use tracing::{debug, info};

use crate::cache;
use crate::metrics::{BLOCKED_CLIENTS, TRACKED_CLIENTS};
use crate::state::AppState;

// Periodic cleanup of idle rate limit entries and stale cache entries.
// Admission decisions never depend on it, it only bounds memory.
pub async fn sweeper(state: Arc<AppState>, every: Duration) {
    let mut interval = interval(every);

    info!("State sweeper started (interval: {:?})", every);

    loop {
        interval.tick().await;
        sweep_once(&state);
    }
}

pub fn sweep_once(state: &AppState) {
    let now = Instant::now();

    let evicted = state.admission.sweep(now);
    let expired = cache::evict_expired(&state.cache, state.ttl);
    let blocked = state.admission.blocked(now);

    BLOCKED_CLIENTS.set(blocked.len() as f64);
    TRACKED_CLIENTS.set(state.admission.len() as f64);

    for (client, remaining) in &blocked {
        debug!(client = %client, remaining_secs = remaining.as_secs(), "Still blocked");
    }
    if evicted > 0 || expired > 0 {
        debug!(evicted, expired, tracked = state.admission.len(), "Sweep finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamConfig;

    fn state() -> AppState {
        AppState::new(
            reqwest::Client::new(),
            UpstreamConfig {
                api_url: "http://127.0.0.1:9/weather".into(),
                api_key: String::new(),
                countries_url: "http://127.0.0.1:9/countries".into(),
            },
            Duration::ZERO,
            false,
        )
    }

    #[test]
    fn test_sweep_once_keeps_active_clients() {
        let state = state();
        assert!(state.admission.admit("198.51.100.1", Instant::now()).is_admitted());
        cache::store(&state.cache, "k".to_string(), &1u32);

        sweep_once(&state);

        // burst window still open, cache TTL of zero means stale
        assert_eq!(state.admission.len(), 1);
        assert!(state.cache.is_empty());
    }
}
