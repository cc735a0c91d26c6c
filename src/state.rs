use dashmap::DashMap;
use std::time::Duration;
use crate::cache::CacheEntry;
use crate::rate_limit::AdmissionController;
use crate::upstream::UpstreamConfig;

// app's shared state
pub struct AppState {
    pub client: reqwest::Client,
    pub cache: DashMap<String, CacheEntry>, // String -> CacheEntry
    pub ttl: Duration,                      // how long cache will be valid
    pub upstream: UpstreamConfig,
    pub admission: AdmissionController,
    pub trust_proxy: bool, // take client address from X-Forwarded-For
}

impl AppState {
    pub fn new(
        client: reqwest::Client,
        upstream: UpstreamConfig,
        ttl: Duration,
        trust_proxy: bool,
    ) -> Self {
        Self {
            client,
            cache: DashMap::new(),
            ttl,
            upstream,
            admission: AdmissionController::new(),
            trust_proxy,
        }
    }
}
