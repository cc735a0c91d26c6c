use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, HistogramVec, register_counter, register_counter_vec,
    register_gauge, register_histogram_vec,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("weather_gateway_requests_total", "Total number of requests").unwrap();
    pub static ref REJECTIONS: CounterVec = register_counter_vec!(
        "weather_gateway_rejections_total",
        "Requests turned away by the rate limiter",
        &["reason"]
    )
    .unwrap();
    pub static ref BLOCKED_CLIENTS: Gauge =
        register_gauge!("weather_gateway_blocked_clients", "Addresses currently blocked").unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "weather_gateway_tracked_clients",
        "Addresses with rate limit state"
    )
    .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("weather_gateway_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("weather_gateway_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("weather_gateway_cache_size", "Current number of items in cache").unwrap();
    pub static ref UPSTREAM_LATENCY: HistogramVec = register_histogram_vec!(
        "weather_gateway_upstream_latency_seconds",
        "Upstream call latency in seconds",
        &["api"]
    )
    .unwrap();
}
