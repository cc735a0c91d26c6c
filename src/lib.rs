//! Weather gateway: proxies a weather API and a country list API behind a
//! CORS allow-list and a per-address admission controller.
//!
//! Every request is admitted or rejected before routing:
//! - at most 1 request per second per address
//! - more than 30 requests in 5 minutes blocks the address for 15 minutes

pub mod cache;
pub mod config;
pub mod countries;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod state;
pub mod upstream;
pub mod worker;

pub use rate_limit::{AdmissionController, Decision, Rejection};
pub use server::router;
pub use state::AppState;
