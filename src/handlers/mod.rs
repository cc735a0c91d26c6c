mod countries;
mod health;
mod metrics;
mod weather;

pub use countries::countries_handler;
pub use health::{favicon_handler, health_handler, root_handler};
pub use metrics::metrics_handler;
pub use weather::weather_handler;
