use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use weather_gateway::config::Args;
use weather_gateway::rate_limit::{BLOCK_DURATION, BURST_LIMIT, BURST_WINDOW};
use weather_gateway::state::AppState;
use weather_gateway::upstream::UpstreamConfig;
use weather_gateway::{router, worker};

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_gateway=info,tower_http=info".into()),
        )
        .init();

    // parse cli arguments
    let args = Args::parse();

    if args.api_key.is_empty() {
        warn!("API_KEY is not set, weather lookups will be rejected upstream");
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.upstream_timeout))
        .build()?;

    // creating shared state
    let state = Arc::new(AppState::new(
        client,
        UpstreamConfig {
            api_url: args.api_url.clone(),
            api_key: args.api_key.clone(),
            countries_url: args.countries_url.clone(),
        },
        Duration::from_secs(args.cache_ttl),
        args.trust_proxy,
    ));

    // spawn the background sweeper
    tokio::spawn(worker::sweeper(
        state.clone(),
        Duration::from_secs(args.sweep_interval.max(1)),
    ));

    let app = router(state, &args.allowed_origins);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server is running on port {}", args.port);
    info!("Weather API: {}", args.api_url);
    info!("Country API: {}", args.countries_url);
    info!("Allowed origins: {}", args.allowed_origins.join(", "));
    info!("Cache TTL: {} seconds", args.cache_ttl);
    info!(
        "Rate limit: 1 request per second, {} requests per {} minutes, then blocked for {} minutes",
        BURST_LIMIT,
        BURST_WINDOW.as_secs() / 60,
        BLOCK_DURATION.as_secs() / 60
    );
    if args.trust_proxy {
        info!("Client addresses taken from X-Forwarded-For");
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
