use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{self, make_cache_key};
use crate::error::ApiError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES};
use crate::models::WeatherQuery;
use crate::state::AppState;
use crate::upstream;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn weather_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Value>, ApiError> {
    let city = non_blank(query.city.as_deref()).ok_or(ApiError::MissingCity)?;
    let country = non_blank(query.country.as_deref());

    let cache_key = make_cache_key(&["weather", city, country.unwrap_or_default()]);

    // check cache first
    if let Some(body) = cache::lookup::<Value>(&state.cache, &cache_key, state.ttl) {
        CACHE_HITS.inc();
        debug!(city = %city, "Weather cache hit");
        return Ok(Json(body));
    }
    CACHE_MISSES.inc();

    let body = upstream::fetch_weather(&state.client, &state.upstream, city, country)
        .await
        .map_err(ApiError::Weather)?;

    cache::store(&state.cache, cache_key, &body);
    Ok(Json(body))
}
