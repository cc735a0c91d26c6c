use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use crate::cache::{self, make_cache_key};
use crate::countries::suggest;
use crate::error::ApiError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES};
use crate::models::{CountriesQuery, Country};
use crate::state::AppState;
use crate::upstream;

// Country list, or autocomplete suggestions when ?q= is given
pub async fn countries_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountriesQuery>,
) -> Result<Json<Vec<Country>>, ApiError> {
    let cache_key = make_cache_key(&["countries"]);

    let countries = match cache::lookup::<Vec<Country>>(&state.cache, &cache_key, state.ttl) {
        Some(countries) => {
            CACHE_HITS.inc();
            countries
        }
        None => {
            CACHE_MISSES.inc();
            let countries = upstream::fetch_countries(&state.client, &state.upstream)
                .await
                .map_err(ApiError::Countries)?;
            cache::store(&state.cache, cache_key, &countries);
            countries
        }
    };

    match query.q {
        Some(q) => Ok(Json(suggest(&countries, &q))),
        None => Ok(Json(countries)),
    }
}
