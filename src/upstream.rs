//! Calls to the third-party weather and country APIs.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, warn};

use crate::countries::sort_countries;
use crate::metrics::UPSTREAM_LATENCY;
use crate::models::{Country, RestCountry};

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub api_key: String,
    pub countries_url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("City not found. Please check the city name.")]
    CityNotFound,
    #[error("Unable to fetch weather data. Please try again later.")]
    WeatherUnavailable,
    #[error("Error fetching country list")]
    CountriesUnavailable,
}

// Current weather for a city, body passed through as-is
pub async fn fetch_weather(
    client: &reqwest::Client,
    upstream: &UpstreamConfig,
    city: &str,
    country: Option<&str>,
) -> Result<Value, UpstreamError> {
    let location = match country {
        Some(code) => format!("{},{}", city, code),
        None => city.to_string(),
    };

    let start = Instant::now();
    let result = client
        .get(&upstream.api_url)
        .query(&[
            ("q", location.as_str()),
            ("appid", upstream.api_key.as_str()),
            ("units", "metric"),
        ])
        .send()
        .await;
    UPSTREAM_LATENCY
        .with_label_values(&["weather"])
        .observe(start.elapsed().as_secs_f64());

    let res = result.map_err(|e| {
        error!(error = %e, "Weather request failed");
        UpstreamError::WeatherUnavailable
    })?;

    match res.status() {
        StatusCode::NOT_FOUND => Err(UpstreamError::CityNotFound),
        status if !status.is_success() => {
            warn!(%status, city = %city, "Weather API returned an error");
            Err(UpstreamError::WeatherUnavailable)
        }
        _ => res.json::<Value>().await.map_err(|e| {
            error!(error = %e, "Weather response was not JSON");
            UpstreamError::WeatherUnavailable
        }),
    }
}

// Full country list as {name, code}, sorted by name
pub async fn fetch_countries(
    client: &reqwest::Client,
    upstream: &UpstreamConfig,
) -> Result<Vec<Country>, UpstreamError> {
    let start = Instant::now();
    let result = client.get(&upstream.countries_url).send().await;
    UPSTREAM_LATENCY
        .with_label_values(&["countries"])
        .observe(start.elapsed().as_secs_f64());

    let res = result
        .and_then(|res| res.error_for_status())
        .map_err(|e| {
            error!(error = %e, "Country list request failed");
            UpstreamError::CountriesUnavailable
        })?;

    let raw = res.json::<Vec<RestCountry>>().await.map_err(|e| {
        error!(error = %e, "Country list was not in the expected format");
        UpstreamError::CountriesUnavailable
    })?;

    let mut countries = map_countries(raw);
    sort_countries(&mut countries);
    Ok(countries)
}

// Keep entries that have both a common name and a code
pub fn map_countries(raw: Vec<RestCountry>) -> Vec<Country> {
    raw.into_iter()
        .filter_map(|c| {
            let name = c.name?.common?;
            let code = c.cca2?.to_lowercase();
            Some(Country { name, code })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_countries_skips_incomplete() {
        let raw: Vec<RestCountry> = serde_json::from_value(serde_json::json!([
            {"name": {"common": "Norway", "official": "Kingdom of Norway"}, "cca2": "NO"},
            {"name": {"official": "Nowhere"}, "cca2": "XX"},
            {"name": {"common": "Chad"}},
            {"name": {"common": "Peru"}, "cca2": "PE", "region": "Americas"}
        ]))
        .unwrap();

        let countries = map_countries(raw);
        assert_eq!(
            countries,
            vec![
                Country { name: "Norway".into(), code: "no".into() },
                Country { name: "Peru".into(), code: "pe".into() },
            ]
        );
    }
}
