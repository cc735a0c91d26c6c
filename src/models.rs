use serde::{Deserialize, Serialize};

// Query string of /fetchWeather
#[derive(Deserialize, Debug, Default)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

// Query string of /countries
#[derive(Deserialize, Debug, Default)]
pub struct CountriesQuery {
    pub q: Option<String>,
}

// Country as served to the frontend
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub code: String, // lowercase ISO 3166-1 alpha-2
}

// restcountries.com entry, only the fields we map
#[derive(Deserialize, Debug)]
pub struct RestCountry {
    pub name: Option<RestCountryName>,
    pub cca2: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RestCountryName {
    pub common: Option<String>,
}

// Rejection body for 429 responses
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}
