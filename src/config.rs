use clap::Parser;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "weather-gateway")]
#[command(about = "Rate limited proxy for weather and country lookups")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Weather endpoint (OpenWeatherMap current weather)
    #[arg(
        long,
        env = "API_URL",
        default_value = "https://api.openweathermap.org/data/2.5/weather"
    )]
    pub api_url: String,

    // Weather API key
    #[arg(long, env = "API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    // Country list endpoint
    #[arg(
        long,
        env = "COUNTRIES_URL",
        default_value = "https://restcountries.com/v3.1/all?fields=name,cca2"
    )]
    pub countries_url: String,

    // Origins allowed by CORS (comma-separated)
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "http://127.0.0.1",
            "http://127.0.0.1:5500",
            "https://gurgant.github.io",
            "https://weather-app-vanilla-js.onrender.com",
        ]
    )]
    pub allowed_origins: Vec<String>,

    // Cache TTL in seconds
    #[arg(short, long, env = "CACHE_TTL", default_value_t = 300)]
    pub cache_ttl: u64,

    // How often idle rate limit entries are evicted, in seconds
    #[arg(long, env = "SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval: u64,

    // Use the first X-Forwarded-For address instead of the peer address
    #[arg(long, env = "TRUST_PROXY")]
    pub trust_proxy: bool,

    // Timeout for upstream calls in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT", default_value_t = 10)]
    pub upstream_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["weather-gateway"]).unwrap();
        assert_eq!(args.cache_ttl, 300);
        assert_eq!(args.allowed_origins.len(), 4);
        assert!(args.allowed_origins.contains(&"https://gurgant.github.io".to_string()));
    }

    #[test]
    fn test_origins_are_split() {
        let args = Args::try_parse_from([
            "weather-gateway",
            "--allowed-origins",
            "http://a.test,http://b.test",
            "--trust-proxy",
        ])
        .unwrap();
        assert_eq!(args.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(args.trust_proxy);
    }
}
