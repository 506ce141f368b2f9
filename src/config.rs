use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WeatherAPI.com API key
    pub weather_api_key: String,

    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Location used when a request names none
    #[serde(default = "default_location")]
    pub default_location: String,

    /// How long a fetched weather snapshot is reused
    #[serde(default = "default_weather_cache_ttl_secs")]
    pub weather_cache_ttl_secs: u64,

    /// NOAA Space Weather Prediction Center
    #[serde(default = "default_noaa_base_url")]
    pub noaa_base_url: String,

    #[serde(default)]
    pub satellites: SatelliteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SatelliteConfig {
    /// CelesTrak GP endpoint
    #[serde(default = "default_celestrak_url")]
    pub celestrak_url: String,

    /// Bulk groups fetched on refresh, in order
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    #[serde(default = "default_tle_cache_ttl_secs")]
    pub tle_cache_ttl_secs: u64,

    /// Curated satellites fetched one by one when no group answers
    #[serde(default = "default_individual_fetch_limit")]
    pub individual_fetch_limit: usize,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            celestrak_url: default_celestrak_url(),
            groups: default_groups(),
            tle_cache_ttl_secs: default_tle_cache_ttl_secs(),
            individual_fetch_limit: default_individual_fetch_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_location() -> String {
    "Mumbai".to_string()
}

fn default_weather_cache_ttl_secs() -> u64 {
    600
}

fn default_noaa_base_url() -> String {
    "https://services.swpc.noaa.gov".to_string()
}

fn default_celestrak_url() -> String {
    "https://celestrak.org/NORAD/elements/gp.php".to_string()
}

fn default_groups() -> Vec<String> {
    vec!["stations".to_string(), "active".to_string()]
}

fn default_tle_cache_ttl_secs() -> u64 {
    3600
}

fn default_individual_fetch_limit() -> usize {
    10
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_location", default_location())?
            // Optional config files, then ASTROVIEW_* env vars
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            .add_source(
                Environment::with_prefix("ASTROVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = Config::builder()
            .set_override("weather_api_key", "test-key")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.default_location, "Mumbai");
        assert_eq!(config.weather_cache_ttl_secs, 600);
        assert_eq!(config.satellites.groups, vec!["stations", "active"]);
        assert_eq!(config.satellites.tle_cache_ttl_secs, 3600);
        assert_eq!(config.satellites.individual_fetch_limit, 10);
    }

    #[test]
    fn test_nested_override() {
        let config: AppConfig = Config::builder()
            .set_override("weather_api_key", "k")
            .unwrap()
            .set_override("satellites.individual_fetch_limit", 3)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.satellites.individual_fetch_limit, 3);
        assert_eq!(config.satellites.celestrak_url, default_celestrak_url());
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result: Result<AppConfig, _> = Config::builder().build().unwrap().try_deserialize();
        assert!(result.is_err());
    }
}
