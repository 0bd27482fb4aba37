use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub cache_ttl_secs: u64,
    pub default_city: String,
    pub app_timezone: String,
    pub database_url: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let cache_ttl_secs = match env::var("WEATHER_CACHE_TTL_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("WEATHER_CACHE_TTL_SECS must be a number of seconds, got {raw:?}"))?,
            Err(_) => 30 * 60,
        };

        let app_timezone = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        crate::utils::parse_timezone(&app_timezone).map_err(|e| anyhow::anyhow!(e))?;

        Ok(Config {
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string()),
            cache_ttl_secs,
            default_city: env::var("DEFAULT_CITY").unwrap_or_else(|_| "London".to_string()),
            app_timezone,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./weather_dashboard.db?mode=rwc".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            openweather_api_key: Some("test-key".to_string()),
            openweather_base_url: "http://127.0.0.1:9".to_string(),
            cache_ttl_secs: 30 * 60,
            default_city: "London".to_string(),
            app_timezone: "UTC".to_string(),
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
