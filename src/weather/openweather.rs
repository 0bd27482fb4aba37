use super::types::*;
use super::WeatherApi;
use crate::config::Config;
use crate::utils::{format_local_time, meters_to_km, ms_to_kmh, round_to_int};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failures of a current-weather or forecast request. The display strings are
/// what the dashboard shows to the user.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("City \"{0}\" not found")]
    CityNotFound(String),
    #[error("Invalid API key")]
    InvalidCredentials,
    #[error("Weather API error: {0}")]
    UpstreamError(u16),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Malformed weather response: {0}")]
    Decode(String),
}

/// Map a non-success upstream status onto the error taxonomy.
pub fn classify_status(status: u16, city: &str) -> WeatherError {
    match status {
        404 => WeatherError::CityNotFound(city.to_string()),
        401 => WeatherError::InvalidCredentials,
        other => WeatherError::UpstreamError(other),
    }
}

pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(config: &Config, api_key: String) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent("WeatherDashboard/1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        tracing::debug!("Requesting {} for {}", url, city);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("OpenWeather {} returned {} for {}", endpoint, status, city);
            return Err(classify_status(status.as_u16(), city));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                WeatherError::Decode(e.to_string())
            } else {
                WeatherError::NetworkError(e)
            }
        })?;
        parse_body(body)
    }
}

/// Shape a JSON body into an upstream payload type.
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, WeatherError> {
    serde_json::from_value(body).map_err(|e| WeatherError::Decode(e.to_string()))
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<CurrentWeatherResponse, WeatherError> {
        self.get_json("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        self.get_json("forecast", city).await
    }
}

/// Pictogram for an upstream weather-group label.
pub fn icon_for(condition: &str) -> &'static str {
    match condition {
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "Rain" => "🌧️",
        "Drizzle" => "🌦️",
        "Thunderstorm" => "⛈️",
        "Snow" => "❄️",
        "Mist" => "🌫️",
        _ => "🌤️",
    }
}

// Convert OpenWeather data to internal format
impl CurrentWeatherResponse {
    pub fn into_record(self, tz: chrono_tz::Tz) -> Result<WeatherRecord, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Decode("missing weather conditions".to_string()))?;

        let (lat, lon) = self
            .coord
            .map(|coord| (coord.lat, coord.lon))
            .unwrap_or((0.0, 0.0));

        Ok(WeatherRecord {
            name: format!("{}, {}", self.name, self.sys.country),
            city: self.name,
            country: self.sys.country,
            temp: round_to_int(self.main.temp),
            feels_like: round_to_int(self.main.feels_like),
            icon: icon_for(&condition.main).to_string(),
            description: condition.main,
            humidity: round_to_int(self.main.humidity),
            wind_speed: round_to_int(ms_to_kmh(self.wind.speed)),
            pressure: round_to_int(self.main.pressure),
            visibility: meters_to_km(self.visibility),
            sunrise: format_local_time(self.sys.sunrise, tz),
            sunset: format_local_time(self.sys.sunset, tz),
            // not provided by the current-weather endpoint
            uv_index: 0,
            lat,
            lon,
        })
    }
}
