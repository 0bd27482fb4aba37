use super::cache::WeatherCache;
use super::openweather::WeatherError;
use super::types::{ForecastEntry, WeatherRecord};
use super::WeatherApi;
use crate::utils::cache_key;
use std::sync::Arc;

/// Upstream steps are 3 hours apart, so every 8th one lands a day later.
pub const FORECAST_STEP: usize = 8;
pub const FORECAST_DAYS: usize = 5;

/// Keep one entry per 24-hour period, starting with the first, at most five.
pub fn downsample_daily(list: Vec<ForecastEntry>) -> Vec<ForecastEntry> {
    list.into_iter()
        .step_by(FORECAST_STEP)
        .take(FORECAST_DAYS)
        .collect()
}

/// Cache-aware access to the upstream weather API.
pub struct WeatherFetcher {
    api: Arc<dyn WeatherApi>,
    cache: WeatherCache,
    timezone: chrono_tz::Tz,
}

impl WeatherFetcher {
    pub fn new(api: Arc<dyn WeatherApi>, cache: WeatherCache, timezone: chrono_tz::Tz) -> Self {
        Self {
            api,
            cache,
            timezone,
        }
    }

    pub async fn fetch_current(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        if let Some(record) = self.cache.get(city).await {
            tracing::debug!("Serving {} from cache", cache_key(city));
            return Ok(record);
        }

        let response = self.api.current(city).await?;
        let record = response.into_record(self.timezone)?;

        self.cache
            .put(city, record.clone(), self.cache.now_ms())
            .await;

        Ok(record)
    }

    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let response = self.api.forecast(city).await?;
        Ok(downsample_daily(response.list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::test_support::{forecast_list, FakeWeatherApi};
    use crate::utils::test_support::ManualClock;
    use std::time::Duration;

    fn fetcher(api: Arc<FakeWeatherApi>, clock: &ManualClock) -> WeatherFetcher {
        let cache = WeatherCache::new(Duration::from_secs(30 * 60), Arc::new(clock.clone()));
        WeatherFetcher::new(api, cache, chrono_tz::UTC)
    }

    #[test]
    fn test_downsample_forty_steps_to_five_days() {
        let daily = downsample_daily(forecast_list(40));
        let picked: Vec<i64> = daily.iter().map(|entry| entry.dt).collect();
        assert_eq!(picked, vec![0, 8, 16, 24, 32]);
    }

    #[test]
    fn test_downsample_short_lists() {
        assert!(downsample_daily(Vec::new()).is_empty());
        assert_eq!(downsample_daily(forecast_list(1)).len(), 1);
        // indices 0 and 8
        assert_eq!(downsample_daily(forecast_list(9)).len(), 2);
        assert_eq!(downsample_daily(forecast_list(100)).len(), 5);
    }

    #[tokio::test]
    async fn test_second_lookup_within_window_is_cached() {
        let api = Arc::new(FakeWeatherApi::new());
        let clock = ManualClock::at(0);
        let fetcher = fetcher(api.clone(), &clock);

        let first = fetcher.fetch_current("London").await.unwrap();
        clock.advance_ms(29 * 60 * 1000);
        let second = fetcher.fetch_current("london").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.current_calls(), 1);
    }

    #[tokio::test]
    async fn test_lookup_after_window_hits_network_again() {
        let api = Arc::new(FakeWeatherApi::new());
        let clock = ManualClock::at(0);
        let fetcher = fetcher(api.clone(), &clock);

        fetcher.fetch_current("London").await.unwrap();
        clock.advance_ms(31 * 60 * 1000);
        fetcher.fetch_current("London").await.unwrap();

        assert_eq!(api.current_calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let api = Arc::new(FakeWeatherApi::new());
        api.fail_current_with(503);
        let clock = ManualClock::at(0);
        let fetcher = fetcher(api.clone(), &clock);

        let err = fetcher.fetch_current("London").await.unwrap_err();
        assert_eq!(err.to_string(), "Weather API error: 503");

        api.succeed();
        fetcher.fetch_current("London").await.unwrap();
        assert_eq!(api.current_calls(), 2);
    }

    #[tokio::test]
    async fn test_not_found_message_uses_requested_name() {
        let api = Arc::new(FakeWeatherApi::new());
        api.fail_current_with(404);
        let clock = ManualClock::at(0);
        let fetcher = fetcher(api, &clock);

        let err = fetcher.fetch_current("Atlantis").await.unwrap_err();
        assert_eq!(err.to_string(), "City \"Atlantis\" not found");
    }

    #[tokio::test]
    async fn test_fetch_forecast_downsamples() {
        let api = Arc::new(FakeWeatherApi::new());
        let clock = ManualClock::at(0);
        let fetcher = fetcher(api, &clock);

        let forecast = fetcher.fetch_forecast("London").await.unwrap();
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast[4].dt, 32);
    }
}
