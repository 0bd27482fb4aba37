use super::recent::RecentSearches;
use crate::weather::fetcher::WeatherFetcher;
use crate::weather::openweather::WeatherError;
use crate::weather::types::{ForecastEntry, WeatherRecord};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

const FALLBACK_ERROR: &str = "Failed to fetch weather";

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct StoreState {
    pub current_weather: Option<WeatherRecord>,
    pub recent_searches: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub forecast: Vec<ForecastEntry>,
}

#[derive(Debug, Default)]
struct LookupState {
    current_weather: Option<WeatherRecord>,
    loading: bool,
    error: Option<String>,
    /// Ticket of the most recently started lookup. Only that lookup may
    /// write its result.
    latest_ticket: u64,
    /// Ticket of the lookup whose weather is on display. Forecasts are only
    /// published for that lookup.
    weather_ticket: u64,
}

#[derive(Debug)]
pub enum LookupOutcome {
    /// Weather applied; the forecast keeps loading on its own task.
    Ready {
        weather: WeatherRecord,
        forecast: JoinHandle<()>,
    },
    /// Error message applied; previous weather left in place.
    Failed(String),
    /// A newer lookup started while this one was in flight; nothing applied.
    Superseded,
}

pub fn user_message(err: &WeatherError) -> String {
    match err {
        WeatherError::NetworkError(_) | WeatherError::Decode(_) => FALLBACK_ERROR.to_string(),
        other => other.to_string(),
    }
}

/// Orchestrates current weather, forecast and recent searches for one session.
pub struct WeatherStore {
    fetcher: WeatherFetcher,
    recent: RecentSearches,
    state: RwLock<LookupState>,
    forecast: watch::Sender<Vec<ForecastEntry>>,
    default_city: String,
    default_requested: AtomicBool,
}

impl WeatherStore {
    pub fn new(fetcher: WeatherFetcher, recent: RecentSearches, default_city: String) -> Self {
        let (forecast, _) = watch::channel(Vec::new());

        Self {
            fetcher,
            recent,
            state: RwLock::new(LookupState::default()),
            forecast,
            default_city,
            default_requested: AtomicBool::new(false),
        }
    }

    pub async fn snapshot(&self) -> StoreState {
        let state = self.state.read().await;

        StoreState {
            current_weather: state.current_weather.clone(),
            recent_searches: self.recent.list().await,
            loading: state.loading,
            error: state.error.clone(),
            forecast: self.forecast.borrow().clone(),
        }
    }

    /// Forecast updates arrive here independently of lookups.
    pub fn subscribe_forecast(&self) -> watch::Receiver<Vec<ForecastEntry>> {
        self.forecast.subscribe()
    }

    /// Look up the default city the first time an idle store is observed.
    pub async fn ensure_default_city(self: &Arc<Self>) -> Option<LookupOutcome> {
        if self.state.read().await.current_weather.is_some() {
            return None;
        }
        if self.default_requested.swap(true, Ordering::SeqCst) {
            return None;
        }

        tracing::info!("No weather loaded yet, looking up {}", self.default_city);
        let city = self.default_city.clone();
        Some(self.lookup(&city).await)
    }

    pub async fn lookup(self: &Arc<Self>, city: &str) -> LookupOutcome {
        let ticket = self.begin_lookup().await;

        match self.fetcher.fetch_current(city).await {
            Ok(record) => {
                {
                    let mut state = self.state.write().await;
                    if state.latest_ticket != ticket {
                        tracing::debug!("Dropping superseded result for {}", city);
                        return LookupOutcome::Superseded;
                    }
                    state.current_weather = Some(record.clone());
                    state.weather_ticket = ticket;
                    state.loading = false;
                }

                let store = Arc::clone(self);
                let forecast_city = city.to_string();
                let forecast = tokio::spawn(async move {
                    store.refresh_forecast(ticket, &forecast_city).await;
                });

                self.recent.add(city).await;

                LookupOutcome::Ready {
                    weather: record,
                    forecast,
                }
            }
            Err(e) => {
                let message = user_message(&e);
                let mut state = self.state.write().await;
                if state.latest_ticket != ticket {
                    tracing::debug!("Dropping superseded failure for {}: {}", city, e);
                    return LookupOutcome::Superseded;
                }

                tracing::warn!("Weather lookup for {} failed: {}", city, e);
                state.error = Some(message.clone());
                state.loading = false;
                LookupOutcome::Failed(message)
            }
        }
    }

    /// Fetch the forecast for `city` outside of a lookup. Failures are only logged.
    pub async fn fetch_forecast(&self, city: &str) {
        let ticket = self.state.read().await.weather_ticket;
        self.refresh_forecast(ticket, city).await;
    }

    pub async fn set_weather(&self, record: WeatherRecord) {
        self.state.write().await.current_weather = Some(record);
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn recent_searches(&self) -> Vec<String> {
        self.recent.list().await
    }

    pub async fn add_recent_search(&self, city: &str) -> Vec<String> {
        self.recent.add(city).await
    }

    pub async fn clear_recent_searches(&self) {
        self.recent.clear().await;
    }

    async fn begin_lookup(&self) -> u64 {
        // a user lookup takes the place of the default one
        self.default_requested.store(true, Ordering::SeqCst);

        let mut state = self.state.write().await;
        state.latest_ticket += 1;
        state.loading = true;
        state.error = None;
        state.latest_ticket
    }

    async fn refresh_forecast(&self, ticket: u64, city: &str) {
        match self.fetcher.fetch_forecast(city).await {
            Ok(entries) => {
                // held so no lookup can apply weather between the check and the publish
                let state = self.state.read().await;
                if state.weather_ticket == ticket {
                    self.forecast.send_replace(entries);
                } else {
                    tracing::debug!("Dropping superseded forecast for {}", city);
                }
            }
            Err(e) => tracing::warn!("Forecast fetch for {} failed: {}", city, e),
        }
    }
}
