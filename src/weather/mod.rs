pub mod cache;
pub mod fetcher;
pub mod mock;
pub mod openweather;
pub mod types;

use async_trait::async_trait;
use openweather::WeatherError;
use types::{CurrentWeatherResponse, ForecastResponse};

/// The two upstream endpoints the dashboard consumes.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// `GET /weather?q={city}&units=metric`
    async fn current(&self, city: &str) -> Result<CurrentWeatherResponse, WeatherError>;

    /// `GET /forecast?q={city}&units=metric`
    async fn forecast(&self, city: &str) -> Result<ForecastResponse, WeatherError>;
}

#[cfg(test)]
pub mod test_support {
    use super::openweather::{classify_status, WeatherError};
    use super::types::*;
    use super::WeatherApi;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    pub fn forecast_list(len: usize) -> Vec<ForecastEntry> {
        (0..len)
            .map(|i| ForecastEntry {
                dt: i as i64,
                dt_txt: None,
                main: ForecastMain {
                    temp: Some(10.0 + i as f64),
                    ..ForecastMain::default()
                },
                weather: Vec::new(),
                wind: None,
                pop: None,
                extra: Default::default(),
            })
            .collect()
    }

    /// Scripted upstream that counts requests and can hold them open.
    #[derive(Default)]
    pub struct FakeWeatherApi {
        current_calls: AtomicUsize,
        forecast_calls: AtomicUsize,
        current_status: Mutex<Option<u16>>,
        forecast_status: Mutex<Option<u16>>,
        gates: Mutex<HashMap<String, Arc<Notify>>>,
        forecast_gates: Mutex<HashMap<String, Arc<Notify>>>,
        malformed_current: AtomicBool,
    }

    impl FakeWeatherApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn current_calls(&self) -> usize {
            self.current_calls.load(Ordering::SeqCst)
        }

        pub fn forecast_calls(&self) -> usize {
            self.forecast_calls.load(Ordering::SeqCst)
        }

        pub fn fail_current_with(&self, status: u16) {
            *self.current_status.lock().unwrap() = Some(status);
        }

        pub fn fail_forecast_with(&self, status: u16) {
            *self.forecast_status.lock().unwrap() = Some(status);
        }

        /// Current-weather bodies fail to decode while set.
        pub fn malformed_current(&self, on: bool) {
            self.malformed_current.store(on, Ordering::SeqCst);
        }

        pub fn succeed(&self) {
            *self.current_status.lock().unwrap() = None;
            *self.forecast_status.lock().unwrap() = None;
        }

        /// Current-weather requests for `city` block until the returned notify fires.
        pub fn gate(&self, city: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(city.to_string(), notify.clone());
            notify
        }

        /// Forecast requests for `city` block until the returned notify fires.
        pub fn gate_forecast(&self, city: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.forecast_gates
                .lock()
                .unwrap()
                .insert(city.to_string(), notify.clone());
            notify
        }

        fn gate_for(&self, city: &str) -> Option<Arc<Notify>> {
            self.gates.lock().unwrap().get(city).cloned()
        }
    }

    #[async_trait]
    impl WeatherApi for FakeWeatherApi {
        async fn current(&self, city: &str) -> Result<CurrentWeatherResponse, WeatherError> {
            self.current_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gate_for(city) {
                gate.notified().await;
            }
            if let Some(status) = *self.current_status.lock().unwrap() {
                return Err(classify_status(status, city));
            }
            if self.malformed_current.load(Ordering::SeqCst) {
                return Err(WeatherError::Decode("missing field `main`".to_string()));
            }

            Ok(CurrentWeatherResponse {
                name: city.to_string(),
                coord: Some(Coord {
                    lat: 51.5,
                    lon: -0.12,
                }),
                main: CurrentMain {
                    temp: 20.4,
                    feels_like: 19.6,
                    humidity: 70.0,
                    pressure: 1015.0,
                },
                weather: vec![Condition {
                    main: "Clear".to_string(),
                    description: "clear sky".to_string(),
                    icon: "01d".to_string(),
                }],
                wind: CurrentWind { speed: 5.0 },
                visibility: 8000.0,
                sys: CurrentSys {
                    country: "XX".to_string(),
                    sunrise: 1_704_096_300,
                    sunset: 1_704_124_800,
                },
            })
        }

        async fn forecast(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.forecast_gates.lock().unwrap().get(city).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if let Some(status) = *self.forecast_status.lock().unwrap() {
                return Err(classify_status(status, city));
            }
            Ok(ForecastResponse {
                list: forecast_list(40),
            })
        }
    }
}
