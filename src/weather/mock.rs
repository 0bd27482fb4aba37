use super::openweather::WeatherError;
use super::types::*;
use super::WeatherApi;
use async_trait::async_trait;
use chrono::{Duration, Utc};

const CONDITIONS: [(&str, &str); 6] = [
    ("Clear", "clear sky"),
    ("Clouds", "scattered clouds"),
    ("Rain", "light rain"),
    ("Drizzle", "light intensity drizzle"),
    ("Snow", "light snow"),
    ("Mist", "mist"),
];

const KNOWN_CITIES: [(&str, &str, f64, f64); 6] = [
    ("London", "GB", 51.5085, -0.1257),
    ("Paris", "FR", 48.8534, 2.3488),
    ("Tokyo", "JP", 35.6895, 139.6917),
    ("New York", "US", 40.7143, -74.006),
    ("Sydney", "AU", -33.8679, 151.2073),
    ("Bangkok", "TH", 13.7563, 100.5018),
];

/// Offline stand-in for the OpenWeather API, used when no API key is configured.
pub struct MockWeatherApi;

impl MockWeatherApi {
    pub fn new() -> Self {
        Self
    }

    fn find_city(city: &str) -> Result<(&'static str, &'static str, f64, f64), WeatherError> {
        let query = city.to_lowercase();
        KNOWN_CITIES
            .iter()
            .find(|(name, _, _, _)| name.to_lowercase() == query)
            .copied()
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))
    }

    fn random_condition() -> Condition {
        let (main, description) = CONDITIONS[fastrand::usize(..CONDITIONS.len())];
        Condition {
            main: main.to_string(),
            description: description.to_string(),
            icon: String::new(),
        }
    }
}

impl Default for MockWeatherApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherApi for MockWeatherApi {
    async fn current(&self, city: &str) -> Result<CurrentWeatherResponse, WeatherError> {
        let (name, country, lat, lon) = Self::find_city(city)?;
        let now = Utc::now();
        let temp = 5.0 + 25.0 * fastrand::f64();

        Ok(CurrentWeatherResponse {
            name: name.to_string(),
            coord: Some(Coord { lat, lon }),
            main: CurrentMain {
                temp,
                feels_like: temp - 3.0 * fastrand::f64(),
                humidity: (40.0 + 50.0 * fastrand::f64()).round(),
                pressure: (1000.0 + 25.0 * fastrand::f64()).round(),
            },
            weather: vec![Self::random_condition()],
            wind: CurrentWind {
                speed: 0.5 + 9.5 * fastrand::f64(),
            },
            visibility: (4000 + fastrand::u32(..6001)) as f64,
            sys: CurrentSys {
                country: country.to_string(),
                sunrise: (now - Duration::hours(4)).timestamp(),
                sunset: (now + Duration::hours(8)).timestamp(),
            },
        })
    }

    async fn forecast(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        Self::find_city(city)?;
        let now = Utc::now();

        // 5 days of 3-hour steps
        let list = (0..40)
            .map(|i| {
                let target_time = now + Duration::hours(i * 3);
                let temp = 12.0 + 6.0 * (i as f64 * 0.26).sin();

                ForecastEntry {
                    dt: target_time.timestamp(),
                    dt_txt: Some(target_time.format("%Y-%m-%d %H:%M:%S").to_string()),
                    main: ForecastMain {
                        temp: Some(temp),
                        feels_like: Some(temp - 1.5),
                        temp_min: Some(temp - 2.0),
                        temp_max: Some(temp + 2.0),
                        humidity: Some(55.0 + 30.0 * fastrand::f64()),
                        pressure: Some(1013.0),
                        extra: Default::default(),
                    },
                    weather: vec![Self::random_condition()],
                    wind: Some(ForecastWind {
                        speed: 1.0 + 6.0 * fastrand::f64(),
                        deg: Some(360.0 * fastrand::f64()),
                    }),
                    pop: Some(fastrand::f64()),
                    extra: Default::default(),
                }
            })
            .collect();

        Ok(ForecastResponse { list })
    }
}
