use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub country: String,
    /// "{city}, {country}"
    pub name: String,
    pub temp: i64,
    pub feels_like: i64,
    pub description: String,
    pub icon: String,
    pub humidity: i64,
    /// km/h
    pub wind_speed: i64,
    /// mbar
    pub pressure: i64,
    /// km
    pub visibility: f64,
    pub sunrise: String,
    pub sunset: String,
    pub uv_index: i64,
    pub lat: f64,
    pub lon: f64,
}

// Upstream `/weather` payload, limited to the fields we consume.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub name: String,
    pub coord: Option<Coord>,
    pub main: CurrentMain,
    pub weather: Vec<Condition>,
    pub wind: CurrentWind,
    pub visibility: f64,
    pub sys: CurrentSys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coord {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWind {
    /// m/s with metric units
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

// Upstream `/forecast` payload (5 day / 3 hour steps).

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// One 3-hour forecast step, passed through to the presentation layer.
/// Fields we do not model are kept in `extra` so nothing is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub dt_txt: Option<String>,
    #[serde(default)]
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Option<ForecastWind>,
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMain {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastWind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forecast_entry_keeps_unknown_fields() {
        let raw = json!({
            "dt": 1_704_099_600,
            "main": { "temp": 7.3, "sea_level": 1021, "temp_kf": -0.4 },
            "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }],
            "clouds": { "all": 75 },
            "visibility": 10000,
            "rain": { "3h": 0.42 },
            "sys": { "pod": "d" }
        });

        let entry: ForecastEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.main.temp, Some(7.3));
        assert_eq!(entry.extra["clouds"], json!({ "all": 75 }));
        assert_eq!(entry.extra["sys"]["pod"], "d");

        let out = serde_json::to_value(&entry).unwrap();
        assert_eq!(out["rain"]["3h"], json!(0.42));
        assert_eq!(out["visibility"], json!(10000));
        assert_eq!(out["main"]["sea_level"], json!(1021));
    }

    #[test]
    fn test_forecast_tolerates_missing_temperature() {
        let raw = json!({
            "list": [
                { "dt": 1, "main": { "humidity": 80 } },
                { "dt": 2 },
                { "dt": 3, "main": { "temp": 4.0 } }
            ]
        });

        let forecast: ForecastResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(forecast.list.len(), 3);
        assert_eq!(forecast.list[0].main.temp, None);
        assert_eq!(forecast.list[0].main.humidity, Some(80.0));
        assert_eq!(forecast.list[1].main, ForecastMain::default());
        assert_eq!(forecast.list[2].main.temp, Some(4.0));
    }
}
