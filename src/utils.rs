use chrono::{DateTime, Utc};

/// Source of "now" for cache validity checks, in milliseconds since the epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Normalize a city name into its cache key
pub fn cache_key(city: &str) -> String {
    city.to_lowercase()
}

/// Convert wind speed from m/s to km/h
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}

/// Convert a distance in meters to kilometers
pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// Round to the nearest integer, halves away from zero
pub fn round_to_int(value: f64) -> i64 {
    value.round() as i64
}

/// Parse timezone string and validate
pub fn parse_timezone(tz_str: &str) -> Result<chrono_tz::Tz, String> {
    tz_str
        .parse::<chrono_tz::Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Format a unix timestamp (seconds) as a 2-digit 12-hour wall-clock time, e.g. "06:42 AM"
pub fn format_local_time(unix_secs: i64, tz: chrono_tz::Tz) -> String {
    DateTime::<Utc>::from_timestamp(unix_secs, 0)
        .unwrap_or_default()
        .with_timezone(&tz)
        .format("%I:%M %p")
        .to_string()
}

/// Trim user input and reject empty city names
pub fn sanitize_city(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
