use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    store::{LookupOutcome, StoreState, ThemeState, ThemeStore, WeatherStore},
    utils::sanitize_city,
    weather::types::WeatherRecord,
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: Arc<WeatherStore>,
    pub theme: Arc<ThemeStore>,
}

#[derive(Debug, Deserialize)]
pub struct CityRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub is_dark: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub default_city: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_city: state.config.default_city.clone(),
    })
}

pub async fn get_weather(State(state): State<AppState>) -> Json<StoreState> {
    if let Some(LookupOutcome::Failed(message)) = state.weather.ensure_default_city().await {
        tracing::error!("Default city lookup failed: {}", message);
    }
    Json(state.weather.snapshot().await)
}

pub async fn lookup_weather(
    State(state): State<AppState>,
    Json(request): Json<CityRequest>,
) -> Result<Json<StoreState>, StatusCode> {
    let city = sanitize_city(&request.city).ok_or(StatusCode::BAD_REQUEST)?;

    // upstream failures are reported through `StoreState::error`
    state.weather.lookup(&city).await;

    Ok(Json(state.weather.snapshot().await))
}

pub async fn set_weather(
    State(state): State<AppState>,
    Json(record): Json<WeatherRecord>,
) -> Json<StoreState> {
    state.weather.set_weather(record).await;
    Json(state.weather.snapshot().await)
}

pub async fn refresh_forecast(
    State(state): State<AppState>,
    Json(request): Json<CityRequest>,
) -> Result<Json<StoreState>, StatusCode> {
    let city = sanitize_city(&request.city).ok_or(StatusCode::BAD_REQUEST)?;
    state.weather.fetch_forecast(&city).await;
    Ok(Json(state.weather.snapshot().await))
}

pub async fn clear_error(State(state): State<AppState>) -> StatusCode {
    state.weather.clear_error().await;
    StatusCode::NO_CONTENT
}

pub async fn get_recent_searches(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.weather.recent_searches().await)
}

pub async fn add_recent_search(
    State(state): State<AppState>,
    Json(request): Json<CityRequest>,
) -> Result<Json<Vec<String>>, StatusCode> {
    let city = sanitize_city(&request.city).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(state.weather.add_recent_search(&city).await))
}

pub async fn clear_recent_searches(State(state): State<AppState>) -> StatusCode {
    state.weather.clear_recent_searches().await;
    StatusCode::NO_CONTENT
}

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeState> {
    Json(state.theme.state().await)
}

pub async fn set_theme(
    State(state): State<AppState>,
    Json(request): Json<ThemeRequest>,
) -> Json<ThemeState> {
    Json(state.theme.set(request.is_dark).await)
}

pub async fn toggle_theme(State(state): State<AppState>) -> Json<ThemeState> {
    Json(state.theme.toggle().await)
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather).put(set_weather))
        .route("/weather/lookup", post(lookup_weather))
        .route("/weather/forecast", post(refresh_forecast))
        .route("/weather/error", delete(clear_error))
        .route(
            "/recent-searches",
            get(get_recent_searches)
                .post(add_recent_search)
                .delete(clear_recent_searches),
        )
        .route("/theme", get(get_theme).put(set_theme))
        .route("/theme/toggle", post(toggle_theme))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
