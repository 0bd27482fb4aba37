use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod database;
mod routes;
mod store;
mod utils;
mod weather;

use config::Config;
use database::{Database, KeyValueStore};
use routes::{create_router, AppState};
use store::{RecentSearches, ThemeStore, WeatherStore};
use utils::SystemClock;
use weather::cache::WeatherCache;
use weather::fetcher::WeatherFetcher;
use weather::mock::MockWeatherApi;
use weather::openweather::OpenWeatherClient;
use weather::WeatherApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let timezone = utils::parse_timezone(&config.app_timezone)?;

    // Key/value storage for theme and recent searches
    let pool = sqlx::SqlitePool::connect(&config.database_url).await?;
    let database = Arc::new(Database::new(pool));
    database.init_tables().await?;
    let storage: Arc<dyn KeyValueStore> = database;

    let api: Arc<dyn WeatherApi> = match &config.openweather_api_key {
        Some(key) => Arc::new(OpenWeatherClient::new(&config, key.clone())?),
        None => {
            tracing::warn!("OPENWEATHER_API_KEY not set, serving synthetic weather data");
            Arc::new(MockWeatherApi::new())
        }
    };

    let cache = WeatherCache::new(config.cache_duration(), Arc::new(SystemClock));
    let fetcher = WeatherFetcher::new(api, cache, timezone);
    let recent = RecentSearches::load(storage.clone()).await;
    let weather = Arc::new(WeatherStore::new(
        fetcher,
        recent,
        config.default_city.clone(),
    ));
    let theme = Arc::new(ThemeStore::load(storage).await);

    let mut forecast_updates = weather.subscribe_forecast();
    tokio::spawn(async move {
        while forecast_updates.changed().await.is_ok() {
            let days = forecast_updates.borrow().len();
            tracing::debug!("Forecast updated with {} days", days);
        }
    });

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        weather,
        theme,
    };

    let app = create_router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
