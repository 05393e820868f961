use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hribi::api::AppState;
use hribi::cache::Cache;
use hribi::catalog::SelectionController;
use hribi::config::HribiConfig;
use hribi::weather::WeatherService;
use hribi::{cameras, catalog, news, web};

fn init_tracing(config: &HribiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = env::args().nth(1);
    let config = HribiConfig::load(config_path.as_deref()).context("Failed to load config")?;
    init_tracing(&config);
    info!(version = hribi::VERSION, "starting hribi");

    let cache = Cache::open(&config.cache.location)
        .with_context(|| format!("Failed to open cache at {}", config.cache.location))?;

    let catalog = catalog::load_default().context("Failed to load hill catalog")?;
    let cameras = cameras::load_default().context("Failed to load camera list")?;
    let news = news::load_default().context("Failed to load news feed")?;

    let weather_ttl = Duration::from_secs(u64::from(config.cache.ttl_minutes) * 60);
    let weather = WeatherService::from_config(&config.weather, cache.clone(), weather_ttl)
        .context("Failed to build weather service")?;

    let state = Arc::new(AppState {
        catalog,
        weather,
        selection: Mutex::new(SelectionController::new()),
        cameras,
        news,
    });

    web::run(state, config.server.port, &config.server.frontend_dir).await
}
