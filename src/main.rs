/// Main application entry point
use satellite_tracker::clients::{AssetSource, DataSource, HttpSource};
use satellite_tracker::config::{AppConfig, DataSourceConfig};
use satellite_tracker::controllers::{ListController, ListEvent};
use satellite_tracker::domain::SatelliteRepository;
use satellite_tracker::errors::{DefaultErrorMessages, ErrorMessageProvider};
use satellite_tracker::handlers::AppState;
use satellite_tracker::repo::DetailCache;
use satellite_tracker::routes::build_router;
use satellite_tracker::services::SatelliteService;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Initialize the detail cache
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let cache = DetailCache::new(pool);
    cache.init().await?;
    info!("Detail cache initialized");

    // Initialize the document source
    let source: Arc<dyn DataSource> = match &config.data_source {
        DataSourceConfig::Assets(dir) => {
            info!("Reading bundled documents from {}", dir.display());
            Arc::new(AssetSource::new(dir.clone()))
        }
        DataSourceConfig::Http(url) => {
            info!("Fetching documents from {}", url);
            Arc::new(HttpSource::new(url.clone(), config.http_timeout)?)
        }
    };

    let repository: Arc<dyn SatelliteRepository> = Arc::new(SatelliteService::new(source, cache));
    let messages: Arc<dyn ErrorMessageProvider> = Arc::new(DefaultErrorMessages);

    // The list screen loads once when first shown
    let list = ListController::new(repository.clone(), messages.clone(), config.timings);
    list.dispatch(ListEvent::LoadSatellites);

    let state = AppState::new(list, repository, messages, config.timings);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("satellite-tracker listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
