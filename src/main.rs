mod cache;
mod config;
mod dashboard;
mod error;
mod extractors;
mod insights;
mod openapi;
mod routes;
mod satellites;
mod space_weather;
mod weather;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::{create_weather_cache, start_cache_cleanup_task};
use crate::config::AppConfig;
use crate::dashboard::DashboardService;
use crate::satellites::{CelestrakClient, SatelliteService, Sgp4Propagator, TleCache};
use crate::space_weather::SpaceWeatherService;
use crate::weather::WeatherService;

const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CACHE_CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dashboard_service: Arc<DashboardService>,
    pub space_weather_service: Arc<SpaceWeatherService>,
    pub satellite_service: Arc<SatelliteService>,
    pub metrics_handle: PrometheusHandle,
}

/// Shared HTTP client with connection pooling
fn create_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("astroview/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astroview=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        default_location = %config.default_location,
        "Configuration loaded successfully"
    );

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    let http_client = create_http_client()?;
    tracing::debug!("Shared HTTP client created");

    let weather_cache = create_weather_cache(Duration::from_secs(config.weather_cache_ttl_secs));
    start_cache_cleanup_task(
        Arc::clone(&weather_cache),
        Duration::from_secs(CACHE_CLEANUP_INTERVAL_SECS),
    );

    let weather_service = Arc::new(WeatherService::new(
        http_client.clone(),
        &config.weather_api_key,
        &config.weather_base_url,
        weather_cache,
    ));
    let space_weather_service = Arc::new(SpaceWeatherService::new(
        http_client.clone(),
        &config.noaa_base_url,
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        weather_service,
        Arc::clone(&space_weather_service),
    ));
    let satellite_service = Arc::new(SatelliteService::new(
        Arc::new(CelestrakClient::new(
            http_client,
            &config.satellites.celestrak_url,
        )),
        Arc::new(Sgp4Propagator),
        TleCache::new(Duration::from_secs(config.satellites.tle_cache_ttl_secs)),
        config.satellites.groups.clone(),
        config.satellites.individual_fetch_limit,
    ));

    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        config: Arc::new(config),
        dashboard_service,
        space_weather_service,
        satellite_service,
        metrics_handle,
    };

    let app = routes::build_router()
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
