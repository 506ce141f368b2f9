use axum::{extract::State, routing::get, Router};

use crate::dashboard::handlers as dashboard_handlers;
use crate::openapi::swagger_ui;
use crate::satellites::handlers as satellite_handlers;
use crate::space_weather::handlers as space_weather_handlers;
use crate::AppState;

/// Location-scoped insight routes, each with and without a `{location}` segment
fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handlers::get_dashboard))
        .route("/dashboard/{location}", get(dashboard_handlers::get_dashboard))
        .route("/alerts", get(dashboard_handlers::get_alerts))
        .route("/alerts/{location}", get(dashboard_handlers::get_alerts))
        .route("/viewing-window", get(dashboard_handlers::get_viewing_window))
        .route(
            "/viewing-window/{location}",
            get(dashboard_handlers::get_viewing_window),
        )
        .route("/impacts", get(dashboard_handlers::get_impacts))
        .route("/impacts/{location}", get(dashboard_handlers::get_impacts))
}

fn space_weather_routes() -> Router<AppState> {
    Router::new()
        .route("/space-weather/kp", get(space_weather_handlers::get_kp_index))
        .route(
            "/space-weather/flares",
            get(space_weather_handlers::get_solar_flares),
        )
}

fn satellite_routes() -> Router<AppState> {
    Router::new()
        .route("/satellites", get(satellite_handlers::get_satellites))
        .route("/satellites/tle", get(satellite_handlers::get_tle_records))
}

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(insight_routes())
        .merge(space_weather_routes())
        .merge(satellite_routes())
}

/// Prometheus exposition of the recorder installed at startup
async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handlers::health))
        .route("/health", get(dashboard_handlers::health))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api_v1_routes())
        .merge(swagger_ui())
}
