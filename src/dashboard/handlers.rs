use axum::{extract::State, Json};

use super::models::{
    AlertsResponse, DashboardResponse, HealthResponse, ImpactsResponse, ViewingWindowResponse,
};
use super::service::DashboardError;
use crate::extractors::LocationParam;
use crate::AppState;

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/dashboard/{location}
pub async fn get_dashboard(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<DashboardResponse>, DashboardError> {
    let location = location.or_default(state.config.default_location.clone());
    let dashboard = state.dashboard_service.build(&location).await?;
    Ok(Json(dashboard))
}

pub async fn get_alerts(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<AlertsResponse>, DashboardError> {
    let location = location.or_default(state.config.default_location.clone());
    let dashboard = state.dashboard_service.build(&location).await?;

    Ok(Json(AlertsResponse {
        location: dashboard.location.name,
        alerts: dashboard.alerts,
    }))
}

pub async fn get_viewing_window(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<ViewingWindowResponse>, DashboardError> {
    let location = location.or_default(state.config.default_location.clone());
    let dashboard = state.dashboard_service.build(&location).await?;

    Ok(Json(ViewingWindowResponse {
        location: dashboard.location.name,
        viewing_window: dashboard.viewing_window,
    }))
}

pub async fn get_impacts(
    State(state): State<AppState>,
    location: LocationParam,
) -> Result<Json<ImpactsResponse>, DashboardError> {
    let location = location.or_default(state.config.default_location.clone());
    let dashboard = state.dashboard_service.build(&location).await?;

    Ok(Json(ImpactsResponse {
        location: dashboard.location.name,
        impacts: dashboard.impacts,
    }))
}
