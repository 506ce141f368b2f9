use axum::{extract::State, Json};

use super::models::{SatelliteView, TleRecord};
use crate::AppState;

/// Current positions of the curated satellites with marker colours
pub async fn get_satellites(State(state): State<AppState>) -> Json<Vec<SatelliteView>> {
    let positions = state.satellite_service.current_positions().await;
    Json(positions.into_iter().map(SatelliteView::from).collect())
}

pub async fn get_tle_records(State(state): State<AppState>) -> Json<Vec<TleRecord>> {
    let records = state.satellite_service.fetch_tle_data().await;
    Json(records.as_ref().clone())
}
