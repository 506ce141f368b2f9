use axum::{extract::State, Json};

use super::models::{GeomagneticReport, SolarFlareActivity};
use super::service::SpaceWeatherError;
use crate::AppState;

/// GET /api/v1/space-weather/kp
pub async fn get_kp_index(
    State(state): State<AppState>,
) -> Result<Json<GeomagneticReport>, SpaceWeatherError> {
    let reading = state.space_weather_service.get_kp_index().await?;
    Ok(Json(GeomagneticReport::from(reading)))
}

/// GET /api/v1/space-weather/flares
pub async fn get_solar_flares(State(state): State<AppState>) -> Json<SolarFlareActivity> {
    Json(state.space_weather_service.get_solar_flare_activity().await)
}
