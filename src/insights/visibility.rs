use serde::Serialize;
use utoipa::ToSchema;

use crate::weather::models::CurrentWeather;

const CLOUD_WEIGHT: f64 = 0.45;
const VISIBILITY_WEIGHT: f64 = 0.25;
const HUMIDITY_WEIGHT: f64 = 0.15;
const PRECIPITATION_WEIGHT: f64 = 0.15;

/// Visibility at which the visibility component saturates
const FULL_VISIBILITY_KM: f64 = 10.0;

/// Sky visibility score, 0 (overcast, wet) to 100 (perfectly clear)
pub fn compute_visibility_score(weather: &CurrentWeather) -> u8 {
    let cloud = (100.0 - weather.cloud_cover_percent).max(0.0);
    let visibility = (weather.visibility_km / FULL_VISIBILITY_KM * 100.0).min(100.0);
    let humidity = (100.0 - weather.humidity * 0.5).max(0.0);
    let precipitation = if weather.precipitation_mm > 0.0 { 0.0 } else { 100.0 };

    let score = cloud * CLOUD_WEIGHT
        + visibility * VISIBILITY_WEIGHT
        + humidity * HUMIDITY_WEIGHT
        + precipitation * PRECIPITATION_WEIGHT;

    score.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum VisibilityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl VisibilityRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => VisibilityRating::Excellent,
            60..=79 => VisibilityRating::Good,
            40..=59 => VisibilityRating::Fair,
            _ => VisibilityRating::Poor,
        }
    }
}
