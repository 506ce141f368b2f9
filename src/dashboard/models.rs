use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::insights::{Alert, ImpactAnalysis, ViewingWindow, VisibilityRating};
use crate::space_weather::KpIndexReading;
use crate::weather::models::{AstronomyInfo, CurrentWeather, LocationInfo};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityReport {
    pub score: u8,
    pub rating: VisibilityRating,
}

impl VisibilityReport {
    pub fn from_score(score: u8) -> Self {
        Self {
            score,
            rating: VisibilityRating::from_score(score),
        }
    }
}

/// Everything the sky dashboard shows for one location
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub location: LocationInfo,
    /// Wall-clock time at the location the insights were computed for
    pub local_time: NaiveDateTime,
    pub generated_at: DateTime<Utc>,
    pub current: CurrentWeather,
    pub visibility: VisibilityReport,
    pub viewing_window: ViewingWindow,
    pub alerts: Vec<Alert>,
    pub impacts: ImpactAnalysis,
    /// Absent when NOAA could not be reached
    pub kp_index: Option<KpIndexReading>,
    pub astronomy: Option<AstronomyInfo>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    pub location: String,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewingWindowResponse {
    pub location: String,
    pub viewing_window: ViewingWindow,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpactsResponse {
    pub location: String,
    pub impacts: ImpactAnalysis,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
