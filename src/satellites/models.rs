use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SatelliteCategory {
    SpaceStation,
    Scientific,
    Communication,
    Navigation,
    Weather,
    EarthObservation,
    #[serde(other)]
    Other,
}

impl SatelliteCategory {
    /// Marker colour used by the globe view
    pub fn color(self) -> &'static str {
        match self {
            SatelliteCategory::SpaceStation => "#FF4C4C",
            SatelliteCategory::Scientific => "#00F5FF",
            SatelliteCategory::Communication => "#FFB800",
            SatelliteCategory::Navigation => "#00FF88",
            SatelliteCategory::Weather => "#7B61FF",
            SatelliteCategory::EarthObservation => "#FF6B9D",
            SatelliteCategory::Other => "#FFFFFF",
        }
    }
}

/// Two-line element set with display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub category: SatelliteCategory,
}

impl TleRecord {
    /// NORAD catalog number, columns 3-7 of line 1
    pub fn catalog_id(&self) -> Option<&str> {
        catalog_id_of(&self.line1)
    }
}

/// Catalog number field of a TLE line, trimmed
pub fn catalog_id_of(line: &str) -> Option<&str> {
    line.get(2..7).map(str::trim).filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SatellitePosition {
    pub name: String,
    pub category: SatelliteCategory,
    /// Geodetic latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees, -180..180
    pub longitude: f64,
    pub altitude_km: f64,
    pub speed_km_per_sec: f64,
    pub catalog_id: String,
}

/// Position plus marker colour, as served by `/satellites`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteView {
    #[serde(flatten)]
    pub position: SatellitePosition,
    pub color: String,
}

impl From<SatellitePosition> for SatelliteView {
    fn from(position: SatellitePosition) -> Self {
        Self {
            color: position.category.color().to_string(),
            position,
        }
    }
}
