use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dashboard::models::{
    AlertsResponse, DashboardResponse, HealthResponse, ImpactsResponse, ViewingWindowResponse,
    VisibilityReport,
};
use crate::error::ErrorResponse;
use crate::insights::{
    Alert, AlertSeverity, AlertType, ImpactAnalysis, ImpactChain, ImpactSeverity, ViewingWindow,
    VisibilityRating,
};
use crate::satellites::{SatelliteCategory, SatellitePosition, SatelliteView, TleRecord};
use crate::space_weather::models::{
    FlareClass, FlareLevel, GeomagneticReport, GeomagneticStormLevel, SolarFlareActivity,
};
use crate::space_weather::{KpIndexReading, KpLevel};
use crate::weather::models::{
    AstronomyInfo, CurrentWeather, ForecastDay, HourlyForecastSlot, LocationInfo,
};

/// Schema documentation for the AstroView API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AstroView API",
        version = "0.1.0",
        description = "Sky visibility, stargazing windows, alerts, impact chains, space weather and live satellite positions.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "insights", description = "Visibility, viewing window, alerts and impacts per location"),
        (name = "space-weather", description = "NOAA planetary Kp index and solar flare outlook"),
        (name = "satellites", description = "Curated satellite element sets and positions")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            DashboardResponse,
            AlertsResponse,
            ViewingWindowResponse,
            ImpactsResponse,
            VisibilityReport,
            VisibilityRating,
            ViewingWindow,
            Alert,
            AlertType,
            AlertSeverity,
            ImpactAnalysis,
            ImpactChain,
            ImpactSeverity,
            KpIndexReading,
            KpLevel,
            GeomagneticReport,
            GeomagneticStormLevel,
            SolarFlareActivity,
            FlareClass,
            FlareLevel,
            CurrentWeather,
            HourlyForecastSlot,
            ForecastDay,
            AstronomyInfo,
            LocationInfo,
            SatelliteCategory,
            SatellitePosition,
            SatelliteView,
            TleRecord,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;

        for name in ["DashboardResponse", "Alert", "ViewingWindow", "TleRecord", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
