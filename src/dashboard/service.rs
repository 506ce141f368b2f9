use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use super::models::{DashboardResponse, VisibilityReport};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::insights::{
    analyze_impacts, compute_best_viewing_window, compute_visibility_score, generate_alerts,
    AlertInput,
};
use crate::space_weather::{KpIndexReading, SpaceWeatherService};
use crate::weather::models::WeatherSnapshot;
use crate::weather::{WeatherError, WeatherService};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl HttpError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Weather(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Weather(e) => e.error_code(),
        }
    }
}

impl_into_response!(DashboardError);

/// Joins weather and space weather and runs every insight engine
pub struct DashboardService {
    weather: Arc<WeatherService>,
    space_weather: Arc<SpaceWeatherService>,
}

impl DashboardService {
    pub fn new(weather: Arc<WeatherService>, space_weather: Arc<SpaceWeatherService>) -> Self {
        Self {
            weather,
            space_weather,
        }
    }

    pub async fn build(&self, location: &str) -> Result<DashboardResponse, DashboardError> {
        let (snapshot, kp_index) = tokio::join!(self.weather.get_snapshot(location), self.kp_or_none());
        let snapshot = snapshot?;

        Ok(compose_dashboard(&snapshot, kp_index, Utc::now()))
    }

    /// A NOAA outage only removes the Kp-dependent insights
    async fn kp_or_none(&self) -> Option<KpIndexReading> {
        match self.space_weather.get_kp_index().await {
            Ok(reading) => Some(reading),
            Err(e) => {
                tracing::warn!(error = %e, "Kp index unavailable, continuing without it");
                metrics::counter!("astroview_kp_unavailable_total").increment(1);
                None
            }
        }
    }
}

pub fn compose_dashboard(
    snapshot: &WeatherSnapshot,
    kp_index: Option<KpIndexReading>,
    generated_at: DateTime<Utc>,
) -> DashboardResponse {
    let now = snapshot.local_time_at(generated_at);
    let astronomy = snapshot.astronomy.as_ref();
    let moon_illumination = astronomy.map_or(0.0, |a| a.moon_illumination);

    let visibility = VisibilityReport::from_score(compute_visibility_score(&snapshot.current));
    let viewing_window =
        compute_best_viewing_window(&snapshot.hourly, astronomy, moon_illumination, now);
    let alerts = generate_alerts(&AlertInput {
        weather: Some(&snapshot.current),
        astronomy,
        hourly: &snapshot.hourly,
        kp_index: kp_index.as_ref(),
        lat: snapshot.location.lat,
        lng: snapshot.location.lon,
        now,
    });
    let impacts = analyze_impacts(Some(&snapshot.current), &snapshot.days, kp_index.as_ref());

    tracing::info!(
        location = %snapshot.location.name,
        visibility = visibility.score,
        window_found = viewing_window.found,
        alerts = alerts.len(),
        impact = ?impacts.highest_severity(),
        "Dashboard composed"
    );

    DashboardResponse {
        location: snapshot.location.clone(),
        local_time: now,
        generated_at,
        current: snapshot.current.clone(),
        visibility,
        viewing_window,
        alerts,
        impacts,
        kp_index,
        astronomy: snapshot.astronomy.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::{ImpactSeverity, VisibilityRating};
    use crate::weather::models::{
        AstronomyInfo, CurrentWeather, ForecastDay, HourlyForecastSlot, LocationInfo,
    };
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};

    fn snapshot() -> WeatherSnapshot {
        let evening = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();

        WeatherSnapshot {
            location: LocationInfo {
                name: "Tromso".to_string(),
                region: "Troms".to_string(),
                country: "Norway".to_string(),
                lat: 69.65,
                lon: 18.96,
                timezone: "Europe/Oslo".to_string(),
            },
            reported_local_time: Some(evening),
            current: CurrentWeather {
                temperature_c: -6.0,
                humidity: 70.0,
                cloud_cover_percent: 10.0,
                visibility_km: 10.0,
                wind_speed_kph: 12.0,
                wind_direction: "S".to_string(),
                feels_like_c: -11.0,
                uv_index: 0.0,
                precipitation_mm: 0.0,
                condition_text: "Clear".to_string(),
            },
            hourly: (0..12)
                .map(|i| HourlyForecastSlot {
                    timestamp: evening + Duration::hours(i),
                    cloud_cover_percent: 5.0,
                    rain_chance_percent: 0.0,
                    visibility_km: 10.0,
                    temperature_c: -7.0,
                    wind_speed_kph: 10.0,
                    humidity: 72.0,
                })
                .collect(),
            days: vec![ForecastDay {
                date: evening.date(),
                max_temp_c: -4.0,
                min_temp_c: -10.0,
                daily_chance_of_rain: 0.0,
                total_precip_mm: 0.0,
                max_wind_kph: 15.0,
                avg_humidity: 70.0,
                uv_index: 0.0,
                condition_text: "Clear".to_string(),
            }],
            astronomy: Some(AstronomyInfo {
                sunrise: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
                sunset: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                moonrise: None,
                moonset: None,
                moon_phase: "New Moon".to_string(),
                moon_illumination: 2.0,
            }),
        }
    }

    /// 18:00 UTC is 19:00 in Oslo in January
    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_dashboard_uses_location_local_time() {
        let dashboard = compose_dashboard(&snapshot(), None, generated_at());
        assert_eq!(dashboard.local_time.time(), NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[test]
    fn test_storm_night_dashboard() {
        let kp = KpIndexReading::new(7.33, "2024-01-15 18:00:00.000");
        let dashboard = compose_dashboard(&snapshot(), Some(kp), generated_at());

        assert_eq!(dashboard.visibility.rating, VisibilityRating::Excellent);
        assert!(dashboard.viewing_window.found);
        assert_eq!(dashboard.viewing_window.start_time, "8:00 PM");

        let ids: Vec<&str> = dashboard.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["aurora", "solar-storm", "iss-visible"]);
        assert_eq!(dashboard.impacts.solar_impact.severity, ImpactSeverity::Critical);
    }

    #[test]
    fn test_missing_kp_degrades_gracefully() {
        let dashboard = compose_dashboard(&snapshot(), None, generated_at());

        assert!(dashboard.kp_index.is_none());
        assert!(dashboard.alerts.iter().all(|a| a.id == "iss-visible"));
        assert!(dashboard.impacts.solar_impact.cause.starts_with("Quiet"));

        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(json["kpIndex"].is_null());
        assert_eq!(json["visibility"]["rating"], "Excellent");
        assert_eq!(json["astronomy"]["sunset"], "1:00 PM");
    }
}
