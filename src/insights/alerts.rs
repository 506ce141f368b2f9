use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use super::clock;
use super::thresholds::{
    AURORA_MIN_ABS_LATITUDE, FLOOD_CRITICAL_HOURS, FLOOD_HEAVY_RAIN_CHANCE, FLOOD_LOOKAHEAD_HOURS,
    FLOOD_WARNING_HOURS, HEATWAVE_C, HEATWAVE_CRITICAL_C, HEAT_ADVISORY_C, ISS_MAX_CLOUD_COVER,
    KP_SEVERE_STORM, KP_STORM, STORM_CRITICAL_WIND_KPH, STORM_WIND_KPH,
};
use crate::space_weather::KpIndexReading;
use crate::weather::models::{AstronomyInfo, CurrentWeather, HourlyForecastSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Iss,
    Aurora,
    Flood,
    Heatwave,
    Storm,
    Solar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    /// Sort rank, most urgent first
    pub fn rank(self) -> u8 {
        match self {
            AlertSeverity::Critical => 0,
            AlertSeverity::Warning => 1,
            AlertSeverity::Info => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub timeframe: String,
}

impl Alert {
    fn new(
        id: &str,
        alert_type: AlertType,
        severity: AlertSeverity,
        icon: &str,
        title: &str,
        message: String,
        timeframe: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            alert_type,
            severity,
            icon: icon.to_string(),
            title: title.to_string(),
            message,
            timeframe: timeframe.to_string(),
        }
    }
}

/// Everything the alert rules look at for one location
#[derive(Debug, Clone, Copy)]
pub struct AlertInput<'a> {
    pub weather: Option<&'a CurrentWeather>,
    pub astronomy: Option<&'a AstronomyInfo>,
    pub hourly: &'a [HourlyForecastSlot],
    pub kp_index: Option<&'a KpIndexReading>,
    pub lat: f64,
    pub lng: f64,
    /// Location-local wall-clock time
    pub now: NaiveDateTime,
}

fn storm_severity(kp: f64) -> AlertSeverity {
    if kp >= KP_SEVERE_STORM {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    }
}

fn iss_alert(input: &AlertInput<'_>) -> Option<Alert> {
    let weather = input.weather?;
    let astronomy = input.astronomy?;

    if !clock::is_after_sunset(input.now, astronomy) || weather.cloud_cover_percent >= ISS_MAX_CLOUD_COVER {
        return None;
    }

    Some(Alert::new(
        "iss-visible",
        AlertType::Iss,
        AlertSeverity::Info,
        "🛰️",
        "ISS May Be Visible",
        format!(
            "Clear skies ({}% clouds) after sunset. Great conditions to spot the ISS overhead.",
            weather.cloud_cover_percent
        ),
        "Tonight",
    ))
}

/// Latitude-gated aurora alert, or the extreme-storm variant when the
/// latitude gate fails but Kp is severe. At most one of the two fires.
fn aurora_alert(input: &AlertInput<'_>) -> Option<Alert> {
    let kp = input.kp_index?.kp_value;
    let abs_lat = input.lat.abs();

    if kp >= KP_STORM && abs_lat > AURORA_MIN_ABS_LATITUDE {
        Some(Alert::new(
            "aurora",
            AlertType::Aurora,
            storm_severity(kp),
            "🌌",
            "Aurora Visibility Possible",
            format!(
                "Kp Index at {kp:.1} with your latitude at {abs_lat:.1}°. Aurora may be visible tonight."
            ),
            "Next 6–12 hours",
        ))
    } else if kp >= KP_SEVERE_STORM {
        Some(Alert::new(
            "aurora-extreme",
            AlertType::Aurora,
            AlertSeverity::Critical,
            "🌌",
            "Extreme Geomagnetic Storm",
            format!("Kp Index at {kp:.1}! Aurora may be visible at unusually low latitudes."),
            "Now",
        ))
    } else {
        None
    }
}

fn flood_alert(input: &AlertInput<'_>) -> Option<Alert> {
    // Hourly data starts at local midnight; skip slots that have already ended.
    let heavy: Vec<f64> = input
        .hourly
        .iter()
        .filter(|h| h.timestamp + Duration::hours(1) > input.now)
        .take(FLOOD_LOOKAHEAD_HOURS)
        .map(|h| h.rain_chance_percent)
        .filter(|&chance| chance > FLOOD_HEAVY_RAIN_CHANCE)
        .collect();

    if heavy.len() < FLOOD_WARNING_HOURS {
        return None;
    }

    let average = (heavy.iter().sum::<f64>() / heavy.len() as f64).round();
    let severity = if heavy.len() >= FLOOD_CRITICAL_HOURS {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };

    Some(Alert::new(
        "flood-risk",
        AlertType::Flood,
        severity,
        "🌊",
        "Flood Risk Alert",
        format!(
            "Heavy rainfall predicted for {} of the next {FLOOD_LOOKAHEAD_HOURS} hours. Average rain chance: {average}%.",
            heavy.len()
        ),
        "Next 12 hours",
    ))
}

fn heat_alert(weather: &CurrentWeather) -> Option<Alert> {
    let temp = weather.temperature_c;

    if temp > HEATWAVE_C {
        let severity = if temp > HEATWAVE_CRITICAL_C {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        Some(Alert::new(
            "heatwave",
            AlertType::Heatwave,
            severity,
            "🌡️",
            "Heatwave Alert",
            format!(
                "Extreme temperature: {temp}°C (feels like {}°C). Stay hydrated and avoid sun exposure.",
                weather.feels_like_c
            ),
            "Active now",
        ))
    } else if temp > HEAT_ADVISORY_C {
        Some(Alert::new(
            "heat-advisory",
            AlertType::Heatwave,
            AlertSeverity::Info,
            "🌡️",
            "Heat Advisory",
            format!("High temperature: {temp}°C. Stay hydrated."),
            "Active now",
        ))
    } else {
        None
    }
}

fn storm_alert(weather: &CurrentWeather) -> Option<Alert> {
    let wind = weather.wind_speed_kph;
    if wind <= STORM_WIND_KPH {
        return None;
    }

    let severity = if wind > STORM_CRITICAL_WIND_KPH {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };

    Some(Alert::new(
        "storm",
        AlertType::Storm,
        severity,
        "💨",
        "Storm Warning",
        format!(
            "Dangerous winds at {} km/h from {}. Secure outdoor items and stay indoors.",
            wind.round(),
            weather.wind_direction
        ),
        "Active now",
    ))
}

fn solar_alert(kp_index: &KpIndexReading) -> Option<Alert> {
    let kp = kp_index.kp_value;
    if kp < KP_STORM {
        return None;
    }

    Some(Alert::new(
        "solar-storm",
        AlertType::Solar,
        storm_severity(kp),
        "☀️",
        "Geomagnetic Storm",
        format!(
            "Kp Index at {kp:.1} ({}). GPS and communication disruptions possible.",
            kp_index.kp_level
        ),
        "Active now",
    ))
}

/// Evaluate every alert rule and return the alerts, most severe first.
///
/// Rules fire independently; the sort is stable so alerts of equal severity
/// keep rule order (ISS, aurora, flood, heat, storm, solar).
pub fn generate_alerts(input: &AlertInput<'_>) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = [
        iss_alert(input),
        aurora_alert(input),
        flood_alert(input),
        input.weather.and_then(heat_alert),
        input.weather.and_then(storm_alert),
        input.kp_index.and_then(solar_alert),
    ]
    .into_iter()
    .flatten()
    .collect();

    alerts.sort_by_key(|a| a.severity.rank());

    tracing::debug!(
        count = alerts.len(),
        lat = input.lat,
        lng = input.lng,
        "Generated alerts"
    );

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn weather(temp: f64, cloud: f64, wind: f64) -> CurrentWeather {
        CurrentWeather {
            temperature_c: temp,
            humidity: 50.0,
            cloud_cover_percent: cloud,
            visibility_km: 10.0,
            wind_speed_kph: wind,
            wind_direction: "SW".to_string(),
            feels_like_c: temp + 2.0,
            uv_index: 1.0,
            precipitation_mm: 0.0,
            condition_text: "Clear".to_string(),
        }
    }

    fn astronomy() -> AstronomyInfo {
        AstronomyInfo {
            sunrise: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            sunset: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            moonrise: None,
            moonset: None,
            moon_phase: "Full Moon".to_string(),
            moon_illumination: 99.0,
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn rainy_hours(chances: &[f64]) -> Vec<HourlyForecastSlot> {
        chances
            .iter()
            .enumerate()
            .map(|(i, &chance)| HourlyForecastSlot {
                timestamp: at(12, 0) + Duration::hours(i as i64),
                cloud_cover_percent: 90.0,
                rain_chance_percent: chance,
                visibility_km: 4.0,
                temperature_c: 20.0,
                wind_speed_kph: 10.0,
                humidity: 90.0,
            })
            .collect()
    }

    fn input<'a>(
        weather: Option<&'a CurrentWeather>,
        astronomy: Option<&'a AstronomyInfo>,
        hourly: &'a [HourlyForecastSlot],
        kp_index: Option<&'a KpIndexReading>,
        lat: f64,
        now: NaiveDateTime,
    ) -> AlertInput<'a> {
        AlertInput {
            weather,
            astronomy,
            hourly,
            kp_index,
            lat,
            lng: 10.0,
            now,
        }
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_no_data_no_alerts() {
        let alerts = generate_alerts(&input(None, None, &[], None, 0.0, at(12, 0)));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_high_kp_at_high_latitude_fires_aurora_and_solar() {
        let kp = KpIndexReading::new(8.0, "2024-05-10 18:00:00.000");
        let alerts = generate_alerts(&input(None, None, &[], Some(&kp), 60.0, at(12, 0)));

        assert!(alerts.len() >= 2);
        assert_eq!(ids(&alerts), vec!["aurora", "solar-storm"]);
        assert!(alerts.iter().all(|a| a.severity == AlertSeverity::Critical));
        assert_eq!(
            alerts[0].message,
            "Kp Index at 8.0 with your latitude at 60.0°. Aurora may be visible tonight."
        );
        assert_eq!(
            alerts[1].message,
            "Kp Index at 8.0 (Severe Storm). GPS and communication disruptions possible."
        );
    }

    #[test]
    fn test_extreme_kp_at_low_latitude_fires_extreme_aurora() {
        let kp = KpIndexReading::new(7.33, "t");
        let alerts = generate_alerts(&input(None, None, &[], Some(&kp), -20.0, at(12, 0)));

        assert_eq!(ids(&alerts), vec!["aurora-extreme", "solar-storm"]);
        assert_eq!(alerts[0].timeframe, "Now");
    }

    #[test]
    fn test_storm_kp_at_low_latitude_is_solar_only() {
        let kp = KpIndexReading::new(5.67, "t");
        let alerts = generate_alerts(&input(None, None, &[], Some(&kp), 19.0, at(12, 0)));

        assert_eq!(ids(&alerts), vec!["solar-storm"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_southern_latitude_counts_for_aurora() {
        let kp = KpIndexReading::new(5.0, "t");
        let alerts = generate_alerts(&input(None, None, &[], Some(&kp), -62.5, at(12, 0)));

        assert_eq!(ids(&alerts), vec!["aurora", "solar-storm"]);
        assert!(alerts[0].message.contains("latitude at 62.5°"));
    }

    #[test]
    fn test_iss_requires_night_and_clear_sky() {
        let clear = weather(18.0, 10.0, 5.0);
        let cloudy = weather(18.0, 30.0, 5.0);
        let astro = astronomy();

        let evening = generate_alerts(&input(Some(&clear), Some(&astro), &[], None, 40.0, at(21, 0)));
        assert_eq!(ids(&evening), vec!["iss-visible"]);
        assert_eq!(
            evening[0].message,
            "Clear skies (10% clouds) after sunset. Great conditions to spot the ISS overhead."
        );

        let afternoon = generate_alerts(&input(Some(&clear), Some(&astro), &[], None, 40.0, at(15, 0)));
        assert!(afternoon.is_empty());

        let overcast = generate_alerts(&input(Some(&cloudy), Some(&astro), &[], None, 40.0, at(21, 0)));
        assert!(overcast.is_empty());
    }

    #[test]
    fn test_iss_still_visible_after_midnight() {
        let clear = weather(12.0, 0.0, 5.0);
        let astro = astronomy();
        let alerts = generate_alerts(&input(Some(&clear), Some(&astro), &[], None, 40.0, at(1, 30)));

        assert_eq!(ids(&alerts), vec!["iss-visible"]);
    }

    #[test]
    fn test_flood_counts_heavy_rain_hours() {
        let hourly = rainy_hours(&[80.0, 90.0, 70.0, 75.0, 10.0, 20.0]);
        let alerts = generate_alerts(&input(None, None, &hourly, None, 0.0, at(12, 0)));

        assert_eq!(ids(&alerts), vec!["flood-risk"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        // 70 is not heavy; (80 + 90 + 75) / 3 = 81.67
        assert_eq!(
            alerts[0].message,
            "Heavy rainfall predicted for 3 of the next 12 hours. Average rain chance: 82%."
        );
    }

    #[test]
    fn test_flood_critical_and_lookahead() {
        let hourly = rainy_hours(&[95.0; 8]);
        let alerts = generate_alerts(&input(None, None, &hourly, None, 0.0, at(12, 0)));
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);

        let mut late = vec![0.0; 12];
        late.extend([95.0; 6]);
        let hourly = rainy_hours(&late);
        assert!(generate_alerts(&input(None, None, &hourly, None, 0.0, at(12, 0))).is_empty());
    }

    #[test]
    fn test_flood_ignores_hours_already_past() {
        let midnight = at(0, 0);
        let hourly: Vec<HourlyForecastSlot> = (0..48)
            .map(|i| HourlyForecastSlot {
                timestamp: midnight + Duration::hours(i),
                cloud_cover_percent: 90.0,
                rain_chance_percent: if i < 6 { 95.0 } else { 0.0 },
                visibility_km: 4.0,
                temperature_c: 20.0,
                wind_speed_kph: 10.0,
                humidity: 90.0,
            })
            .collect();

        assert!(generate_alerts(&input(None, None, &hourly, None, 0.0, at(20, 0))).is_empty());

        let alerts = generate_alerts(&input(None, None, &hourly, None, 0.0, at(2, 30)));
        assert_eq!(ids(&alerts), vec!["flood-risk"]);
        assert!(alerts[0].message.starts_with("Heavy rainfall predicted for 4 of the next 12 hours"));
    }

    #[test]
    fn test_heat_ladder() {
        let advisory = weather(36.0, 0.0, 5.0);
        let alerts = generate_alerts(&input(Some(&advisory), None, &[], None, 20.0, at(13, 0)));
        assert_eq!(ids(&alerts), vec!["heat-advisory"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);
        assert_eq!(alerts[0].message, "High temperature: 36°C. Stay hydrated.");

        let heatwave = weather(41.5, 0.0, 5.0);
        let alerts = generate_alerts(&input(Some(&heatwave), None, &[], None, 20.0, at(13, 0)));
        assert_eq!(ids(&alerts), vec!["heatwave"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert!(alerts[0].message.contains("41.5°C (feels like 43.5°C)"));

        let extreme = weather(46.0, 0.0, 5.0);
        let alerts = generate_alerts(&input(Some(&extreme), None, &[], None, 20.0, at(13, 0)));
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);

        let warm = weather(35.0, 0.0, 5.0);
        assert!(generate_alerts(&input(Some(&warm), None, &[], None, 20.0, at(13, 0))).is_empty());
    }

    #[test]
    fn test_storm_wind() {
        let gusty = weather(20.0, 80.0, 72.4);
        let alerts = generate_alerts(&input(Some(&gusty), None, &[], None, 20.0, at(13, 0)));
        assert_eq!(ids(&alerts), vec!["storm"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert_eq!(
            alerts[0].message,
            "Dangerous winds at 72 km/h from SW. Secure outdoor items and stay indoors."
        );

        let hurricane = weather(20.0, 80.0, 120.0);
        let alerts = generate_alerts(&input(Some(&hurricane), None, &[], None, 20.0, at(13, 0)));
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_sorted_by_severity_stable_within_rank() {
        // heat-advisory (info), storm (critical), iss (info), solar (warning)
        let w = weather(37.0, 5.0, 95.0);
        let astro = astronomy();
        let kp = KpIndexReading::new(5.33, "t");
        let alerts = generate_alerts(&input(Some(&w), Some(&astro), &[], Some(&kp), 20.0, at(22, 0)));

        assert_eq!(ids(&alerts), vec!["storm", "solar-storm", "iss-visible", "heat-advisory"]);
        let ranks: Vec<u8> = alerts.iter().map(|a| a.severity.rank()).collect();
        assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_alert_serializes_type_and_severity() {
        let kp = KpIndexReading::new(6.0, "t");
        let alerts = generate_alerts(&input(None, None, &[], Some(&kp), 0.0, at(12, 0)));
        let json = serde_json::to_value(&alerts[0]).unwrap();

        assert_eq!(json["type"], "solar");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["icon"], "☀️");
    }

    #[test]
    fn test_same_input_same_alerts() {
        let w = weather(42.0, 10.0, 65.0);
        let astro = astronomy();
        let kp = KpIndexReading::new(7.0, "t");
        let hourly = rainy_hours(&[85.0; 4]);
        let i = input(Some(&w), Some(&astro), &hourly, Some(&kp), 58.0, at(23, 0));

        assert_eq!(generate_alerts(&i), generate_alerts(&i));
    }
}
