use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::insights::clock;

// ============================================================================
// WeatherAPI.com forecast.json Response (Internal)
// These structs deserialize the raw API response; not all fields are used
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ForecastApiResponse {
    pub location: ApiLocation,
    pub current: ApiCurrent,
    pub forecast: ApiForecast,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ApiLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub tz_id: String,
    pub localtime: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiCurrent {
    pub temp_c: f64,
    pub humidity: f64,
    pub cloud: f64,
    pub vis_km: f64,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub feelslike_c: f64,
    pub uv: f64,
    pub precip_mm: f64,
    pub condition: ApiCondition,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize, Clone)]
pub struct ApiCondition {
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiForecast {
    pub forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
pub struct ApiForecastDay {
    pub date: String,
    pub day: ApiDay,
    pub astro: ApiAstro,
    #[serde(default)]
    pub hour: Vec<ApiHour>,
}

#[derive(Debug, Deserialize)]
pub struct ApiDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub daily_chance_of_rain: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub uv: f64,
    pub condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
pub struct ApiAstro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    /// Sent as a number by current API versions and as a string by older ones
    #[serde(deserialize_with = "number_or_string")]
    pub moon_illumination: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiHour {
    pub time: String,
    pub temp_c: f64,
    pub cloud: f64,
    #[serde(default)]
    pub chance_of_rain: f64,
    pub wind_kph: f64,
    pub vis_km: f64,
    pub humidity: f64,
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Normalized weather inputs (what the insight engine consumes)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub humidity: f64,
    pub cloud_cover_percent: f64,
    pub visibility_km: f64,
    pub wind_speed_kph: f64,
    pub wind_direction: String,
    pub feels_like_c: f64,
    pub uv_index: f64,
    pub precipitation_mm: f64,
    pub condition_text: String,
}

/// One hour of forecast, timestamped in the location's local time
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastSlot {
    pub timestamp: NaiveDateTime,
    pub cloud_cover_percent: f64,
    pub rain_chance_percent: f64,
    pub visibility_km: f64,
    pub temperature_c: f64,
    pub wind_speed_kph: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub daily_chance_of_rain: f64,
    pub total_precip_mm: f64,
    pub max_wind_kph: f64,
    pub avg_humidity: f64,
    pub uv_index: f64,
    pub condition_text: String,
}

/// Sun and moon times for the current day.
///
/// Times are structured; they only become "7:42 PM" strings when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AstronomyInfo {
    #[serde(serialize_with = "clock::serialize_clock_time")]
    #[schema(value_type = String, example = "6:12 AM")]
    pub sunrise: NaiveTime,
    #[serde(serialize_with = "clock::serialize_clock_time")]
    #[schema(value_type = String, example = "7:42 PM")]
    pub sunset: NaiveTime,
    #[serde(serialize_with = "clock::serialize_optional_clock_time")]
    #[schema(value_type = Option<String>)]
    pub moonrise: Option<NaiveTime>,
    #[serde(serialize_with = "clock::serialize_optional_clock_time")]
    #[schema(value_type = Option<String>)]
    pub moonset: Option<NaiveTime>,
    pub moon_phase: String,
    pub moon_illumination: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

/// Everything one forecast call tells us about a location
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub location: LocationInfo,
    /// Local wall-clock time reported by the provider when fetched
    pub reported_local_time: Option<NaiveDateTime>,
    pub current: CurrentWeather,
    pub hourly: Vec<HourlyForecastSlot>,
    pub days: Vec<ForecastDay>,
    pub astronomy: Option<AstronomyInfo>,
}

impl WeatherSnapshot {
    /// Wall-clock time at the location for the given instant.
    ///
    /// Uses the location's IANA zone; if the provider sent a zone we don't
    /// know, falls back to the local time it reported, then to UTC.
    pub fn local_time_at(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self.location.timezone.parse::<Tz>() {
            Ok(tz) => instant.with_timezone(&tz).naive_local(),
            Err(_) => {
                tracing::warn!(
                    timezone = %self.location.timezone,
                    "Unknown timezone, using provider local time"
                );
                self.reported_local_time
                    .unwrap_or_else(|| instant.naive_utc())
            }
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

const PROVIDER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn parse_provider_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), PROVIDER_DATETIME_FORMAT).ok()
}

impl From<ApiCurrent> for CurrentWeather {
    fn from(c: ApiCurrent) -> Self {
        CurrentWeather {
            temperature_c: c.temp_c,
            humidity: c.humidity,
            cloud_cover_percent: c.cloud,
            visibility_km: c.vis_km,
            wind_speed_kph: c.wind_kph,
            wind_direction: c.wind_dir,
            feels_like_c: c.feelslike_c,
            uv_index: c.uv,
            precipitation_mm: c.precip_mm,
            condition_text: c.condition.text,
        }
    }
}

impl From<&ApiAstro> for AstronomyInfo {
    fn from(a: &ApiAstro) -> Self {
        let sunrise = clock::parse_clock_time(&a.sunrise).unwrap_or_else(|| {
            tracing::warn!(sunrise = %a.sunrise, "Unreadable sunrise, assuming morning");
            clock::fallback_sunrise()
        });
        let sunset = clock::parse_clock_time(&a.sunset).unwrap_or_else(|| {
            tracing::warn!(sunset = %a.sunset, "Unreadable sunset, assuming evening");
            clock::fallback_sunset()
        });

        AstronomyInfo {
            sunrise,
            sunset,
            moonrise: clock::parse_clock_time(&a.moonrise),
            moonset: clock::parse_clock_time(&a.moonset),
            moon_phase: a.moon_phase.clone(),
            moon_illumination: a.moon_illumination,
        }
    }
}

impl ApiHour {
    fn into_slot(self) -> Option<HourlyForecastSlot> {
        let timestamp = parse_provider_datetime(&self.time)?;
        Some(HourlyForecastSlot {
            timestamp,
            cloud_cover_percent: self.cloud,
            rain_chance_percent: self.chance_of_rain,
            visibility_km: self.vis_km,
            temperature_c: self.temp_c,
            wind_speed_kph: self.wind_kph,
            humidity: self.humidity,
        })
    }
}

impl ApiForecastDay {
    fn summary(&self) -> Option<ForecastDay> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        Some(ForecastDay {
            date,
            max_temp_c: self.day.maxtemp_c,
            min_temp_c: self.day.mintemp_c,
            daily_chance_of_rain: self.day.daily_chance_of_rain,
            total_precip_mm: self.day.totalprecip_mm,
            max_wind_kph: self.day.maxwind_kph,
            avg_humidity: self.day.avghumidity,
            uv_index: self.day.uv,
            condition_text: self.day.condition.text.clone(),
        })
    }
}

impl From<ForecastApiResponse> for WeatherSnapshot {
    fn from(data: ForecastApiResponse) -> Self {
        let astronomy = data.forecast.forecastday.first().map(|d| AstronomyInfo::from(&d.astro));

        let mut days = Vec::with_capacity(data.forecast.forecastday.len());
        let mut hourly = Vec::new();
        for day in data.forecast.forecastday {
            match day.summary() {
                Some(summary) => days.push(summary),
                None => tracing::warn!(date = %day.date, "Skipping forecast day with unreadable date"),
            }
            hourly.extend(day.hour.into_iter().filter_map(ApiHour::into_slot));
        }
        // Days are flattened in order, but the engine relies on chronology
        hourly.sort_by_key(|h| h.timestamp);

        WeatherSnapshot {
            reported_local_time: parse_provider_datetime(&data.location.localtime),
            location: LocationInfo {
                name: data.location.name,
                region: data.location.region,
                country: data.location.country,
                lat: data.location.lat,
                lon: data.location.lon,
                timezone: data.location.tz_id,
            },
            current: data.current.into(),
            hourly,
            days,
            astronomy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {
            "name": "Tromso", "region": "Troms", "country": "Norway",
            "lat": 69.65, "lon": 18.96, "tz_id": "Europe/Oslo",
            "localtime": "2024-01-15 20:05"
        },
        "current": {
            "temp_c": -4.0, "humidity": 80, "cloud": 10, "vis_km": 10.0,
            "wind_kph": 12.6, "wind_dir": "SSE", "feelslike_c": -9.1,
            "uv": 0.0, "precip_mm": 0.0,
            "condition": { "text": "Clear", "icon": "//cdn/night/113.png" }
        },
        "forecast": { "forecastday": [
            {
                "date": "2024-01-15",
                "day": {
                    "maxtemp_c": -2.0, "mintemp_c": -7.5, "daily_chance_of_rain": 0,
                    "totalprecip_mm": 0.4, "maxwind_kph": 20.2, "avghumidity": 78,
                    "uv": 0.0, "condition": { "text": "Partly cloudy", "icon": "" }
                },
                "astro": {
                    "sunrise": "11:02 AM", "sunset": "01:05 PM",
                    "moonrise": "No moonrise", "moonset": "10:14 PM",
                    "moon_phase": "Waxing Crescent", "moon_illumination": "21"
                },
                "hour": [
                    { "time": "2024-01-15 21:00", "temp_c": -5.0, "cloud": 12,
                      "chance_of_rain": 0, "wind_kph": 10.0, "vis_km": 10.0, "humidity": 81 },
                    { "time": "2024-01-15 20:00", "temp_c": -4.5, "cloud": 8,
                      "chance_of_rain": 0, "wind_kph": 11.0, "vis_km": 10.0, "humidity": 80 }
                ]
            }
        ]}
    }"#;

    #[test]
    fn test_snapshot_from_forecast_response() {
        let raw: ForecastApiResponse = serde_json::from_str(SAMPLE).expect("sample should parse");
        let snapshot = WeatherSnapshot::from(raw);

        assert_eq!(snapshot.location.name, "Tromso");
        assert_eq!(snapshot.location.timezone, "Europe/Oslo");
        assert_eq!(snapshot.current.cloud_cover_percent, 10.0);
        assert_eq!(snapshot.current.wind_direction, "SSE");
        assert_eq!(snapshot.days.len(), 1);
        assert_eq!(snapshot.days[0].total_precip_mm, 0.4);
        assert_eq!(
            snapshot.reported_local_time,
            parse_provider_datetime("2024-01-15 20:05")
        );
    }

    #[test]
    fn test_hourly_slots_are_sorted() {
        let raw: ForecastApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = WeatherSnapshot::from(raw);

        assert_eq!(snapshot.hourly.len(), 2);
        assert!(snapshot.hourly[0].timestamp < snapshot.hourly[1].timestamp);
        assert_eq!(snapshot.hourly[0].cloud_cover_percent, 8.0);
    }

    #[test]
    fn test_astronomy_is_structured() {
        let raw: ForecastApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let astronomy = WeatherSnapshot::from(raw).astronomy.expect("astronomy present");

        assert_eq!(astronomy.sunset, NaiveTime::from_hms_opt(13, 5, 0).unwrap());
        assert_eq!(astronomy.moonrise, None);
        assert_eq!(astronomy.moonset, NaiveTime::from_hms_opt(22, 14, 0));
        assert_eq!(astronomy.moon_illumination, 21.0);
    }

    #[test]
    fn test_unreadable_sunset_falls_back_to_evening() {
        let astro = ApiAstro {
            sunrise: "??".to_string(),
            sunset: "n/a".to_string(),
            moonrise: "No moonrise".to_string(),
            moonset: "No moonset".to_string(),
            moon_phase: "New Moon".to_string(),
            moon_illumination: 0.0,
        };
        let info = AstronomyInfo::from(&astro);

        assert_eq!(info.sunset, clock::fallback_sunset());
        assert_eq!(info.sunrise, clock::fallback_sunrise());
    }

    #[test]
    fn test_local_time_uses_location_timezone() {
        let raw: ForecastApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = WeatherSnapshot::from(raw);
        let instant = DateTime::parse_from_rfc3339("2024-01-15T19:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        // Oslo is UTC+1 in January
        assert_eq!(
            snapshot.local_time_at(instant),
            parse_provider_datetime("2024-01-15 20:30").unwrap()
        );
    }

    #[test]
    fn test_local_time_falls_back_to_reported_time() {
        let raw: ForecastApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let mut snapshot = WeatherSnapshot::from(raw);
        snapshot.location.timezone = "Mars/Olympus_Mons".to_string();

        assert_eq!(
            snapshot.local_time_at(Utc::now()),
            parse_provider_datetime("2024-01-15 20:05").unwrap()
        );
    }

    #[test]
    fn test_astronomy_serializes_display_times() {
        let raw: ForecastApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let astronomy = WeatherSnapshot::from(raw).astronomy.unwrap();
        let json = serde_json::to_value(&astronomy).unwrap();

        assert_eq!(json["sunset"], "1:05 PM");
        assert_eq!(json["sunrise"], "11:02 AM");
        assert!(json["moonrise"].is_null());
        assert_eq!(json["moonIllumination"], 21.0);
    }
}
