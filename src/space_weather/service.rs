use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::models::{KpIndexReading, SolarFlareActivity};
use crate::error::HttpError;
use crate::impl_into_response;

const PLANETARY_K_INDEX_PATH: &str = "/products/noaa-planetary-k-index.json";
const SOLAR_EVENT_PROBABILITIES_PATH: &str = "/products/solar-event-probabilities.json";

#[derive(Error, Debug)]
pub enum SpaceWeatherError {
    #[error("Failed to fetch space weather data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("NOAA returned HTTP {0}")]
    ApiError(u16),

    #[error("No Kp readings in NOAA response")]
    NoReadings,
}

impl HttpError for SpaceWeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError(_) | Self::ApiError(_) => StatusCode::BAD_GATEWAY,
            Self::NoReadings => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::ApiError(_) => Some("API_ERROR"),
            Self::NoReadings => Some("KP_UNAVAILABLE"),
        }
    }
}

impl_into_response!(SpaceWeatherError);

pub struct SpaceWeatherService {
    client: Client,
    base_url: String,
}

impl SpaceWeatherService {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Latest planetary Kp index from NOAA SWPC
    pub async fn get_kp_index(&self) -> Result<KpIndexReading, SpaceWeatherError> {
        let rows = self.fetch_rows(PLANETARY_K_INDEX_PATH).await?;
        let reading = latest_reading(&rows).ok_or(SpaceWeatherError::NoReadings)?;

        tracing::debug!(kp = reading.kp_value, level = %reading.kp_level, "Fetched Kp index");
        Ok(reading)
    }

    /// Flare outlook from NOAA event probabilities; quiet when NOAA is unavailable
    pub async fn get_solar_flare_activity(&self) -> SolarFlareActivity {
        match self.fetch_rows(SOLAR_EVENT_PROBABILITIES_PATH).await {
            Ok(rows) => flare_activity(&rows).unwrap_or_else(|| {
                tracing::debug!("No solar event forecast rows, reporting quiet sun");
                SolarFlareActivity::quiet()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Solar flare probabilities unavailable, reporting quiet sun");
                metrics::counter!("astroview_flare_unavailable_total").increment(1);
                SolarFlareActivity::quiet()
            }
        }
    }

    async fn fetch_rows(&self, path: &str) -> Result<Vec<Value>, SpaceWeatherError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SpaceWeatherError::ApiError(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Classify the first forecast row of the solar event probability table.
///
/// Array tables lead with a header row; object tables start with data.
fn flare_activity(rows: &[Value]) -> Option<SolarFlareActivity> {
    let row = match rows.first()? {
        Value::Array(_) => rows.get(1)?,
        first => first,
    };

    let (c, m, x) = match row {
        Value::Array(cells) => (cells.get(1), cells.get(2), cells.get(3)),
        Value::Object(fields) => (
            fields.get("c_class_1_day"),
            fields.get("m_class_1_day"),
            fields.get("x_class_1_day"),
        ),
        _ => return None,
    };

    Some(SolarFlareActivity::from_probabilities(
        probability(c),
        probability(m),
        probability(x),
    ))
}

/// Whole-percent probability; missing or unreadable cells count as 0
fn probability(cell: Option<&Value>) -> u32 {
    let value = match cell {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    value.map_or(0, |v| v.trunc().clamp(0.0, 100.0) as u32)
}

/// Most recent readable row of the NOAA table.
///
/// The product has been served both as an array of arrays with a header row
/// (`["time_tag","Kp",...]`, values as strings) and as an array of objects.
fn latest_reading(rows: &[Value]) -> Option<KpIndexReading> {
    rows.iter().rev().find_map(parse_row)
}

fn parse_row(row: &Value) -> Option<KpIndexReading> {
    let (time_tag, kp) = match row {
        Value::Array(cells) => (cells.first()?, cells.get(1)?),
        Value::Object(fields) => (
            fields.get("time_tag")?,
            fields.get("Kp").or_else(|| fields.get("kp_index"))?,
        ),
        _ => return None,
    };

    let kp = match kp {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };

    Some(KpIndexReading::new(kp, time_tag.as_str()?))
}
