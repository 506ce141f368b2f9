//! Cause → atmospheric effect → earth impact → human relevance chains.
//!
//! Each chain is picked from a fixed ladder of tiers; the first tier whose
//! condition holds wins. Missing weather falls back to mild defaults so every
//! chain is always populated.

use serde::Serialize;
use utoipa::ToSchema;

use super::thresholds::{
    AGRICULTURE_DROUGHT_HUMIDITY, AGRICULTURE_DROUGHT_RAIN_MM, AGRICULTURE_EXCESS_RAIN_MM,
    CLIMATE_HIGH_TEMP_C, CLIMATE_HIGH_UV, CLIMATE_MODERATE_TEMP_C, CLIMATE_MODERATE_UV,
    DISASTER_EXTREME_HEAT_C, DISASTER_FLOOD_CRITICAL_RAIN_MM, DISASTER_FLOOD_RAIN_MM,
    DISASTER_STORM_CRITICAL_WIND_KPH, DISASTER_STORM_WIND_KPH, KP_SEVERE_STORM, KP_STORM,
    KP_UNSETTLED,
};
use crate::space_weather::KpIndexReading;
use crate::weather::models::{CurrentWeather, ForecastDay};

const DEFAULT_TEMP_C: f64 = 25.0;
const DEFAULT_UV: f64 = 3.0;
const DEFAULT_CLOUD: f64 = 50.0;
const DEFAULT_HUMIDITY: f64 = 50.0;

const CLIMATE: &str = "Climate Monitoring";
const AGRICULTURE: &str = "Agriculture Impact";
const DISASTER: &str = "Disaster Awareness";
const SOLAR: &str = "Solar Impact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImpactSeverity {
    Low,
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpactChain {
    pub category: String,
    pub icon: String,
    pub cause: String,
    pub atmospheric_effect: String,
    pub earth_impact: String,
    pub human_relevance: String,
    pub severity: ImpactSeverity,
}

impl ImpactChain {
    fn new(
        category: &str,
        icon: &str,
        severity: ImpactSeverity,
        cause: impl Into<String>,
        atmospheric_effect: impl Into<String>,
        earth_impact: impl Into<String>,
        human_relevance: impl Into<String>,
    ) -> Self {
        Self {
            category: category.to_string(),
            icon: icon.to_string(),
            cause: cause.into(),
            atmospheric_effect: atmospheric_effect.into(),
            earth_impact: earth_impact.into(),
            human_relevance: human_relevance.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAnalysis {
    pub climate_impact: ImpactChain,
    pub agriculture_impact: ImpactChain,
    pub disaster_impact: ImpactChain,
    pub solar_impact: ImpactChain,
}

impl ImpactAnalysis {
    pub fn chains(&self) -> [&ImpactChain; 4] {
        [
            &self.climate_impact,
            &self.agriculture_impact,
            &self.disaster_impact,
            &self.solar_impact,
        ]
    }

    /// Most severe of the four chains
    pub fn highest_severity(&self) -> ImpactSeverity {
        self.chains()
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(ImpactSeverity::Low)
    }
}

pub fn analyze_impacts(
    weather: Option<&CurrentWeather>,
    forecast: &[ForecastDay],
    kp_index: Option<&KpIndexReading>,
) -> ImpactAnalysis {
    let analysis = ImpactAnalysis {
        climate_impact: analyze_climate(weather, forecast),
        agriculture_impact: analyze_agriculture(weather, forecast),
        disaster_impact: analyze_disaster(weather, forecast),
        solar_impact: analyze_solar(kp_index),
    };

    tracing::debug!(
        climate = ?analysis.climate_impact.severity,
        agriculture = ?analysis.agriculture_impact.severity,
        disaster = ?analysis.disaster_impact.severity,
        solar = ?analysis.solar_impact.severity,
        "Analyzed impacts"
    );

    analysis
}

fn analyze_climate(weather: Option<&CurrentWeather>, forecast: &[ForecastDay]) -> ImpactChain {
    let temp = weather.map_or(DEFAULT_TEMP_C, |w| w.temperature_c);
    let uv = weather.map_or(DEFAULT_UV, |w| w.uv_index);
    let cloud = weather.map_or(DEFAULT_CLOUD, |w| w.cloud_cover_percent);

    if temp > CLIMATE_HIGH_TEMP_C && uv > CLIMATE_HIGH_UV {
        return ImpactChain::new(
            CLIMATE,
            "🌡️",
            ImpactSeverity::High,
            "Satellite-detected atmospheric warming trend",
            "Elevated regional temperature and UV radiation levels",
            "Increased evaporation, heat stress on ecosystems",
            "Potential strain on water supply and agricultural productivity. UV risk for outdoor workers.",
        );
    }

    if temp > CLIMATE_MODERATE_TEMP_C || uv > CLIMATE_MODERATE_UV {
        return ImpactChain::new(
            CLIMATE,
            "🌡️",
            ImpactSeverity::Moderate,
            "Above-average temperature and UV index detected via satellite monitoring",
            "Rising regional temperature levels",
            "Increased evaporation and moderate heat stress",
            "Stay hydrated. Limit prolonged sun exposure during peak hours.",
        );
    }

    let trend = if forecast.is_empty() {
        temp
    } else {
        forecast.iter().map(|d| d.max_temp_c).sum::<f64>() / forecast.len() as f64
    };

    ImpactChain::new(
        CLIMATE,
        "🌡️",
        ImpactSeverity::Low,
        "Satellite weather monitoring: normal conditions",
        format!("Temperature trending at {trend:.1}°C with {cloud}% cloud cover"),
        "Stable atmospheric conditions observed",
        "No climate-related concerns at this time. Conditions within seasonal norms.",
    )
}

fn analyze_agriculture(weather: Option<&CurrentWeather>, forecast: &[ForecastDay]) -> ImpactChain {
    // fold from +0.0 so an empty forecast never prints as "-0.0mm"
    let total_rain = forecast.iter().map(|d| d.total_precip_mm).fold(0.0, |a, b| a + b);
    let humidity = weather.map_or(DEFAULT_HUMIDITY, |w| w.humidity);

    if total_rain > AGRICULTURE_EXCESS_RAIN_MM {
        return ImpactChain::new(
            AGRICULTURE,
            "🌾",
            ImpactSeverity::High,
            "Satellite-based precipitation monitoring: excess rainfall detected",
            format!(
                "{total_rain:.1}mm total precipitation predicted over {} days",
                forecast.len()
            ),
            "Soil moisture saturation risk, potential waterlogging",
            "Crop yield risk from excess water. Irrigation and drainage planning adjustments required.",
        );
    }

    if total_rain < AGRICULTURE_DROUGHT_RAIN_MM && humidity < AGRICULTURE_DROUGHT_HUMIDITY {
        return ImpactChain::new(
            AGRICULTURE,
            "🌾",
            ImpactSeverity::Moderate,
            "Satellite monitoring: drought conditions emerging",
            format!(
                "Minimal rainfall predicted ({total_rain:.1}mm), low humidity at {humidity}%"
            ),
            "Soil moisture deficit, dry conditions",
            "Irrigation planning critical. Crop stress likely without intervention.",
        );
    }

    let rain_chance = if forecast.is_empty() {
        0.0
    } else {
        forecast.iter().map(|d| d.daily_chance_of_rain).sum::<f64>() / forecast.len() as f64
    };

    ImpactChain::new(
        AGRICULTURE,
        "🌾",
        ImpactSeverity::Low,
        "Satellite precipitation monitoring: normal levels",
        format!("{total_rain:.1}mm precipitation forecast with {rain_chance:.0}% rain chance"),
        "Balanced soil moisture expected",
        "Favorable agricultural conditions. No irrigation adjustments needed.",
    )
}

fn analyze_disaster(weather: Option<&CurrentWeather>, forecast: &[ForecastDay]) -> ImpactChain {
    let max_rain = forecast
        .iter()
        .map(|d| d.total_precip_mm)
        .fold(0.0_f64, f64::max);
    let max_wind = forecast
        .iter()
        .map(|d| d.max_wind_kph)
        .fold(weather.map_or(0.0, |w| w.wind_speed_kph), f64::max);
    let max_temp = forecast
        .iter()
        .map(|d| d.max_temp_c)
        .fold(weather.map_or(0.0, |w| w.temperature_c), f64::max);

    if max_rain > DISASTER_FLOOD_RAIN_MM {
        let severity = if max_rain > DISASTER_FLOOD_CRITICAL_RAIN_MM {
            ImpactSeverity::Critical
        } else {
            ImpactSeverity::High
        };
        return ImpactChain::new(
            DISASTER,
            "🌊",
            severity,
            "Satellite weather system monitoring: heavy precipitation system detected",
            format!("Intense rainfall up to {max_rain:.0}mm predicted"),
            "Urban flooding risk, river level rise",
            "Transportation disruption likely. Avoid low-lying areas. Monitor local emergency channels.",
        );
    }

    if max_wind > DISASTER_STORM_WIND_KPH {
        let severity = if max_wind > DISASTER_STORM_CRITICAL_WIND_KPH {
            ImpactSeverity::Critical
        } else {
            ImpactSeverity::High
        };
        return ImpactChain::new(
            DISASTER,
            "🌀",
            severity,
            "Satellite weather monitoring: high wind system approaching",
            format!("Wind gusts up to {} km/h expected", max_wind.round()),
            "Structural damage risk, power outage potential",
            "Secure outdoor items. Avoid travel during peak winds. Monitor weather advisories.",
        );
    }

    if max_temp > DISASTER_EXTREME_HEAT_C {
        return ImpactChain::new(
            DISASTER,
            "🔥",
            ImpactSeverity::Critical,
            "Satellite thermal monitoring: extreme heat event",
            format!("Temperatures reaching {max_temp:.0}°C"),
            "Heat stress on infrastructure and ecosystems",
            "Public safety concern. Limit outdoor activity. Check on vulnerable neighbors.",
        );
    }

    ImpactChain::new(
        DISASTER,
        "✅",
        ImpactSeverity::Low,
        "Satellite weather system monitoring: stable conditions",
        "No extreme weather patterns detected",
        "Low risk environment",
        "No disaster-level threats detected. Standard safety precautions apply.",
    )
}

fn analyze_solar(kp_index: Option<&KpIndexReading>) -> ImpactChain {
    let kp = kp_index.map_or(0.0, |k| k.kp_value);

    if kp >= KP_SEVERE_STORM {
        ImpactChain::new(
            SOLAR,
            "☀️",
            ImpactSeverity::Critical,
            "Elevated solar flare activity: geomagnetic storm in progress",
            "Severe geomagnetic disturbance",
            "Magnetosphere fluctuation, ionospheric disruption",
            "GPS accuracy degraded. HF radio communication disruption. Possible power grid instability.",
        )
    } else if kp >= KP_STORM {
        ImpactChain::new(
            SOLAR,
            "☀️",
            ImpactSeverity::Moderate,
            "Moderate solar activity: geomagnetic storming detected",
            "Moderate geomagnetic disturbance",
            "Magnetosphere fluctuation",
            "Possible GPS and communication instability. Aurora visible at high latitudes.",
        )
    } else if kp >= KP_UNSETTLED {
        ImpactChain::new(
            SOLAR,
            "☀️",
            ImpactSeverity::Low,
            "Unsettled solar conditions: minor geomagnetic activity",
            "Minor geomagnetic fluctuations",
            "Slight magnetosphere perturbation",
            "No significant impact expected. Minor HF radio propagation effects possible.",
        )
    } else {
        ImpactChain::new(
            SOLAR,
            "☀️",
            ImpactSeverity::Low,
            "Quiet solar conditions: no significant solar events",
            "Stable geomagnetic field",
            "Normal magnetosphere conditions",
            "All communication and navigation systems operating normally.",
        )
    }
}
