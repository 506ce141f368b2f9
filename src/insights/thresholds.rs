//! Fixed thresholds of the alert and impact ladders.
//!
//! Comparisons in the engines are written against these names so a
//! threshold can be tuned here without touching control flow.

// ============================================================================
// Space weather (Kp index)
// ============================================================================

/// Kp at which storm-level alerts and the aurora rule start
pub const KP_STORM: f64 = 5.0;
/// Kp at which space-weather alerts turn critical
pub const KP_SEVERE_STORM: f64 = 7.0;
/// Kp considered unsettled for the solar impact chain
pub const KP_UNSETTLED: f64 = 3.0;
/// |latitude| above which a storm-level Kp makes aurora likely
pub const AURORA_MIN_ABS_LATITUDE: f64 = 55.0;

// ============================================================================
// Alerts
// ============================================================================

/// Cloud cover (%) below which the ISS is worth looking for
pub const ISS_MAX_CLOUD_COVER: f64 = 30.0;

/// Hourly slots examined for flood risk
pub const FLOOD_LOOKAHEAD_HOURS: usize = 12;
/// Rain chance (%) that counts an hour as heavy rain
pub const FLOOD_HEAVY_RAIN_CHANCE: f64 = 70.0;
pub const FLOOD_WARNING_HOURS: usize = 3;
pub const FLOOD_CRITICAL_HOURS: usize = 6;

pub const HEAT_ADVISORY_C: f64 = 35.0;
pub const HEATWAVE_C: f64 = 40.0;
pub const HEATWAVE_CRITICAL_C: f64 = 45.0;

pub const STORM_WIND_KPH: f64 = 60.0;
pub const STORM_CRITICAL_WIND_KPH: f64 = 90.0;

// ============================================================================
// Impact chains
// ============================================================================

pub const CLIMATE_HIGH_TEMP_C: f64 = 38.0;
pub const CLIMATE_HIGH_UV: f64 = 8.0;
pub const CLIMATE_MODERATE_TEMP_C: f64 = 32.0;
pub const CLIMATE_MODERATE_UV: f64 = 6.0;

/// Total forecast precipitation (mm) that waterlogs soil
pub const AGRICULTURE_EXCESS_RAIN_MM: f64 = 50.0;
pub const AGRICULTURE_DROUGHT_RAIN_MM: f64 = 2.0;
pub const AGRICULTURE_DROUGHT_HUMIDITY: f64 = 30.0;

pub const DISASTER_FLOOD_RAIN_MM: f64 = 40.0;
pub const DISASTER_FLOOD_CRITICAL_RAIN_MM: f64 = 80.0;
pub const DISASTER_STORM_WIND_KPH: f64 = 60.0;
pub const DISASTER_STORM_CRITICAL_WIND_KPH: f64 = 90.0;
pub const DISASTER_EXTREME_HEAT_C: f64 = 45.0;

// ============================================================================
// Viewing window
// ============================================================================

/// Eligible evening hours scanned for a window
pub const WINDOW_LOOKAHEAD_HOURS: usize = 12;
pub const WINDOW_MAX_HOURS: usize = 6;
/// An hour scoring below this cannot open a window
pub const WINDOW_START_MIN_SCORE: u32 = 40;
/// An hour scoring below this ends a window
pub const WINDOW_CONTINUE_MIN_SCORE: u32 = 35;
/// Best average below this means no window tonight
pub const WINDOW_ACCEPTABLE_SCORE: f64 = 30.0;
pub const RAIN_CHANCE_CUTOFF: f64 = 30.0;

/// Moon illumination (%) bands shared by scoring and the reason text
pub const MOON_DIM_ILLUMINATION: f64 = 30.0;
pub const MOON_BRIGHT_ILLUMINATION: f64 = 70.0;
