use serde::Serialize;
use utoipa::ToSchema;

/// NOAA planetary K-index, 0 (quiet) to 9 (extreme storm)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpIndexReading {
    pub kp_value: f64,
    pub time_tag: String,
    pub kp_level: KpLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum KpLevel {
    Quiet,
    Unsettled,
    Active,
    Storm,
    #[serde(rename = "Severe Storm")]
    SevereStorm,
}

impl KpLevel {
    pub fn from_kp(kp: f64) -> Self {
        if kp >= 7.0 {
            KpLevel::SevereStorm
        } else if kp >= 5.0 {
            KpLevel::Storm
        } else if kp >= 4.0 {
            KpLevel::Active
        } else if kp >= 3.0 {
            KpLevel::Unsettled
        } else {
            KpLevel::Quiet
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KpLevel::Quiet => "Quiet",
            KpLevel::Unsettled => "Unsettled",
            KpLevel::Active => "Active",
            KpLevel::Storm => "Storm",
            KpLevel::SevereStorm => "Severe Storm",
        }
    }
}

impl std::fmt::Display for KpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// NOAA G-scale wording for the current Kp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum GeomagneticStormLevel {
    None,
    Minor,
    Moderate,
    Strong,
    Severe,
    Extreme,
}

impl KpIndexReading {
    pub fn new(kp_value: f64, time_tag: impl Into<String>) -> Self {
        Self {
            kp_value,
            time_tag: time_tag.into(),
            kp_level: KpLevel::from_kp(kp_value),
        }
    }

    pub fn storm_level(&self) -> GeomagneticStormLevel {
        let kp = self.kp_value;
        if kp >= 9.0 {
            GeomagneticStormLevel::Extreme
        } else if kp >= 8.0 {
            GeomagneticStormLevel::Severe
        } else if kp >= 7.0 {
            GeomagneticStormLevel::Strong
        } else if kp >= 6.0 {
            GeomagneticStormLevel::Moderate
        } else if kp >= 5.0 {
            GeomagneticStormLevel::Minor
        } else {
            GeomagneticStormLevel::None
        }
    }

    /// Rough aurora chance in percent
    pub fn aurora_chance(&self) -> u8 {
        (self.kp_value * 12.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Kp reading plus the derived storm scale, as served by `/space-weather/kp`
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeomagneticReport {
    #[serde(flatten)]
    pub reading: KpIndexReading,
    pub storm_level: GeomagneticStormLevel,
    pub aurora_chance: u8,
}

impl From<KpIndexReading> for GeomagneticReport {
    fn from(reading: KpIndexReading) -> Self {
        Self {
            storm_level: reading.storm_level(),
            aurora_chance: reading.aurora_chance(),
            reading,
        }
    }
}

const X_CLASS_PROBABILITY: u32 = 10;
const M_CLASS_PROBABILITY: u32 = 30;
const C_CLASS_PROBABILITY: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum FlareLevel {
    Normal,
    Elevated,
    High,
}

/// Strongest flare class considered likely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum FlareClass {
    None,
    #[serde(rename = "C-class")]
    C,
    #[serde(rename = "M-class")]
    M,
    #[serde(rename = "X-class")]
    X,
}

/// Flare outlook derived from NOAA's C/M/X flare probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolarFlareActivity {
    pub has_recent_flare: bool,
    pub max_class: FlareClass,
    /// Sum of the three class probabilities
    pub flare_count: u32,
    pub level: FlareLevel,
}

impl SolarFlareActivity {
    pub fn quiet() -> Self {
        Self {
            has_recent_flare: false,
            max_class: FlareClass::None,
            flare_count: 0,
            level: FlareLevel::Normal,
        }
    }

    /// Classify C, M and X flare probabilities given in percent
    pub fn from_probabilities(c: u32, m: u32, x: u32) -> Self {
        let level = if x > X_CLASS_PROBABILITY {
            FlareLevel::High
        } else if m > M_CLASS_PROBABILITY {
            FlareLevel::Elevated
        } else {
            FlareLevel::Normal
        };

        let max_class = if x > X_CLASS_PROBABILITY {
            FlareClass::X
        } else if m > M_CLASS_PROBABILITY {
            FlareClass::M
        } else if c > C_CLASS_PROBABILITY {
            FlareClass::C
        } else {
            FlareClass::None
        };

        Self {
            has_recent_flare: level != FlareLevel::Normal,
            max_class,
            flare_count: c + m + x,
            level,
        }
    }
}
