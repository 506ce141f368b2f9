//! SGP4 propagation and TEME → geodetic conversion.

use chrono::{DateTime, Utc};
use std::f64::consts::{PI, TAU};
use thiserror::Error;

use super::models::{SatellitePosition, TleRecord};

/// WGS-84 equatorial radius, km
const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
/// WGS-84 polar radius, km
const EARTH_POLAR_RADIUS_KM: f64 = 6356.7523142;
const GEODETIC_ITERATIONS: usize = 20;

const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;
const J2000_JULIAN_DATE: f64 = 2_451_545.0;

#[derive(Error, Debug)]
pub enum PropagationError {
    #[error("Invalid element set for {name}: {reason}")]
    InvalidElements { name: String, reason: String },

    #[error("Propagation failed for {name}: {reason}")]
    Propagation { name: String, reason: String },
}

/// Turns an element set into a position at an instant
pub trait Propagator: Send + Sync {
    fn propagate(
        &self,
        record: &TleRecord,
        at: DateTime<Utc>,
    ) -> Result<SatellitePosition, PropagationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(
        &self,
        record: &TleRecord,
        at: DateTime<Utc>,
    ) -> Result<SatellitePosition, PropagationError> {
        let invalid = |reason: String| PropagationError::InvalidElements {
            name: record.name.clone(),
            reason,
        };

        let elements = sgp4::Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| invalid(format!("{e:?}")))?;

        let constants =
            sgp4::Constants::from_elements(&elements).map_err(|e| invalid(format!("{e:?}")))?;

        let minutes = (at.naive_utc() - elements.datetime).num_milliseconds() as f64 / 60_000.0;
        let prediction = constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| PropagationError::Propagation {
                name: record.name.clone(),
                reason: format!("{e:?}"),
            })?;

        let geodetic = teme_to_geodetic(prediction.position, gmst(julian_date(at)));
        let [vx, vy, vz] = prediction.velocity;

        Ok(SatellitePosition {
            name: record.name.clone(),
            category: record.category,
            latitude: geodetic.latitude.to_degrees(),
            longitude: geodetic.longitude.to_degrees(),
            altitude_km: geodetic.height_km,
            speed_km_per_sec: (vx * vx + vy * vy + vz * vz).sqrt(),
            catalog_id: record.catalog_id().unwrap_or_default().to_string(),
        })
    }
}

/// Propagate every record, skipping those that fail
pub fn propagate_positions(
    propagator: &dyn Propagator,
    records: &[TleRecord],
    at: DateTime<Utc>,
) -> Vec<SatellitePosition> {
    let positions: Vec<SatellitePosition> = records
        .iter()
        .filter_map(|record| match propagator.propagate(record, at) {
            Ok(position) => Some(position),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping satellite");
                None
            }
        })
        .collect();

    metrics::counter!("astroview_satellites_propagated_total").increment(positions.len() as u64);
    let skipped = records.len() - positions.len();
    if skipped > 0 {
        metrics::counter!("astroview_satellites_skipped_total").increment(skipped as u64);
    }

    positions
}

fn julian_date(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JULIAN_DATE
}

/// Greenwich mean sidereal time in radians (IAU-82)
fn gmst(julian_date: f64) -> f64 {
    let t = (julian_date - J2000_JULIAN_DATE) / 36_525.0;
    let seconds = -6.2e-6 * t * t * t
        + 0.093104 * t * t
        + (876_600.0 * 3600.0 + 8_640_184.812866) * t
        + 67_310.54841;

    (seconds.to_radians() / 240.0).rem_euclid(TAU)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Geodetic {
    latitude: f64,
    longitude: f64,
    height_km: f64,
}

/// TEME position (km) to geodetic coordinates, iterating on latitude
fn teme_to_geodetic(position: [f64; 3], gmst: f64) -> Geodetic {
    let [x, y, z] = position;
    let a = EARTH_EQUATORIAL_RADIUS_KM;
    let f = (a - EARTH_POLAR_RADIUS_KM) / a;
    let e2 = 2.0 * f - f * f;
    let r = (x * x + y * y).sqrt();

    let mut longitude = y.atan2(x) - gmst;
    while longitude < -PI {
        longitude += TAU;
    }
    while longitude > PI {
        longitude -= TAU;
    }

    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (z + a * c * e2 * sin_lat).atan2(r);
    }

    Geodetic {
        latitude,
        longitude,
        height_km: r / latitude.cos() - a * c,
    }
}
