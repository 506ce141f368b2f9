use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use super::clock;
use super::thresholds::{
    MOON_BRIGHT_ILLUMINATION, MOON_DIM_ILLUMINATION, RAIN_CHANCE_CUTOFF, WINDOW_ACCEPTABLE_SCORE,
    WINDOW_CONTINUE_MIN_SCORE, WINDOW_LOOKAHEAD_HOURS, WINDOW_MAX_HOURS, WINDOW_START_MIN_SCORE,
};
use crate::weather::models::{AstronomyInfo, HourlyForecastSlot};

const INSUFFICIENT_DATA: &str = "Insufficient data";
const NO_EVENING_HOURS: &str = "No evening hours in forecast window";
const POOR_CONDITIONS: &str = "Poor conditions expected. High cloud cover or rain predicted.";

/// Best stretch of tonight's forecast for naked-eye observing
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewingWindow {
    /// Display time of the first hour ("9:00 PM"); empty when not found
    pub start_time: String,
    /// Display time the last hour ends; empty when not found
    pub end_time: String,
    pub quality_score: u8,
    pub reason: String,
    pub found: bool,
}

impl ViewingWindow {
    fn not_found(quality_score: u8, reason: &str) -> Self {
        Self {
            start_time: String::new(),
            end_time: String::new(),
            quality_score,
            reason: reason.to_string(),
            found: false,
        }
    }
}

/// Contiguous run of scored hours
#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    start: usize,
    len: usize,
    average: f64,
}

fn moon_score(moon_illumination: f64) -> f64 {
    if moon_illumination < MOON_DIM_ILLUMINATION {
        100.0
    } else if moon_illumination < MOON_BRIGHT_ILLUMINATION {
        60.0
    } else {
        30.0
    }
}

/// Observing score for a single hour, 0-100
pub fn hour_score(slot: &HourlyForecastSlot, moon_illumination: f64) -> u32 {
    let cloud = (100.0 - slot.cloud_cover_percent * 1.2).max(0.0);
    let rain = if slot.rain_chance_percent > RAIN_CHANCE_CUTOFF {
        0.0
    } else {
        100.0 - slot.rain_chance_percent
    };
    let visibility = (slot.visibility_km / 10.0 * 100.0).min(100.0);

    let total = cloud * 0.40 + rain * 0.25 + visibility * 0.20 + moon_score(moon_illumination) * 0.15;
    total.round().max(0.0) as u32
}

/// Highest-average run of up to `WINDOW_MAX_HOURS` hours.
///
/// Seeded with the first hour on its own. Runs may only start on an hour
/// scoring at least `WINDOW_START_MIN_SCORE` and stop at the first hour below
/// `WINDOW_CONTINUE_MIN_SCORE`; equal averages prefer the longer run.
fn best_run(scores: &[u32]) -> Run {
    let mut best = Run {
        start: 0,
        len: 1,
        average: scores.first().copied().unwrap_or(0) as f64,
    };

    for start in 0..scores.len() {
        if scores[start] < WINDOW_START_MIN_SCORE {
            continue;
        }

        let run: Vec<u32> = scores[start..]
            .iter()
            .take(WINDOW_MAX_HOURS)
            .take_while(|&&s| s >= WINDOW_CONTINUE_MIN_SCORE)
            .copied()
            .collect();
        if run.is_empty() {
            continue;
        }

        let average = run.iter().sum::<u32>() as f64 / run.len() as f64;
        if average > best.average || (average == best.average && run.len() > best.len) {
            best = Run {
                start,
                len: run.len(),
                average,
            };
        }
    }

    best
}

fn describe(window: &[&HourlyForecastSlot], moon_illumination: f64) -> String {
    let average_cloud = (window.iter().map(|h| h.cloud_cover_percent).sum::<f64>()
        / window.len() as f64)
        .round();

    let sky = if average_cloud < 15.0 {
        "Clear skies"
    } else if average_cloud < 30.0 {
        "Low cloud cover"
    } else {
        "Acceptable cloud cover"
    };

    let moon = if moon_illumination < MOON_DIM_ILLUMINATION {
        "minimal moon interference"
    } else if moon_illumination < MOON_BRIGHT_ILLUMINATION {
        "moderate moon brightness"
    } else {
        "bright moonlight"
    };

    [sky.to_string(), moon.to_string(), format!("{}h window", window.len())].join(" · ")
}

/// Future hours between the sunset at `night_start` and the following sunrise
fn night_hours<'a>(
    hourly: &'a [HourlyForecastSlot],
    astronomy: &AstronomyInfo,
    night_start: NaiveDateTime,
    now: NaiveDateTime,
) -> Vec<&'a HourlyForecastSlot> {
    let night_end = clock::night_end(night_start, astronomy);

    hourly
        .iter()
        .filter(|h| h.timestamp > now && h.timestamp >= night_start && h.timestamp < night_end)
        .take(WINDOW_LOOKAHEAD_HOURS)
        .collect()
}

/// Find the best contiguous stargazing window in the hours after sunset.
///
/// `now` is the location's local wall-clock time; hourly slots are expected
/// in the same local time and in chronological order.
pub fn compute_best_viewing_window(
    hourly: &[HourlyForecastSlot],
    astronomy: Option<&AstronomyInfo>,
    moon_illumination: f64,
    now: NaiveDateTime,
) -> ViewingWindow {
    let Some(astronomy) = astronomy else {
        return ViewingWindow::not_found(0, INSUFFICIENT_DATA);
    };
    if hourly.is_empty() {
        return ViewingWindow::not_found(0, INSUFFICIENT_DATA);
    }

    // Once the current night has no forecast hours left, look at the next one.
    let current_night = clock::night_start(now, astronomy);
    let mut eligible = night_hours(hourly, astronomy, current_night, now);
    if eligible.is_empty() {
        eligible = night_hours(hourly, astronomy, current_night + Duration::days(1), now);
    }

    if eligible.is_empty() {
        return ViewingWindow::not_found(0, NO_EVENING_HOURS);
    }

    let scores: Vec<u32> = eligible
        .iter()
        .map(|h| hour_score(h, moon_illumination))
        .collect();
    let best = best_run(&scores);
    let quality_score = best.average.round().clamp(0.0, 100.0) as u8;

    tracing::debug!(
        eligible_hours = eligible.len(),
        start = best.start,
        len = best.len,
        average = best.average,
        "Scored viewing window"
    );

    if best.average < WINDOW_ACCEPTABLE_SCORE {
        return ViewingWindow::not_found(quality_score, POOR_CONDITIONS);
    }

    let end = (best.start + best.len).min(eligible.len());
    let window = &eligible[best.start..end];
    let first = window[0].timestamp;
    let last = window[window.len() - 1].timestamp;

    ViewingWindow {
        start_time: clock::format_clock_time(first.time()),
        end_time: clock::format_clock_time((last + Duration::hours(1)).time()),
        quality_score,
        reason: describe(window, moon_illumination),
        found: true,
    }
}
