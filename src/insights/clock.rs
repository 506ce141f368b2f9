use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serializer;

use crate::weather::models::AstronomyInfo;

/// Used when the provider sends a sunset we cannot read ("assume evening").
pub fn fallback_sunset() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn fallback_sunrise() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse a provider clock string such as "7:42 PM" or "07:42 am".
///
/// Returns `None` for anything that isn't `h:mm` followed by AM/PM,
/// including the provider's "No moonrise" placeholders.
pub fn parse_clock_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    let split = input.len().checked_sub(2)?;
    let (clock, period) = (input.get(..split)?, input.get(split..)?);
    let (hours, minutes) = clock.trim_end().split_once(':')?;

    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if !(1..=12).contains(&hours) {
        return None;
    }

    let hours = match period.to_ascii_uppercase().as_str() {
        "AM" if hours == 12 => 0,
        "AM" => hours,
        "PM" if hours == 12 => 12,
        "PM" => hours + 12,
        _ => return None,
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Format a local time the way the dashboard shows it ("9:00 PM").
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Serde adapter so structured times only become strings on the way out.
pub fn serialize_clock_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_clock_time(*time))
}

pub fn serialize_optional_clock_time<S: Serializer>(
    time: &Option<NaiveTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => serializer.serialize_some(&format_clock_time(*t)),
        None => serializer.serialize_none(),
    }
}

/// The sunset that opened the night `now` belongs to.
///
/// Before today's sunrise we are still in the night that began at
/// yesterday's sunset; otherwise the relevant sunset is today's.
pub fn night_start(now: NaiveDateTime, astronomy: &AstronomyInfo) -> NaiveDateTime {
    let today_sunset = now.date().and_time(astronomy.sunset);
    if now.time() < astronomy.sunrise {
        today_sunset - Duration::days(1)
    } else {
        today_sunset
    }
}

/// The sunrise that closes the night opened at `night_start`.
pub fn night_end(night_start: NaiveDateTime, astronomy: &AstronomyInfo) -> NaiveDateTime {
    (night_start.date() + Duration::days(1)).and_time(astronomy.sunrise)
}

pub fn is_after_sunset(now: NaiveDateTime, astronomy: &AstronomyInfo) -> bool {
    now >= night_start(now, astronomy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn astronomy(sunrise: (u32, u32), sunset: (u32, u32)) -> AstronomyInfo {
        AstronomyInfo {
            sunrise: NaiveTime::from_hms_opt(sunrise.0, sunrise.1, 0).unwrap(),
            sunset: NaiveTime::from_hms_opt(sunset.0, sunset.1, 0).unwrap(),
            moonrise: None,
            moonset: None,
            moon_phase: "Waxing Crescent".to_string(),
            moon_illumination: 12.0,
        }
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_clock_time_pm() {
        assert_eq!(
            parse_clock_time("7:42 PM"),
            NaiveTime::from_hms_opt(19, 42, 0)
        );
        assert_eq!(
            parse_clock_time("07:05 pm"),
            NaiveTime::from_hms_opt(19, 5, 0)
        );
    }

    #[test]
    fn test_parse_clock_time_noon_and_midnight() {
        assert_eq!(parse_clock_time("12:15 PM"), NaiveTime::from_hms_opt(12, 15, 0));
        assert_eq!(parse_clock_time("12:15 AM"), NaiveTime::from_hms_opt(0, 15, 0));
    }

    #[test]
    fn test_parse_clock_time_without_space() {
        assert_eq!(parse_clock_time("6:01AM"), NaiveTime::from_hms_opt(6, 1, 0));
    }

    #[test]
    fn test_parse_clock_time_rejects_garbage() {
        assert_eq!(parse_clock_time("No moonrise"), None);
        assert_eq!(parse_clock_time(""), None);
        assert_eq!(parse_clock_time("19:42"), None);
        assert_eq!(parse_clock_time("13:00 PM"), None);
        assert_eq!(parse_clock_time("7:61 PM"), None);
    }

    #[test]
    fn test_format_clock_time() {
        assert_eq!(format_clock_time(NaiveTime::from_hms_opt(21, 0, 0).unwrap()), "9:00 PM");
        assert_eq!(format_clock_time(NaiveTime::from_hms_opt(0, 30, 0).unwrap()), "12:30 AM");
    }

    #[test]
    fn test_after_sunset_same_evening() {
        let astro = astronomy((6, 10), (19, 45));
        assert!(!is_after_sunset(at(1, 19, 44), &astro));
        assert!(is_after_sunset(at(1, 19, 45), &astro));
        assert!(is_after_sunset(at(1, 23, 30), &astro));
    }

    #[test]
    fn test_after_sunset_wraps_past_midnight() {
        let astro = astronomy((6, 10), (19, 45));
        let now = at(2, 1, 30);
        assert!(is_after_sunset(now, &astro));
        assert_eq!(night_start(now, &astro), at(1, 19, 45));
    }

    #[test]
    fn test_night_ends_at_next_sunrise() {
        let astro = astronomy((6, 10), (19, 45));
        assert_eq!(night_end(at(1, 19, 45), &astro), at(2, 6, 10));

        let start = night_start(at(2, 1, 30), &astro);
        assert_eq!(night_end(start, &astro), at(2, 6, 10));
    }

    #[test]
    fn test_daytime_is_not_after_sunset() {
        let astro = astronomy((6, 10), (19, 45));
        assert!(!is_after_sunset(at(1, 6, 10), &astro));
        assert!(!is_after_sunset(at(1, 13, 0), &astro));
    }
}
