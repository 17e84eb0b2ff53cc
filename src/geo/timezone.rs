//! Timezone resolution for reporting local clock times.
//!
//! The engine only needs a fixed UTC offset per date. This module derives one
//! from an IANA timezone name, or detects the timezone from coordinates using
//! the tzf-rs boundary data.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

/// Parse an IANA timezone name such as `Asia/Dubai`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", name, e))
}

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Falls back to the `TZ` environment variable, then UTC, for points the
/// boundary data does not cover (open ocean).
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude)
    let tz_name = finder.get_tz_name(longitude, latitude);

    match tz_name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => match std::env::var("TZ") {
            Ok(tz_str) => tz_str.parse().unwrap_or(Tz::UTC),
            Err(_) => Tz::UTC,
        },
    }
}

/// UTC offset in minutes that `tz` observes on `date`.
///
/// Evaluated at 12:00 UTC, away from the usual 02:00 local DST switch.
pub fn utc_offset_minutes_on(tz: &Tz, date: NaiveDate) -> i32 {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    tz.offset_from_utc_datetime(&noon).fix().local_minus_utc() / 60
}
