//! Solar position primitives for a calendar date.
//!
//! Low-order polynomial approximations of the sun's mean longitude, mean
//! anomaly and equation of center, followed by the corrected obliquity of the
//! ecliptic to obtain apparent declination and the equation of time. The
//! result is accurate to well under a minute of time for years 1900 to 2100,
//! which is the precision prayer times are published at.
//!
//! Everything here is a pure function of the date and UTC offset. The
//! position is evaluated at local clock noon, so a single value can be shared
//! by every coordinate computed for that date and offset.

use chrono::{Datelike, NaiveDate};

use crate::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JULIAN_DAY};
use crate::utils::normalize_degrees;

/// Sun position quantities needed by the prayer time engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Apparent declination in degrees, north positive.
    pub declination: f64,
    /// Apparent minus mean solar time, in minutes.
    pub equation_of_time: f64,
    /// Julian Day the position was evaluated at.
    pub julian_day: f64,
}

/// Julian Day for a Gregorian date at the given UT hour.
///
/// Standard Meeus conversion; valid for any Gregorian date.
pub fn julian_day(date: NaiveDate, hour_ut: f64) -> f64 {
    let (mut year, mut month) = (f64::from(date.year()), f64::from(date.month()));
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }

    let a = (year / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year + 4716.0)).floor()
        + (30.6001 * (month + 1.0)).floor()
        + f64::from(date.day())
        + hour_ut / 24.0
        + b
        - 1524.5
}

/// Julian centuries elapsed since J2000.0.
pub fn julian_century(jd: f64) -> f64 {
    (jd - J2000_JULIAN_DAY) / DAYS_PER_JULIAN_CENTURY
}

fn sun_mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032))
}

fn sun_mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537))
}

fn earth_orbit_eccentricity(t: f64) -> f64 {
    0.016708634 - t * (0.000042037 + t * 0.0000001267)
}

fn sun_equation_of_center(t: f64) -> f64 {
    let m = sun_mean_anomaly(t).to_radians();
    m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289
}

// Longitude of the ascending node of the moon's orbit, for nutation terms
fn lunar_node(t: f64) -> f64 {
    125.04 - 1934.136 * t
}

fn sun_apparent_longitude(t: f64) -> f64 {
    let true_longitude = sun_mean_longitude(t) + sun_equation_of_center(t);
    true_longitude - 0.00569 - 0.00478 * lunar_node(t).to_radians().sin()
}

fn mean_obliquity(t: f64) -> f64 {
    let seconds = 21.448 - t * (46.815 + t * (0.00059 - t * 0.001813));
    23.0 + (26.0 + seconds / 60.0) / 60.0
}

fn corrected_obliquity(t: f64) -> f64 {
    mean_obliquity(t) + 0.00256 * lunar_node(t).to_radians().cos()
}

/// Apparent solar declination in degrees.
pub fn solar_declination(t: f64) -> f64 {
    let obliquity = corrected_obliquity(t).to_radians();
    let lambda = sun_apparent_longitude(t).to_radians();
    (obliquity.sin() * lambda.sin()).asin().to_degrees()
}

/// Equation of time in minutes (positive when the sundial runs ahead of the clock).
pub fn equation_of_time(t: f64) -> f64 {
    let obliquity = corrected_obliquity(t).to_radians();
    let l0 = sun_mean_longitude(t).to_radians();
    let e = earth_orbit_eccentricity(t);
    let m = sun_mean_anomaly(t).to_radians();
    let y = (obliquity / 2.0).tan().powi(2);

    let radians = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();

    // One degree of hour angle is four minutes of time
    4.0 * radians.to_degrees()
}

/// Solar position for a date, evaluated at 12:00 local clock time for the
/// given UTC offset.
pub fn solar_position(date: NaiveDate, utc_offset_hours: f64) -> SolarPosition {
    let jd = julian_day(date, 12.0 - utc_offset_hours);
    let t = julian_century(jd);
    SolarPosition {
        declination: solar_declination(t),
        equation_of_time: equation_of_time(t),
        julian_day: jd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_julian_day_reference_epochs() {
        assert_eq!(julian_day(date(2000, 1, 1), 12.0), 2_451_545.0);
        // Meeus, Astronomical Algorithms, example 7.a: 1957 October 4.81
        let jd = julian_day(date(1957, 10, 4), 0.81 * 24.0);
        assert!((jd - 2_436_116.31).abs() < 1e-6);
        // January and February count as months 13 and 14 of the prior year
        assert_eq!(julian_day(date(2024, 3, 1), 0.0) - julian_day(date(2024, 2, 28), 0.0), 2.0);
    }

    #[test]
    fn test_julian_century_at_epoch() {
        assert_eq!(julian_century(J2000_JULIAN_DAY), 0.0);
        assert!((julian_century(J2000_JULIAN_DAY + 36_525.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_declination_at_solstices_and_equinox() {
        let june = solar_position(date(2024, 6, 20), 0.0);
        assert!((june.declination - 23.44).abs() < 0.05, "{}", june.declination);

        let december = solar_position(date(2024, 12, 21), 0.0);
        assert!((december.declination + 23.44).abs() < 0.05, "{}", december.declination);

        let march = solar_position(date(2024, 3, 20), 0.0);
        assert!(march.declination.abs() < 0.4, "{}", march.declination);
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // Mid-February minimum near -14.2 minutes
        let february = solar_position(date(2024, 2, 11), 0.0);
        assert!((february.equation_of_time + 14.2).abs() < 0.5, "{}", february.equation_of_time);

        // Early-November maximum near +16.4 minutes
        let november = solar_position(date(2024, 11, 3), 0.0);
        assert!((november.equation_of_time - 16.4).abs() < 0.5, "{}", november.equation_of_time);
    }

    #[test]
    fn test_position_is_evaluated_at_local_noon() {
        let utc = solar_position(date(2024, 3, 20), 0.0);
        let auckland = solar_position(date(2024, 3, 20), 13.0);

        // Local noon at UTC+13 is 23:00 UT on the previous day
        assert!((utc.julian_day - auckland.julian_day - 13.0 / 24.0).abs() < 1e-9);
        assert!((auckland.julian_day - julian_day(date(2024, 3, 19), 23.0)).abs() < 1e-9);

        // Declination rises about 0.4° a day around the March equinox
        let drift = utc.declination - auckland.declination;
        assert!((0.18..0.25).contains(&drift), "drift {}", drift);
        assert!(auckland.declination < 0.0);
    }

    #[test]
    fn test_solar_position_supported_range_is_finite() {
        for year in [1900, 1950, 2000, 2050, 2100] {
            let position = solar_position(date(year, 7, 1), 0.0);
            assert!(position.declination.is_finite());
            assert!(position.equation_of_time.abs() < 17.0);
        }
    }
}
