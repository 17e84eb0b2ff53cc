//! Convert a target solar altitude into a time offset from solar noon.
//!
//! Solves the spherical-astronomy relation
//!
//! ```text
//! cos(H) = (sin(altitude) - sin(lat)·sin(dec)) / (cos(lat)·cos(dec))
//! ```
//!
//! for the hour angle `H`, which is converted to hours at 15° per hour.
//! Callers subtract the result from solar noon for morning events and add it
//! for evening events.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::constants::DEGREES_PER_HOUR;

/// The sun never reaches the requested altitude on this date at this latitude.
///
/// Raised during polar day and polar night. The engine recovers from it with
/// the method's high-latitude policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarAngleUnreachable {
    /// The right-hand side of the hour-angle equation that fell outside [-1, 1].
    pub cos_hour_angle: f64,
}

impl Display for SolarAngleUnreachable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "solar altitude unreachable (cos H = {:.4})",
            self.cos_hour_angle
        )
    }
}

impl Error for SolarAngleUnreachable {}

/// Hours between solar noon and the moment the sun is `depression` degrees
/// below the horizon.
///
/// A negative `depression` targets an altitude above the horizon.
pub fn hour_angle_time(
    latitude: f64,
    declination: f64,
    depression: f64,
) -> Result<f64, SolarAngleUnreachable> {
    let altitude = -depression;
    hour_angle_for_altitude(latitude, declination, altitude)
}

/// Hours after solar noon at which an object's shadow equals `shadow_factor`
/// times its height plus its noon shadow.
pub fn asr_hour_angle(
    latitude: f64,
    declination: f64,
    shadow_factor: f64,
) -> Result<f64, SolarAngleUnreachable> {
    let altitude = asr_altitude(latitude, declination, shadow_factor);
    hour_angle_for_altitude(latitude, declination, altitude)
}

/// Solar altitude in degrees that marks Asr for the given shadow factor.
pub fn asr_altitude(latitude: f64, declination: f64, shadow_factor: f64) -> f64 {
    let noon_shadow = (latitude - declination).abs().to_radians().tan();
    (1.0 / (shadow_factor + noon_shadow)).atan().to_degrees()
}

fn hour_angle_for_altitude(
    latitude: f64,
    declination: f64,
    altitude: f64,
) -> Result<f64, SolarAngleUnreachable> {
    let (lat, dec) = (latitude.to_radians(), declination.to_radians());
    let cos_h = (altitude.to_radians().sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());

    // Non-finite at the poles where cos(lat) vanishes
    if !cos_h.is_finite() || !(-1.0..=1.0).contains(&cos_h) {
        return Err(SolarAngleUnreachable {
            cos_hour_angle: cos_h,
        });
    }

    Ok(cos_h.acos().to_degrees() / DEGREES_PER_HOUR)
}
