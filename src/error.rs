//! Error conditions reported by the prayer time engine.
//!
//! Every failure is scoped to a single coordinate/date pair. Input errors
//! (`InvalidCoordinate`, `InvalidDate`, `UnknownCalculationMethod`) are raised
//! before any solar computation takes place.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::prayer::Prayer;

/// Errors returned by the calculation engine.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PrayerError {
    /// Latitude or longitude outside the valid range (or not finite).
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// Calendar date malformed, outside 1900..=2100, or UTC offset out of range.
    InvalidDate(String),
    /// Method name not present in the registry.
    UnknownCalculationMethod(String),
    /// The sun never reaches the altitude needed for this instant and the
    /// method is configured to leave such instants unresolved.
    SolarAngleUnreachable { prayer: Prayer },
    /// The computed instants are not in canonical order.
    DegenerateOrdering(String),
}

impl Display for PrayerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(
                f,
                "invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]"
            ),
            Self::InvalidDate(msg) => write!(f, "invalid date: {msg}"),
            Self::UnknownCalculationMethod(name) => {
                write!(f, "unknown calculation method: '{name}'")
            }
            Self::SolarAngleUnreachable { prayer } => write!(
                f,
                "sun never reaches the required altitude for {prayer} and no high-latitude rule is configured"
            ),
            Self::DegenerateOrdering(msg) => write!(f, "degenerate prayer ordering: {msg}"),
        }
    }
}

impl Error for PrayerError {}
