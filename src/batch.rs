//! Batch and formatting adapter.
//!
//! Runs the engine over a list of locations for one date and renders each
//! instant as a zero-padded `HH:MM` local clock string. Seconds are truncated,
//! never rounded. Failures stay with the entry they belong to; the output has
//! the same order as the input.

use chrono::{DateTime, FixedOffset};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::CLOCK_FORMAT;
use crate::error::PrayerError;
use crate::geo::solar::solar_position;
use crate::geo::{CalculationDate, GeoCoordinate};
use crate::methods::{CalculationParameters, lookup_method};
use crate::prayer::{PrayerTimeSet, calculate, calculate_with_position};

/// A single calculation request as received from an outer layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub utc_offset_minutes: i32,
    pub method: String,
}

/// The five prayers as local `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedPrayerTimes {
    pub fajr: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl From<&PrayerTimeSet> for FormattedPrayerTimes {
    fn from(times: &PrayerTimeSet) -> Self {
        Self {
            fajr: format_clock(&times.fajr),
            dhuhr: format_clock(&times.dhuhr),
            asr: format_clock(&times.asr),
            maghrib: format_clock(&times.maghrib),
            isha: format_clock(&times.isha),
        }
    }
}

/// Render an instant as `HH:MM` in its own offset, truncating seconds.
pub fn format_clock(time: &DateTime<FixedOffset>) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Validate a request and compute its formatted prayer times.
///
/// Coordinate, date and method are all checked before any solar computation.
pub fn compute_prayer_times(request: &PrayerRequest) -> Result<FormattedPrayerTimes, PrayerError> {
    let coordinate = GeoCoordinate::new(request.latitude, request.longitude)?;
    let date = CalculationDate::new(
        request.year,
        request.month,
        request.day,
        request.utc_offset_minutes,
    )?;
    let params = lookup_method(&request.method)?;

    let times = calculate(&coordinate, &date, &params)?;
    Ok(FormattedPrayerTimes::from(&times))
}

/// A named coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub coordinate: GeoCoordinate,
}

/// Result of the engine for one location of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub id: u32,
    pub name: String,
    pub result: Result<PrayerTimeSet, PrayerError>,
}

impl BatchEntry {
    pub fn formatted(&self) -> Option<FormattedPrayerTimes> {
        self.result.as_ref().ok().map(FormattedPrayerTimes::from)
    }
}

// {"id", "name", "times": {...}, "approximated"} or {"id", "name", "error"}
impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchEntry", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        match &self.result {
            Ok(times) => {
                state.serialize_field("times", &FormattedPrayerTimes::from(times))?;
                state.serialize_field("approximated", &times.is_approximated())?;
            }
            Err(error) => {
                state.serialize_field("error", &error.to_string())?;
            }
        }
        state.end()
    }
}

/// Compute every location for one date and method.
///
/// The solar position is derived once for the date and offset and shared by
/// all entries.
pub fn compute_batch(
    locations: &[Location],
    date: &CalculationDate,
    params: &CalculationParameters,
) -> Vec<BatchEntry> {
    let position = solar_position(date.date(), date.utc_offset_hours());

    locations
        .iter()
        .map(|location| BatchEntry {
            id: location.id,
            name: location.name.clone(),
            result: calculate_with_position(&location.coordinate, date, params, &position),
        })
        .collect()
}
