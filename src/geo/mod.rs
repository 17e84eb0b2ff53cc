//! Geographic inputs and solar astronomy.
//!
//! This module provides:
//! - Validated coordinate and date value types
//! - Solar position primitives (Julian Day, declination, equation of time)
//! - The hour-angle solver that turns a solar altitude into a clock offset
//! - Timezone resolution for reporting local clock times

pub mod hour_angle;
pub mod solar;
pub mod timezone;

use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::constants::*;
use crate::error::PrayerError;

/// A validated position on Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting values outside [-90, 90] x [-180, 180].
    ///
    /// Non-finite values are rejected as well.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PrayerError> {
        let valid = (MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude)
            && (MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude);
        if !valid {
            return Err(PrayerError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Same longitude, different latitude. Used by polar circle resolution.
    pub(crate) fn with_latitude(&self, latitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(MINIMUM_LATITUDE, MAXIMUM_LATITUDE),
            longitude: self.longitude,
        }
    }
}

/// A Gregorian calendar date plus the UTC offset used to report local clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalculationDate {
    date: NaiveDate,
    utc_offset_minutes: i32,
    offset: FixedOffset,
}

impl CalculationDate {
    /// Build from calendar components, validating the date and offset.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        utc_offset_minutes: i32,
    ) -> Result<Self, PrayerError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            PrayerError::InvalidDate(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
        })?;
        Self::from_naive(date, utc_offset_minutes)
    }

    /// Build from an existing chrono date.
    pub fn from_naive(date: NaiveDate, utc_offset_minutes: i32) -> Result<Self, PrayerError> {
        if !(MINIMUM_SUPPORTED_YEAR..=MAXIMUM_SUPPORTED_YEAR).contains(&date.year()) {
            return Err(PrayerError::InvalidDate(format!(
                "year {} is outside the supported range {}..={}",
                date.year(),
                MINIMUM_SUPPORTED_YEAR,
                MAXIMUM_SUPPORTED_YEAR
            )));
        }
        if !(MINIMUM_UTC_OFFSET_MINUTES..=MAXIMUM_UTC_OFFSET_MINUTES).contains(&utc_offset_minutes)
        {
            return Err(PrayerError::InvalidDate(format!(
                "UTC offset {} minutes is outside {}..={}",
                utc_offset_minutes, MINIMUM_UTC_OFFSET_MINUTES, MAXIMUM_UTC_OFFSET_MINUTES
            )));
        }
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            PrayerError::InvalidDate(format!("UTC offset {utc_offset_minutes} minutes is not representable"))
        })?;
        Ok(Self {
            date,
            utc_offset_minutes,
            offset,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    /// UTC offset in hours, e.g. 4.0 for Gulf Standard Time.
    pub fn utc_offset_hours(&self) -> f64 {
        f64::from(self.utc_offset_minutes) / 60.0
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}
