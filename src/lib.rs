//! # Salatr
//!
//! Daily Islamic prayer times computed from solar position astronomy.
//!
//! Given a coordinate, a Gregorian date with a UTC offset, and a named
//! calculation method, salatr derives Fajr, sunrise, Dhuhr, Asr, Maghrib and
//! Isha as local clock times. All calculation is pure and synchronous.
//!
//! ## Architecture
//!
//! - **geo**: Coordinates and dates, solar position, hour-angle solver, timezones
//! - **methods**: Registry of calculation conventions and their parameters
//! - **prayer**: The engine that orders and assembles the daily times
//! - **batch**: Multi-location computation and `HH:MM` formatting
//! - **error**: Typed engine errors
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Astronomical constants, defaults and limits
//! - **args**: Command-line parsing for the `salatr` binary
//! - **logger**: Structured logging with visual formatting
//! - **utils**: Angle wrapping and display helpers

pub mod args;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod logger;
pub mod methods;
pub mod prayer;
pub mod utils;

// Re-export important types for easier access
pub use batch::{
    BatchEntry, FormattedPrayerTimes, Location, PrayerRequest, compute_batch, compute_prayer_times,
};
pub use config::Config;
pub use error::PrayerError;
pub use geo::{CalculationDate, GeoCoordinate};
pub use logger::{Log, LogLevel};
pub use methods::{CalculationMethod, CalculationParameters, lookup_method};
pub use prayer::{Prayer, PrayerTimeSet, calculate};
