//! Application constants and default values for salatr.
//!
//! This module contains the astronomical constants used by the engine,
//! the configuration defaults, and the validation limits applied to user input.

// ═══ Astronomical Constants ═══

pub const J2000_JULIAN_DAY: f64 = 2_451_545.0; // 2000-01-01 12:00 TT
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
pub const DEGREES_PER_HOUR: f64 = 15.0; // Earth rotation rate used for hour angles

// Sun's upper limb on the horizon: 34' refraction + 16' semi-diameter
pub const SUNRISE_DEPRESSION_DEGREES: f64 = 0.833;

// ═══ Input Validation Limits ═══
// Ranges the solar approximation is accurate for, and valid clock offsets

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

pub const MINIMUM_SUPPORTED_YEAR: i32 = 1900;
pub const MAXIMUM_SUPPORTED_YEAR: i32 = 2100;

pub const MINIMUM_UTC_OFFSET_MINUTES: i32 = -720; // UTC-12:00
pub const MAXIMUM_UTC_OFFSET_MINUTES: i32 = 840; // UTC+14:00

pub const MAXIMUM_ADJUSTMENT_MINUTES: f64 = 60.0; // per-prayer manual adjustment bound
pub const MAXIMUM_TWILIGHT_ANGLE: f64 = 30.0; // custom fajr/isha angles
pub const MAXIMUM_ISHA_INTERVAL_MINUTES: f64 = 180.0;

// ═══ High-Latitude Fallback ═══

pub const ONE_SEVENTH: f64 = 1.0 / 7.0;
pub const MIDNIGHT_FRACTION: f64 = 0.5;
pub const ANGLE_BASED_DIVISOR: f64 = 60.0; // portion = angle / 60 of the night

// Polar circle resolution search limits
pub const POLAR_DAY_SEARCH_LIMIT: i64 = 183; // days searched on either side
pub const POLAR_LATITUDE_STEP: f64 = 0.5; // degrees toward the equator per step
pub const POLAR_SAFE_LATITUDE: f64 = 65.0; // never step below this latitude
pub const MARGINAL_NOON_ALTITUDE: f64 = 2.0; // below this a misordered day is treated as polar

// ═══ Application Configuration Defaults ═══

pub const DEFAULT_METHOD: &str = "umm_al_qura"; // Umm Al-Qura University, Makkah
pub const DEFAULT_TIMEZONE: &str = "Asia/Dubai"; // Gulf Standard Time
pub const CONFIG_FILE_NAME: &str = "salatr.toml";
pub const CONFIG_DIR_NAME: &str = "salatr";

// Example locations written to a freshly created config file
pub const DEFAULT_LOCATIONS: &[(u32, &str, f64, f64)] = &[
    (1, "Abu Dhabi", 24.4539, 54.3773),
    (2, "Dubai", 25.2048, 55.2708),
    (3, "Sharjah", 25.3463, 55.4209),
    (4, "Ajman", 25.4052, 55.5136),
    (5, "Umm Al Quwain", 25.5653, 55.5553),
    (6, "Ras Al Khaimah", 25.7895, 55.9432),
    (7, "Fujairah", 25.1288, 56.3265),
    (8, "Al Ain", 24.2075, 55.7447),
    (9, "Khor Fakkan", 25.3313, 56.3417),
    (10, "Dibba Al-Fujairah", 25.5922, 56.2617),
    (11, "Kalba", 25.0755, 56.3550),
    (12, "Dhaid", 25.2881, 55.8817),
    (13, "Masafi", 25.3157, 56.1667),
    (14, "Hatta", 24.8000, 56.1167),
    (15, "Liwa Oasis", 23.1333, 53.7833),
];

// ═══ Output Formats ═══

pub const CLOCK_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
