//! Configuration system for salatr with validation and timezone resolution.
//!
//! The configuration lives in `salatr.toml` under the XDG config directory
//! (`$XDG_CONFIG_HOME/salatr/salatr.toml`). A commented default file is
//! written on first run.
//!
//! ## Configuration Structure
//!
//! ```toml
//! method = "umm_al_qura"                 # Calculation method
//! asr = "standard"                       # "standard" or "hanafi"
//! high_latitude_rule = "midnight_fraction"
//! polar_circle_resolution = "nearest_day"
//! timezone = "Asia/Dubai"                # IANA name, or set utc_offset_minutes
//!
//! [adjustments]                          # Minutes added to each prayer
//! dhuhr = 2
//!
//! [[locations]]
//! id = 2
//! name = "Dubai"
//! latitude = 25.2048
//! longitude = 55.2708
//! ```
//!
//! ## Custom angles
//!
//! `fajr_angle` replaces the method's Fajr angle. Isha is replaced by either
//! `isha_angle` or `isha_interval` (minutes after Maghrib), never both.
//!
//! ## Clock offsets
//!
//! Reported times use, in order of preference: `utc_offset_minutes`, the
//! offset of `timezone` on the requested date, or the timezone detected from
//! each location's coordinates.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::Location;
use crate::constants::*;
use crate::geo::GeoCoordinate;
use crate::geo::timezone::{
    determine_timezone_from_coordinates, parse_timezone, utc_offset_minutes_on,
};
use crate::logger::Log;
use crate::methods::{
    AsrShadowFactor, CalculationParameters, HighLatitudeRule, IshaRule, PolarCircleResolution,
    PrayerAdjustments, lookup_method,
};

/// A named place prayer times are computed for.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LocationConfig {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationConfig {
    pub fn to_location(&self) -> Result<Location> {
        let coordinate = GeoCoordinate::new(self.latitude, self.longitude)
            .with_context(|| format!("Invalid coordinates for location '{}'", self.name))?;
        Ok(Location {
            id: self.id,
            name: self.name.clone(),
            coordinate,
        })
    }
}

/// Configuration loaded from `salatr.toml`.
///
/// Optional fields fall back to the selected method's own values.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Calculation method name, matched like `lookup_method`.
    pub method: Option<String>,
    pub asr: Option<AsrShadowFactor>,
    pub high_latitude_rule: Option<HighLatitudeRule>,
    pub polar_circle_resolution: Option<PolarCircleResolution>,
    pub fajr_angle: Option<f64>,    // degrees below the horizon
    pub isha_angle: Option<f64>,    // degrees below the horizon
    pub isha_interval: Option<f64>, // minutes after Maghrib
    pub timezone: Option<String>,
    pub utc_offset_minutes: Option<i32>,
    #[serde(default)]
    pub adjustments: PrayerAdjustments,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Write a commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let mut builder = ConfigBuilder::new()
            .add_section("Salatr configuration")
            .add_setting(
                "method",
                &format!("\"{}\"", DEFAULT_METHOD),
                "Calculation method (see 'salatr --list-methods')",
            )
            .add_setting(
                "asr",
                &format!("\"{}\"", AsrShadowFactor::Standard.as_str()),
                "Asr shadow factor: \"standard\" or \"hanafi\"",
            )
            .add_setting(
                "high_latitude_rule",
                &format!("\"{}\"", HighLatitudeRule::MidnightFraction.as_str()),
                "\"none\", \"midnight_fraction\", \"one_seventh\" or \"angle_based\"",
            )
            .add_setting(
                "polar_circle_resolution",
                &format!("\"{}\"", PolarCircleResolution::NearestDay.as_str()),
                "\"unresolved\", \"nearest_day\" or \"nearest_latitude\"",
            )
            .add_setting(
                "timezone",
                &format!("\"{}\"", DEFAULT_TIMEZONE),
                "IANA timezone for reported clock times",
            )
            .add_section("Minutes added to each computed time")
            .add_table("adjustments");

        for prayer in ["fajr", "sunrise", "dhuhr", "asr", "maghrib", "isha"] {
            builder = builder.add_setting(prayer, "0", &format!("{} adjustment", prayer));
        }

        builder = builder.add_section("Locations");
        for (id, name, latitude, longitude) in DEFAULT_LOCATIONS {
            builder = builder
                .add_table_array("locations")
                .add_setting("id", &id.to_string(), "Stable identifier")
                .add_setting("name", &format!("\"{}\"", name), "Display name")
                .add_setting("latitude", &format!("{:.4}", latitude), "Degrees north")
                .add_setting("longitude", &format!("{:.4}", longitude), "Degrees east");
        }

        fs::write(path, builder.build()).context("Failed to write default config file")?;
        Ok(())
    }

    fn apply_defaults(config: &mut Config) {
        if config.method.is_none() {
            config.method = Some(DEFAULT_METHOD.to_string());
        }
        // No timezone default: without one the zone is detected per location
    }

    /// Load and validate a config file. Does not create one if missing.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::apply_defaults(&mut config);
        validate_config(&config)?;

        Ok(config)
    }

    /// Load the config from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
            Log::log_indented(&format!(
                "Created default configuration at {}",
                crate::utils::path_for_display(&config_path)
            ));
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Calculation parameters for the configured method (or `method_override`)
    /// with every config override applied.
    pub fn calculation_parameters(
        &self,
        method_override: Option<&str>,
    ) -> Result<CalculationParameters> {
        let name = method_override
            .or(self.method.as_deref())
            .unwrap_or(DEFAULT_METHOD);
        let mut params = lookup_method(name)?;

        if let Some(angle) = self.fajr_angle {
            params.fajr_angle = angle;
        }
        if let Some(angle) = self.isha_angle {
            params.isha = IshaRule::Angle(angle);
        }
        if let Some(minutes) = self.isha_interval {
            params.isha = IshaRule::Interval(minutes);
        }
        if let Some(asr) = self.asr {
            params = params.with_asr_shadow(asr);
        }
        if let Some(rule) = self.high_latitude_rule {
            params = params.with_high_latitude_rule(rule);
        }
        if let Some(resolution) = self.polar_circle_resolution {
            params = params.with_polar_circle_resolution(resolution);
        }

        Ok(params.with_extra_adjustments(&self.adjustments))
    }

    /// UTC offset in minutes used to report times for `location` on `date`.
    pub fn utc_offset_for(&self, location: &LocationConfig, date: NaiveDate) -> Result<i32> {
        if let Some(minutes) = self.utc_offset_minutes {
            return Ok(minutes);
        }

        let tz = match self.timezone.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => determine_timezone_from_coordinates(location.latitude, location.longitude),
        };
        Ok(utc_offset_minutes_on(&tz, date))
    }

    /// Case-insensitive lookup by name, or by numeric id.
    pub fn find_location(&self, query: &str) -> Option<&LocationConfig> {
        let query = query.trim();
        self.locations.iter().find(|location| {
            location.name.eq_ignore_ascii_case(query) || location.id.to_string() == query
        })
    }

    pub fn location_names(&self) -> Vec<&str> {
        self.locations
            .iter()
            .map(|location| location.name.as_str())
            .collect()
    }

    pub fn log_config(&self, path: &Path) {
        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            crate::utils::path_for_display(path)
        ));
        Log::log_indented(&format!(
            "Method: {}",
            self.method.as_deref().unwrap_or(DEFAULT_METHOD)
        ));
        if let Some(asr) = self.asr {
            Log::log_indented(&format!("Asr: {}", asr.as_str()));
        }
        if let Some(rule) = self.high_latitude_rule {
            Log::log_indented(&format!("High-latitude rule: {}", rule.as_str()));
        }
        if let Some(resolution) = self.polar_circle_resolution {
            Log::log_indented(&format!(
                "Polar circle resolution: {}",
                resolution.as_str()
            ));
        }
        match (self.utc_offset_minutes, self.timezone.as_deref()) {
            (Some(minutes), _) => Log::log_indented(&format!(
                "UTC offset: {}",
                crate::utils::format_utc_offset(minutes)
            )),
            (None, Some(tz)) => Log::log_indented(&format!("Timezone: {}", tz)),
            (None, None) => Log::log_indented("Timezone: detected per location"),
        }
        Log::log_indented(&format!("Locations: {}", self.locations.len()));
    }
}

/// Reject configurations the engine cannot compute with.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(method) = config.method.as_deref() {
        lookup_method(method)
            .context("Invalid method in config. Run 'salatr --list-methods' for valid names")?;
    }

    if let Some(minutes) = config.utc_offset_minutes {
        if !(MINIMUM_UTC_OFFSET_MINUTES..=MAXIMUM_UTC_OFFSET_MINUTES).contains(&minutes) {
            anyhow::bail!(
                "utc_offset_minutes must be between {} and {} (got {})",
                MINIMUM_UTC_OFFSET_MINUTES,
                MAXIMUM_UTC_OFFSET_MINUTES,
                minutes
            );
        }
    }

    if let Some(tz) = config.timezone.as_deref() {
        parse_timezone(tz)?;
    }

    for (key, angle) in [("fajr_angle", config.fajr_angle), ("isha_angle", config.isha_angle)] {
        if let Some(angle) = angle {
            if !(angle > 0.0 && angle <= MAXIMUM_TWILIGHT_ANGLE) {
                anyhow::bail!(
                    "{} must be greater than 0 and at most {} degrees (got {})",
                    key,
                    MAXIMUM_TWILIGHT_ANGLE,
                    angle
                );
            }
        }
    }

    if config.isha_angle.is_some() && config.isha_interval.is_some() {
        anyhow::bail!("Set either isha_angle or isha_interval, not both");
    }

    if let Some(minutes) = config.isha_interval {
        if !(minutes > 0.0 && minutes <= MAXIMUM_ISHA_INTERVAL_MINUTES) {
            anyhow::bail!(
                "isha_interval must be greater than 0 and at most {} minutes (got {})",
                MAXIMUM_ISHA_INTERVAL_MINUTES,
                minutes
            );
        }
    }

    let adjustments = &config.adjustments;
    for (prayer, minutes) in [
        ("fajr", adjustments.fajr),
        ("sunrise", adjustments.sunrise),
        ("dhuhr", adjustments.dhuhr),
        ("asr", adjustments.asr),
        ("maghrib", adjustments.maghrib),
        ("isha", adjustments.isha),
    ] {
        if !(-MAXIMUM_ADJUSTMENT_MINUTES..=MAXIMUM_ADJUSTMENT_MINUTES).contains(&minutes) {
            anyhow::bail!(
                "Adjustment for {} must be within ±{} minutes (got {})",
                prayer,
                MAXIMUM_ADJUSTMENT_MINUTES,
                minutes
            );
        }
    }

    if config.locations.is_empty() {
        anyhow::bail!("No locations configured. Add at least one [[locations]] entry");
    }

    let mut seen_ids = HashSet::new();
    for location in &config.locations {
        if location.name.trim().is_empty() {
            anyhow::bail!("Location {} has an empty name", location.id);
        }
        if !seen_ids.insert(location.id) {
            anyhow::bail!("Duplicate location id {}", location.id);
        }
        location.to_location()?;
    }

    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comments of all settings line up on one column regardless of the
/// constants that produce the values.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Table(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_table(mut self, name: &str) -> Self {
        self.entries.push(ConfigEntry::Table(format!("[{}]", name)));
        self
    }

    fn add_table_array(mut self, name: &str) -> Self {
        self.entries.push(ConfigEntry::Table(format!("[[{}]]", name)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // one space between setting and comment

        let mut result = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !result.is_empty() {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Table(header) => result.push(header),
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
