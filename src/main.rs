use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use salatr::args::{CliAction, ParsedArgs, RunOptions, display_help, display_version_info};
use salatr::batch::{BatchEntry, compute_batch, format_clock};
use salatr::config::{Config, LocationConfig};
use salatr::constants::*;
use salatr::geo::CalculationDate;
use salatr::geo::solar::solar_position;
use salatr::logger::Log;
use salatr::methods::{CalculationParameters, IshaRule, all_methods};
use salatr::prayer::Prayer;
use salatr::utils::{format_coordinates, format_utc_offset};

/// JSON document printed by `--json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    date: String,
    method: &'a str,
    locations: &'a [BatchEntry],
}

fn main() -> Result<()> {
    let parsed = ParsedArgs::from_env();

    match parsed.action {
        CliAction::ShowVersion => {
            display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::ListMethods { json } => list_methods(json),
        CliAction::Run(options) => run(options),
    }
}

fn list_methods(json: bool) -> Result<()> {
    let methods = all_methods();

    if json {
        let output =
            serde_json::to_string_pretty(&methods).context("Failed to serialize methods")?;
        println!("{}", output);
        return Ok(());
    }

    Log::log_version();
    Log::log_decorated("Calculation methods:");
    for params in &methods {
        Log::log_indented(&format!(
            "{:<24} {} ({})",
            params.name,
            params.description,
            describe_angles(params)
        ));
    }
    Log::log_end();
    Ok(())
}

fn describe_angles(params: &CalculationParameters) -> String {
    let isha = match params.isha {
        IshaRule::Angle(angle) => format!("isha {}°", angle),
        IshaRule::Interval(minutes) => format!("isha maghrib + {} min", minutes),
    };
    format!("fajr {}°, {}", params.fajr_angle, isha)
}

fn run(options: RunOptions) -> Result<()> {
    if options.json {
        Log::set_enabled(false);
    }
    Log::log_version();

    let (config, config_path) = load_config(options.config_path.as_ref())?;
    config.log_config(&config_path);

    let params = config.calculation_parameters(options.method.as_deref())?;
    let date = options.date.unwrap_or_else(|| Local::now().date_naive());

    let selected: Vec<&LocationConfig> = match options.city.as_deref() {
        Some(query) => match config.find_location(query) {
            Some(location) => vec![location],
            None => {
                Log::log_pipe();
                Log::log_error(&format!("Unknown city: {}", query));
                Log::log_indented(&format!(
                    "Available: {}",
                    config.location_names().join(", ")
                ));
                Log::log_end();
                std::process::exit(EXIT_FAILURE);
            }
        },
        None => config.locations.iter().collect(),
    };

    Log::log_block_start(&format!(
        "Prayer times for {} ({})",
        date.format(DATE_FORMAT),
        params.description
    ));

    if options.debug_enabled {
        log_debug_details(&params);
    }

    let entries = compute_entries(&config, &selected, date, &params, options.debug_enabled)?;

    if options.json {
        let report = JsonReport {
            date: date.format(DATE_FORMAT).to_string(),
            method: params.name,
            locations: &entries,
        };
        let output = serde_json::to_string_pretty(&report).context("Failed to serialize results")?;
        println!("{}", output);
    } else {
        for (entry, location) in entries.iter().zip(&selected) {
            log_entry(entry, location);
        }
        Log::log_end();
    }

    if entries.iter().any(|entry| entry.result.is_err()) {
        std::process::exit(EXIT_FAILURE);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<(Config, PathBuf)> {
    match path {
        Some(path) => Ok((Config::load_from_path(path)?, path.clone())),
        None => Ok((Config::load()?, Config::get_config_path()?)),
    }
}

// Locations are grouped by UTC offset so each group shares one batch call.
// The returned entries follow the order of `locations`.
fn compute_entries(
    config: &Config,
    locations: &[&LocationConfig],
    date: NaiveDate,
    params: &CalculationParameters,
    debug_enabled: bool,
) -> Result<Vec<BatchEntry>> {
    let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (index, location) in locations.iter().enumerate() {
        let offset = config
            .utc_offset_for(location, date)
            .with_context(|| format!("Failed to resolve UTC offset for {}", location.name))?;
        groups.entry(offset).or_default().push(index);
    }

    let mut slots: Vec<Option<BatchEntry>> = vec![None; locations.len()];
    for (offset, indices) in groups {
        let calculation_date = CalculationDate::from_naive(date, offset)?;
        if debug_enabled {
            log_solar_position(&calculation_date);
        }
        let batch = indices
            .iter()
            .map(|&index| locations[index].to_location())
            .collect::<Result<Vec<_>>>()?;

        for (index, entry) in indices
            .into_iter()
            .zip(compute_batch(&batch, &calculation_date, params))
        {
            slots[index] = Some(entry);
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

fn log_solar_position(date: &CalculationDate) {
    let position = solar_position(date.date(), date.utc_offset_hours());
    Log::log_debug(&format!(
        "UTC{}: solar declination {:.4}°, equation of time {:+.2} min",
        format_utc_offset(date.utc_offset_minutes()),
        position.declination,
        position.equation_of_time
    ));
}

fn log_debug_details(params: &CalculationParameters) {
    Log::log_pipe();
    Log::log_debug(&format!("Method: {} ({})", params.name, describe_angles(params)));
    Log::log_debug(&format!(
        "Asr: {}, high-latitude rule: {}, polar circle: {}",
        params.asr_shadow.as_str(),
        params.high_latitude_rule.as_str(),
        params.polar_circle_resolution.as_str()
    ));
}

fn log_entry(entry: &BatchEntry, location: &LocationConfig) {
    Log::log_block_start(&format!(
        "{} ({})",
        entry.name,
        format_coordinates(location.latitude, location.longitude)
    ));

    match &entry.result {
        Ok(times) => {
            Log::log_indented(&format!(
                "UTC offset: {}",
                format_utc_offset(times.fajr.offset().local_minus_utc() / 60)
            ));
            for prayer in Prayer::ALL {
                Log::log_prayer(
                    &capitalize(prayer.as_str()),
                    &format_clock(&times.time(prayer)),
                    times.high_latitude_fallbacks.contains(&prayer),
                );
            }
            if times.polar_resolution_applied {
                Log::log_warning("Sun barely rises or sets on this date; times are approximated");
            }
            if !times.high_latitude_fallbacks.is_empty() {
                Log::log_warning("* estimated by the high-latitude rule");
            }
        }
        Err(e) => Log::log_error(&format!("Could not compute prayer times: {}", e)),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
