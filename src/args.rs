//! Command-line argument parsing and processing.
//!
//! Arguments are parsed by hand into a `CliAction`. Options that take a
//! value (`--date`, `--city`, `--method`, `--config`) consume the following
//! argument. Unknown options or malformed values show the help text.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::constants::DATE_FORMAT;
use crate::logger::Log;

/// Settings for a normal run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub debug_enabled: bool,
    /// Print JSON instead of the decorated log output.
    pub json: bool,
    /// Defaults to today when absent.
    pub date: Option<NaiveDate>,
    /// Only this configured location (name or id).
    pub city: Option<String>,
    /// Overrides the configured method.
    pub method: Option<String>,
    pub config_path: Option<PathBuf>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute prayer times with these settings
    Run(RunOptions),
    /// Print the calculation method registry and exit
    ListMethods { json: bool },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments, program name first
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = RunOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut list_methods = false;
        let mut unknown_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--json" | "-j" => options.json = true,
                "--list-methods" | "-l" => list_methods = true,
                "--date" | "--city" | "--method" | "--config" | "-D" | "-c" | "-m" => {
                    let Some(value) = args_vec.get(i + 1) else {
                        Log::log_warning(&format!("Missing value for {}", arg_str));
                        unknown_arg_found = true;
                        i += 1;
                        continue;
                    };

                    match arg_str {
                        "--date" | "-D" => match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                            Ok(date) => options.date = Some(date),
                            Err(_) => {
                                Log::log_warning(&format!(
                                    "Invalid date '{}'. Use YYYY-MM-DD",
                                    value
                                ));
                                unknown_arg_found = true;
                            }
                        },
                        "--city" | "-c" => options.city = Some(value.clone()),
                        "--method" | "-m" => options.method = Some(value.clone()),
                        _ => options.config_path = Some(PathBuf::from(value)),
                    }
                    i += 1; // Skip the consumed value
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                    } else {
                        Log::log_warning(&format!("Unexpected argument: {}", arg_str));
                    }
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if list_methods {
            CliAction::ListMethods { json: options.json }
        } else {
            CliAction::Run(options)
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: salatr [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-c, --city <NAME|ID>      Only compute this configured location");
    Log::log_indented("    --config <PATH>       Use this config file instead of the default");
    Log::log_indented("-D, --date <YYYY-MM-DD>   Date to compute (default: today)");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-j, --json                Print results as JSON");
    Log::log_indented("-l, --list-methods        List calculation methods");
    Log::log_indented("-m, --method <NAME>       Override the configured calculation method");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}
