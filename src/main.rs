//! formgate entry point.
//!
//! ## CLI Subcommands
//!
//! - `formgate check BODY [--content-type CT]` - Run the filter on a body
//! - `formgate catalog show [--json]` - Allowed values per category
//! - `formgate catalog verify FILE` - Check a switch record file
//! - `formgate config show|validate` - Inspect configuration

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use formgate::cli::{catalog_cmd, check_cmd, config_cmd, EXIT_CONFIG};
use formgate::config::{self as gate_config, GateConfig};
use formgate::telemetry::{describe_metrics, init_logging};

fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = take_option(&mut args, "--config").map(PathBuf::from);
    let command = args.first().map(|s| s.as_str()).unwrap_or("help");

    match command {
        "help" | "--help" | "-h" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "version" | "--version" | "-V" => {
            println!("formgate {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Err(e) = init_logging(&config.log) {
        eprintln!("Logging disabled: {}", e);
    }
    describe_metrics();

    let code = match command {
        "check" => {
            let content_type = take_option(&mut args, "--content-type");
            match args.get(1) {
                Some(body) => check_cmd::run_check(&config, body, content_type.as_deref()),
                None => {
                    eprintln!("Usage: formgate check BODY [--content-type CT]");
                    EXIT_CONFIG
                }
            }
        }
        "catalog" => {
            let json = take_flag(&mut args, "--json");
            let subcommand = args.get(1).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => catalog_cmd::run_show(&config, json),
                "verify" => match args.get(2) {
                    Some(file) => catalog_cmd::run_verify(Path::new(file)),
                    None => {
                        eprintln!("Usage: formgate catalog verify FILE");
                        EXIT_CONFIG
                    }
                },
                _ => {
                    eprintln!("Unknown catalog subcommand: {}", subcommand);
                    EXIT_CONFIG
                }
            }
        }
        "config" => {
            let subcommand = args.get(1).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show(&config);
                    0
                }
                "validate" => config_cmd::run_validate(&config),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    EXIT_CONFIG
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            EXIT_CONFIG
        }
    };

    ExitCode::from(code as u8)
}

fn load_config(path: Option<&Path>) -> Result<GateConfig, ExitCode> {
    match path {
        Some(path) => gate_config::load_with_file(path).map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_CONFIG as u8)
        }),
        None => Ok(gate_config::load()),
    }
}

/// Remove `--name VALUE` from `args`, returning the value.
fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    args.remove(pos);
    if pos < args.len() {
        Some(args.remove(pos))
    } else {
        None
    }
}

/// Remove `--name` from `args`, returning whether it was present.
fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|a| a == name) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "formgate v{}

USAGE:
    formgate [--config FILE] COMMAND [OPTIONS]

COMMANDS:
    check BODY [--content-type CT]   Run the filter on a request body
    catalog show [--json]            Allowed values per category
    catalog verify FILE              Check that a switch record file loads
    config show                      Print the effective configuration
    config validate                  Warn about settings that will fail
    version                          Show version information
    help                             Show this help message

ENVIRONMENT:
    FORMGATE_BLOCKLIST_PATH        Comma-separated blocklist file
    FORMGATE_CATALOG_PATH          Switch record file seeding the catalog
    FORMGATE_ERROR_PAGE_PATH       Body of rejection responses
    FORMGATE_MAX_BODY_BYTES        Largest form body buffered (default 2097152)
    FORMGATE_BLOCKLIST_CACHE_SECS  Blocklist cache TTL (default 0, re-read per request)
    FORMGATE_LOG_LEVEL             Log filter (default info)
    FORMGATE_LOG_FORMAT            json or pretty (default json)

EXIT CODES:
    0  Success / accepted
    1  Rejected / validation warnings
    2  Configuration or I/O error
",
        version
    );
}
