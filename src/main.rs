//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cert_status` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use cert_status::config::{EXIT_INTERRUPTED, EXIT_POLICY_VIOLATION};
use cert_status::error_handling::ConfigError;
use cert_status::initialization::init_logger_with;
use cert_status::{evaluate_exit_code, run_check, Config, RunError};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), then try next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    if config.no_color {
        colored::control::set_override(false);
    }

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let fail_on = config.fail_on;
    match run_check(config).await {
        Ok(report) => {
            let code = evaluate_exit_code(fail_on, &report);
            if code == EXIT_POLICY_VIOLATION {
                log::warn!("Exit policy {fail_on:?} violated");
            }
            process::exit(code);
        }
        Err(e) if e.downcast_ref::<RunError>().is_some() => {
            eprintln!("cert_status: interrupted, no report written");
            process::exit(EXIT_INTERRUPTED);
        }
        Err(e) if e.downcast_ref::<ConfigError>().is_some() => {
            eprintln!("cert_status: configuration error: {e:#}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("cert_status error: {e:#}");
            process::exit(1);
        }
    }
}
