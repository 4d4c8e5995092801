//! cert_status library: TLS certificate health checks for a list of domains
//!
//! This library connects to each domain over TLS, reads the leaf certificate it
//! presents (without verifying trust), and reports whether the certificate was
//! issued for that domain and whether it is due for renewal.
//!
//! # Example
//!
//! ```no_run
//! use cert_status::{run_check, Config, OutputMode};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     domains: vec!["example.com".to_string(), "www.example.com".to_string()],
//!     alert_days: 21,
//!     mode: OutputMode::RenewList,
//!     ..Default::default()
//! };
//!
//! let report = run_check(config).await?;
//! println!("{} of {} domains due for renewal", report.due_for_renewal, report.total_domains);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod check;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod report;
pub mod tls;

// Re-export public API
pub use check::{DomainVerdict, MatchResult, Problem, RenewalStatus};
pub use config::{Config, FailOn, LogFormat, LogLevel, OutputMode};
pub use error_handling::RunError;
pub use models::CertificateInfo;
pub use run::{evaluate_exit_code, run_check, run_check_with, CheckReport};

// Internal run module (contains the main check loop)
mod run {
    use std::io::Write;
    use std::pin::pin;
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use futures::StreamExt;
    use log::info;
    use serde::Serialize;
    use tokio_util::sync::CancellationToken;

    use crate::app::{print_final_statistics, shutdown_gracefully, spawn_interrupt_watcher};
    use crate::check::{verdict_stream, CheckSettings, DomainVerdict, MatchResult};
    use crate::config::{Config, FailOn, OutputMode, EXIT_POLICY_VIOLATION};
    use crate::domain::collect_domains;
    use crate::error_handling::{ConfigError, ProcessingStats, RunError};
    use crate::report::{
        renew_one, write_json, write_renew_line, write_table, CommandSummary, ExternalCommand,
        RenewAction, ReportSink,
    };
    use crate::tls::{CertificateSource, TlsFetcher};

    /// Totals of a completed check run.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct CheckReport {
        /// Number of domains checked (one verdict each)
        pub total_domains: usize,
        /// Verdicts without problems
        pub healthy: usize,
        /// Verdicts with at least one problem
        pub with_problems: usize,
        /// Certificates due for renewal
        pub due_for_renewal: usize,
        /// Domains for which no certificate was retrieved
        pub no_certificate: usize,
        /// Renew command invocations
        pub commands_run: usize,
        /// Renew command invocations that failed
        pub command_failures: usize,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl CheckReport {
        /// Tallies `verdicts` and the command-mode outcome.
        pub fn from_verdicts(
            verdicts: &[DomainVerdict],
            commands: CommandSummary,
            elapsed_seconds: f64,
        ) -> Self {
            let with_problems = verdicts.iter().filter(|v| v.has_problems()).count();
            Self {
                total_domains: verdicts.len(),
                healthy: verdicts.len() - with_problems,
                with_problems,
                due_for_renewal: verdicts.iter().filter(|v| v.is_due_for_renewal()).count(),
                no_certificate: verdicts
                    .iter()
                    .filter(|v| v.match_result() == MatchResult::NoCertificate)
                    .count(),
                commands_run: commands.run,
                command_failures: commands.failed,
                elapsed_seconds,
            }
        }
    }

    /// Runs a certificate check with the provided configuration.
    ///
    /// This is the main entry point for the library. It collects domains from
    /// the configured sources, fetches and evaluates every certificate
    /// concurrently, and writes the report for the configured output mode.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is invalid or no domain could be collected
    ///   ([`ConfigError`], before any connection is made)
    /// - The TLS client cannot be initialized
    /// - The report cannot be written
    /// - The run is interrupted ([`RunError::Interrupted`])
    ///
    /// Unreachable hosts and malformed certificates are not errors; they show
    /// up as problems in the report.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cert_status::{run_check, Config};
    /// use std::path::PathBuf;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config {
    ///     file: Some(PathBuf::from("domains.txt")),
    ///     output: Some(PathBuf::from("report.txt")),
    ///     ..Default::default()
    /// };
    /// let report = run_check(config).await?;
    /// println!("{} domains with problems", report.with_problems);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_check(config: Config) -> Result<CheckReport> {
        config.validate()?;

        let action: Option<Arc<dyn RenewAction>> = match config.mode {
            OutputMode::Command => {
                let command = config
                    .renew_command()
                    .and_then(ExternalCommand::parse)
                    .ok_or(ConfigError::MissingRenewCommand)?;
                info!("Renew command: {}", command.program());
                Some(Arc::new(command) as Arc<dyn RenewAction>)
            }
            _ => None,
        };

        let fetcher = TlsFetcher::new(config.port, config.timeout())
            .context("Failed to initialize TLS client")?;

        run_validated(config, Arc::new(fetcher), action).await
    }

    /// Runs a check against an arbitrary certificate source and renew action.
    ///
    /// `action` is only used in [`OutputMode::Command`], where it is required.
    ///
    /// # Errors
    ///
    /// Same as [`run_check`].
    pub async fn run_check_with(
        config: Config,
        source: Arc<dyn CertificateSource>,
        action: Option<Arc<dyn RenewAction>>,
    ) -> Result<CheckReport> {
        config.validate()?;
        run_validated(config, source, action).await
    }

    async fn run_validated(
        config: Config,
        source: Arc<dyn CertificateSource>,
        action: Option<Arc<dyn RenewAction>>,
    ) -> Result<CheckReport> {
        let domains = collect_domains(&config)?;
        let action = match (config.mode, action) {
            (OutputMode::Command, None) => return Err(ConfigError::MissingRenewCommand.into()),
            (_, action) => action,
        };

        let start_time = Instant::now();
        let stats = Arc::new(ProcessingStats::new());
        let cancel = CancellationToken::new();
        let watcher = spawn_interrupt_watcher(cancel.clone());

        let result = check_and_report(&config, domains, source, action, &stats, &cancel).await;
        shutdown_gracefully(cancel, Some(watcher)).await;
        let (verdicts, commands) = result?;

        let report = CheckReport::from_verdicts(
            &verdicts,
            commands,
            start_time.elapsed().as_secs_f64(),
        );
        print_final_statistics(&report, &stats);
        Ok(report)
    }

    async fn check_and_report(
        config: &Config,
        domains: Vec<String>,
        source: Arc<dyn CertificateSource>,
        action: Option<Arc<dyn RenewAction>>,
        stats: &Arc<ProcessingStats>,
        cancel: &CancellationToken,
    ) -> Result<(Vec<DomainVerdict>, CommandSummary)> {
        let output = match config.mode {
            OutputMode::Command => None,
            _ => config.output.as_deref(),
        };
        let mut sink = ReportSink::open(output)?;
        let color = !config.no_color && sink.is_stdout();

        let settings = CheckSettings::new(config.alert_days, config.max_concurrency);
        let mut verdicts = Vec::with_capacity(domains.len());
        let mut verdicts_in = pin!(verdict_stream(
            domains,
            source,
            settings,
            Arc::clone(stats),
            cancel.clone(),
        ));

        let mut commands = CommandSummary::default();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RunError::Interrupted.into()),
                next = verdicts_in.next() => next,
            };
            let Some(verdict) = next else {
                break;
            };

            match (config.mode, action.as_deref()) {
                (OutputMode::RenewList, _) => {
                    if write_renew_line(&mut sink, &verdict).context("Failed to write renew list")? {
                        sink.flush().context("Failed to flush renew list")?;
                    }
                }
                (OutputMode::Command, Some(action)) => {
                    if let Some(succeeded) = renew_one(action, &verdict, &mut sink, color, stats)
                        .await
                        .context("Failed to write command status")?
                    {
                        commands.record(succeeded);
                    }
                }
                _ => {}
            }
            verdicts.push(verdict);
        }

        match config.mode {
            OutputMode::Table => {
                write_table(&mut sink, &verdicts, color).context("Failed to write table")?
            }
            OutputMode::Json => write_json(&mut sink, &verdicts).context("Failed to write JSON")?,
            OutputMode::RenewList | OutputMode::Command => {}
        }
        sink.finish()?;

        Ok((verdicts, commands))
    }

    /// Process exit code for a finished run under `fail_on`.
    ///
    /// Returns 0, or 2 when the policy is violated.
    pub fn evaluate_exit_code(fail_on: FailOn, report: &CheckReport) -> i32 {
        let violated = match fail_on {
            FailOn::Never => false,
            FailOn::Problems => report.with_problems > 0 || report.command_failures > 0,
            FailOn::Due => report.due_for_renewal > 0,
        };
        if violated {
            EXIT_POLICY_VIOLATION
        } else {
            0
        }
    }

}
