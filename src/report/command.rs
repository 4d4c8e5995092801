//! Command mode: run an external renew action once per due domain.
//!
//! Invocations are strictly sequential, in verdict order. A failing
//! invocation is reported and counted; the remaining domains still run.

use std::io::{self, Write};
use std::process::Stdio;

use colored::Colorize;
use futures::future::BoxFuture;
use log::{info, warn};
use serde::Serialize;

use crate::check::DomainVerdict;
use crate::error_handling::{CommandError, ErrorType, InfoType, ProcessingStats};

/// An action that renews the certificate of one domain.
pub trait RenewAction: Send + Sync {
    /// Renews `domain`, which is passed as the action's sole argument.
    fn renew<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<(), CommandError>>;
}

/// Outcome counts of a command-mode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    /// Invocations started
    pub run: usize,
    /// Invocations that failed to start or exited unsuccessfully
    pub failed: usize,
}

/// An external program run as `program [args...] <domain>`.
///
/// The command line is split on whitespace; no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// Parses a command line. Returns `None` if it is blank.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Executable to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Leading arguments; the domain is appended after them.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl RenewAction for ExternalCommand {
    fn renew<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            let status = tokio::process::Command::new(&self.program)
                .args(&self.args)
                .arg(domain)
                .stdin(Stdio::null())
                .status()
                .await
                .map_err(|source| CommandError::Spawn {
                    program: self.program.clone(),
                    source,
                })?;

            if status.success() {
                Ok(())
            } else {
                Err(CommandError::ExitStatus {
                    program: self.program.clone(),
                    status: status.to_string(),
                })
            }
        })
    }
}

/// Runs `action` for `verdict` if it is due for renewal and writes a status
/// line to `out`.
///
/// Returns `Ok(None)` when the domain is not due, otherwise whether the
/// action succeeded. Only a failure to write the status line is an error.
pub async fn renew_one<W: Write>(
    action: &dyn RenewAction,
    verdict: &DomainVerdict,
    out: &mut W,
    color: bool,
    stats: &ProcessingStats,
) -> io::Result<Option<bool>> {
    if !verdict.is_due_for_renewal() {
        return Ok(None);
    }

    let domain = verdict.domain();
    info!("Renewing certificate for {domain}");
    stats.increment_info(InfoType::RenewCommandRun);

    let result = action.renew(domain).await;
    let (label, detail) = match &result {
        Ok(()) => ("ok", String::new()),
        Err(e) => {
            warn!("Renew command failed for {domain}: {e}");
            stats.increment_error(ErrorType::RenewCommandFailure);
            ("failed", format!(": {e}"))
        }
    };

    let label = match (color, result.is_ok()) {
        (false, _) => label.normal(),
        (true, true) => label.green(),
        (true, false) => label.red().bold(),
    };
    writeln!(out, "renew {domain}: {label}{detail}")?;
    out.flush()?;

    Ok(Some(result.is_ok()))
}

/// Runs `action` for every due verdict, in order.
pub async fn renew_due<W: Write>(
    action: &dyn RenewAction,
    verdicts: &[DomainVerdict],
    out: &mut W,
    color: bool,
    stats: &ProcessingStats,
) -> io::Result<CommandSummary> {
    let mut summary = CommandSummary::default();
    for verdict in verdicts {
        if let Some(succeeded) = renew_one(action, verdict, out, color, stats).await? {
            summary.record(succeeded);
        }
    }
    Ok(summary)
}

impl CommandSummary {
    /// Counts one finished invocation.
    pub fn record(&mut self, succeeded: bool) {
        self.run += 1;
        if !succeeded {
            self.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_program_and_args() {
        let cmd = ExternalCommand::parse("  certbot renew --cert-name ").unwrap();
        assert_eq!(cmd.program(), "certbot");
        assert_eq!(cmd.args(), &["renew".to_string(), "--cert-name".to_string()]);
    }

    #[test]
    fn test_parse_blank_is_none() {
        assert!(ExternalCommand::parse("").is_none());
        assert!(ExternalCommand::parse(" \t ").is_none());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = CommandSummary::default();
        summary.record(true);
        summary.record(false);
        summary.record(true);
        assert_eq!(summary, CommandSummary { run: 3, failed: 1 });
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cmd = ExternalCommand::parse("/nonexistent/cert_status-renew-hook").unwrap();
        let err = cmd.renew("example.com").await.unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
