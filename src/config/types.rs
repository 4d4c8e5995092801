//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_ALERT_DAYS, DEFAULT_MAX_CONCURRENCY, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    MAX_ALERT_DAYS, MAX_TIMEOUT_SECS,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How verdicts are presented once the checks complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Full diagnostic table of every domain (default)
    Table,
    /// Bare list of domains due for renewal, one per line
    RenewList,
    /// Run the renew command once per domain due for renewal
    Command,
    /// All verdicts as a JSON array
    Json,
}

/// Exit code policy applied after the report is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 unless the run itself fails
    Never,
    /// Exit 2 when any domain has a problem or a renew command failed
    Problems,
    /// Exit 2 when any domain is due for renewal
    Due,
}

/// Run configuration.
///
/// Parsed from the command line (and `CERT_STATUS_*` environment variables) by
/// the binary, or built programmatically by library callers.
///
/// # Examples
///
/// ```no_run
/// use cert_status::Config;
///
/// let config = Config {
///     domains: vec!["example.com".to_string()],
///     alert_days: 14,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cert_status",
    version,
    about = "Checks the TLS certificates of a list of domains for name mismatches and upcoming expiry."
)]
pub struct Config {
    /// Domains to check
    #[arg(value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// File with one domain per line (`-` reads stdin)
    #[arg(long, short = 'f', env = "CERT_STATUS_FILE")]
    pub file: Option<PathBuf>,

    /// Directory whose entry names are domains (e.g. a per-domain certificate store)
    #[arg(long, env = "CERT_STATUS_DIR")]
    pub dir: Option<PathBuf>,

    /// Web server configuration file or directory to scrape for server names
    #[arg(long)]
    pub vhosts: Vec<PathBuf>,

    /// Days before expiry at which a certificate is due for renewal
    #[arg(long, short = 'd', env = "CERT_STATUS_ALERT_DAYS", default_value_t = DEFAULT_ALERT_DAYS)]
    pub alert_days: u32,

    /// Output mode: table|renew-list|command|json
    #[arg(long, short = 'm', value_enum, env = "CERT_STATUS_MODE", default_value_t = OutputMode::Table)]
    pub mode: OutputMode,

    /// Command run once per domain due for renewal, with the domain appended as last argument
    #[arg(long, short = 'r', env = "CERT_STATUS_RENEW_COMMAND")]
    pub renew_command: Option<String>,

    /// Connect + handshake timeout in seconds
    #[arg(long, env = "CERT_STATUS_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// TLS port to connect to
    #[arg(long, short = 'p', env = "CERT_STATUS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum simultaneous TLS connections
    #[arg(long, env = "CERT_STATUS_MAX_CONCURRENCY", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Exit code policy: never|problems|due
    #[arg(long, value_enum, env = "CERT_STATUS_FAIL_ON", default_value_t = FailOn::Never)]
    pub fail_on: FailOn,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, env = "CERT_STATUS_LOG_LEVEL", default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            file: None,
            dir: None,
            vhosts: Vec::new(),
            alert_days: DEFAULT_ALERT_DAYS,
            mode: OutputMode::Table,
            renew_command: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            port: DEFAULT_PORT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            output: None,
            fail_on: FailOn::Never,
            no_color: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the configuration before any domain is read or fetched.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when no domain source is given, when command
    /// mode has no renew command, or when a limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_domain_source() {
            return Err(ConfigError::NoDomainSource);
        }
        if self.mode == OutputMode::Command && self.renew_command().is_none() {
            return Err(ConfigError::MissingRenewCommand);
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.timeout_seconds > MAX_TIMEOUT_SECS {
            return Err(ConfigError::TimeoutTooLarge {
                secs: self.timeout_seconds,
                max: MAX_TIMEOUT_SECS,
            });
        }
        if self.alert_days > MAX_ALERT_DAYS {
            return Err(ConfigError::AlertDaysTooLarge {
                days: self.alert_days,
                max: MAX_ALERT_DAYS,
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.mode == OutputMode::Command && self.output.is_some() {
            log::warn!("--output is ignored in command mode");
        }
        if self.mode != OutputMode::Command && self.renew_command.is_some() {
            log::warn!("--renew-command is only used in command mode");
        }
        Ok(())
    }

    /// True if at least one domain source was configured.
    pub fn has_domain_source(&self) -> bool {
        !self.domains.is_empty()
            || self.file.is_some()
            || self.dir.is_some()
            || !self.vhosts.is_empty()
    }

    /// The renew command, if one was given and is not blank.
    pub fn renew_command(&self) -> Option<&str> {
        self.renew_command
            .as_deref()
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
    }

    /// Connect + handshake deadline as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.alert_days, 30);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.port, 443);
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.mode, OutputMode::Table);
        assert_eq!(config.fail_on, FailOn::Never);
        assert!(config.renew_command.is_none());
    }

    #[test]
    fn test_validate_requires_domain_source() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoDomainSource)
        ));
    }

    #[test]
    fn test_validate_command_mode_requires_renew_command() {
        let config = Config {
            domains: vec!["example.com".to_string()],
            mode: OutputMode::Command,
            renew_command: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRenewCommand)
        ));

        let config = Config {
            renew_command: Some("/usr/local/bin/renew".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let base = Config {
            domains: vec!["example.com".to_string()],
            ..Default::default()
        };
        let zero_timeout = Config {
            timeout_seconds: 0,
            ..base.clone()
        };
        assert!(matches!(
            zero_timeout.validate(),
            Err(ConfigError::ZeroTimeout)
        ));
        let zero_concurrency = Config {
            max_concurrency: 0,
            ..base
        };
        assert!(matches!(
            zero_concurrency.validate(),
            Err(ConfigError::ZeroConcurrency)
        ));
    }

    #[test]
    fn test_validate_upper_limits() {
        let base = Config {
            domains: vec!["example.com".to_string()],
            ..Default::default()
        };
        let longest = Config {
            timeout_seconds: MAX_TIMEOUT_SECS,
            alert_days: MAX_ALERT_DAYS,
            ..base.clone()
        };
        assert!(longest.validate().is_ok());

        let huge_timeout = Config {
            timeout_seconds: u64::MAX,
            ..base.clone()
        };
        assert!(matches!(
            huge_timeout.validate(),
            Err(ConfigError::TimeoutTooLarge { secs: u64::MAX, .. })
        ));
        let huge_window = Config {
            alert_days: MAX_ALERT_DAYS + 1,
            ..base
        };
        assert!(matches!(
            huge_window.validate(),
            Err(ConfigError::AlertDaysTooLarge { .. })
        ));
    }

    #[test]
    fn test_any_source_counts() {
        let config = Config {
            vhosts: vec![PathBuf::from("/etc/nginx/sites-enabled")],
            ..Default::default()
        };
        assert!(config.has_domain_source());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = Config {
            timeout_seconds: 3,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }
}
