//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS client initialization error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// Fatal configuration problems, detected before any domain is fetched.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither positional domains nor any domain source option was given.
    #[error("no domain source given: pass domains as arguments or use --file, --dir or --vhosts")]
    NoDomainSource,

    /// Sources were given but yielded no valid domain.
    #[error("no valid domains found in the configured sources")]
    NoDomains,

    /// Command mode was selected without a renew command.
    #[error("command mode requires --renew-command")]
    MissingRenewCommand,

    /// A timeout of zero would fail every fetch.
    #[error("--timeout-seconds must be greater than zero")]
    ZeroTimeout,

    /// The timeout is longer than any single fetch should wait.
    #[error("--timeout-seconds must be at most {max}, got {secs}")]
    TimeoutTooLarge {
        /// Configured timeout
        secs: u64,
        /// Accepted maximum
        max: u64,
    },

    /// The alert window reaches past any plausible certificate lifetime.
    #[error("--alert-days must be at most {max}, got {days}")]
    AlertDaysTooLarge {
        /// Configured window
        days: u32,
        /// Accepted maximum
        max: u32,
    },

    /// A concurrency of zero would never start a fetch.
    #[error("--max-concurrency must be greater than zero")]
    ZeroConcurrency,

    /// A domain source could not be read.
    #[error("failed to read domain source {path}: {source}")]
    SourceUnreadable {
        /// Path of the source that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a TLS fetch produced no certificate.
///
/// These are expected per-domain outcomes, surfaced as data in the verdict.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The domain is not a valid TLS server name.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    /// DNS resolution or TCP connect failed.
    #[error("failed to connect to {domain}:{port}: {source}")]
    Connect {
        /// Domain being fetched
        domain: String,
        /// Port being connected to
        port: u16,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TCP connect did not finish before the deadline.
    #[error("TCP connection timeout for {domain}:{port} ({secs}s)")]
    ConnectTimeout {
        /// Domain being fetched
        domain: String,
        /// Port being connected to
        port: u16,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// The TLS handshake failed.
    #[error("TLS handshake failed for {domain}: {source}")]
    Handshake {
        /// Domain being fetched
        domain: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The TLS handshake did not finish before the deadline.
    #[error("TLS handshake timeout for {domain} ({secs}s)")]
    HandshakeTimeout {
        /// Domain being fetched
        domain: String,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// The handshake completed without a peer certificate.
    #[error("no peer certificate presented by {0}")]
    NoPeerCertificate(String),

    /// The per-domain task ended without producing a result.
    #[error("check task failed: {0}")]
    TaskFailed(String),
}

impl FetchError {
    /// Statistics bucket for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::InvalidServerName(_) => ErrorType::InvalidServerName,
            FetchError::Connect { .. } => ErrorType::ConnectFailure,
            FetchError::ConnectTimeout { .. } => ErrorType::ConnectTimeout,
            FetchError::Handshake { .. } => ErrorType::HandshakeFailure,
            FetchError::HandshakeTimeout { .. } => ErrorType::HandshakeTimeout,
            FetchError::NoPeerCertificate(_) => ErrorType::NoPeerCertificate,
            FetchError::TaskFailed(_) => ErrorType::TaskFailure,
        }
    }
}

/// Failures of the external renew command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error("`{program}` exited with {status}")]
    ExitStatus {
        /// Program that failed
        program: String,
        /// Exit status description
        status: String,
    },
}

/// Errors ending a run early.
#[derive(Error, Debug)]
pub enum RunError {
    /// The run was interrupted by a signal before the report completed.
    #[error("interrupted")]
    Interrupted,
}

/// Types of errors that can occur while checking a domain.
///
/// Every variant results in a `NoCertificate` verdict for the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    InvalidServerName,
    ConnectFailure,
    ConnectTimeout,
    HandshakeFailure,
    HandshakeTimeout,
    NoPeerCertificate,
    TaskFailure,
    RenewCommandFailure,
}

/// Types of warnings found in retrieved certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    NameMismatch,
    DueForRenewal,
    MissingExpiry,
}

/// Informational metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    ExactMatch,
    AltNameMatch,
    RenewCommandRun,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidServerName => "Invalid server name",
            ErrorType::ConnectFailure => "TCP connect error",
            ErrorType::ConnectTimeout => "TCP connect timeout",
            ErrorType::HandshakeFailure => "TLS handshake error",
            ErrorType::HandshakeTimeout => "TLS handshake timeout",
            ErrorType::NoPeerCertificate => "No peer certificate",
            ErrorType::TaskFailure => "Check task failure",
            ErrorType::RenewCommandFailure => "Renew command failure",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::NameMismatch => "Certificate name mismatch",
            WarningType::DueForRenewal => "Due for renewal",
            WarningType::MissingExpiry => "Missing expiry date",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::ExactMatch => "Subject name match",
            InfoType::AltNameMatch => "Alternative name match",
            InfoType::RenewCommandRun => "Renew command run",
        }
    }
}
