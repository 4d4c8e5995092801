//! Configuration constants.
//!
//! Defaults for the check run and limits applied to domain input.

// Network defaults
/// TLS port used when none is configured
pub const DEFAULT_PORT: u16 = 443;
/// Combined TCP connect + TLS handshake deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Maximum number of simultaneous TLS connections
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
/// Largest accepted connect + handshake deadline in seconds
pub const MAX_TIMEOUT_SECS: u64 = 3600;

// Renewal
/// Days before expiry at which a certificate is flagged as due for renewal
pub const DEFAULT_ALERT_DAYS: u32 = 30;
/// Largest accepted alert window (ten years)
pub const MAX_ALERT_DAYS: u32 = 3650;

// Domain input limits
/// Maximum length of a DNS name (RFC 1035)
pub const MAX_DOMAIN_LENGTH: usize = 253;

/// Placeholder shown for certificate fields that could not be read.
pub const UNKNOWN_FIELD: &str = "-";

/// Exit status used when the run is interrupted by a signal.
pub const EXIT_INTERRUPTED: i32 = 130;
/// Exit status used when the `--fail-on` policy is violated.
pub const EXIT_POLICY_VIOLATION: i32 = 2;
