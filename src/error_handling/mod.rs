//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (configuration, fetch, command, initialization)
//! - Outcome statistics tracking (errors, warnings, info metrics)
//!
//! Outcome types are categorized into:
//! - **Errors**: Failures that left a domain without a certificate, or a failed renew command
//! - **Warnings**: Certificate problems worth attention (mismatch, renewal due, unreadable fields)
//! - **Info**: Informational metrics (how names matched, commands run)

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    CommandError, ConfigError, ErrorType, FetchError, InfoType, InitializationError, RunError,
    WarningType,
};
