//! Certificate diagnosis.
//!
//! This module turns fetched certificates into per-domain verdicts:
//! - Name reconciliation (subject, SAN, mismatch)
//! - Renewal window evaluation
//! - Verdict assembly with ordered problem lists
//! - The concurrent, order-preserving check pipeline

mod expiry;
mod pipeline;
mod reconcile;
mod verdict;

// Re-export public API
pub use expiry::{days_remaining, evaluate_expiry, RenewalStatus};
pub use pipeline::{check_domains, verdict_stream, CheckSettings};
pub use reconcile::{match_annotation, reconcile, MatchResult};
pub use verdict::{DomainVerdict, Problem};
