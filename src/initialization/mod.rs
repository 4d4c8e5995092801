//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger
//! - TLS connector (inspection-only certificate verification)
//! - Concurrency semaphore
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod tls;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;
pub use tls::init_tls_connector;

/// Initializes a semaphore for controlling concurrency.
///
/// Each domain task holds one permit for the duration of its TLS fetch, so at
/// most `count` connections are open at a time.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
