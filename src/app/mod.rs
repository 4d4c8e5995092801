//! Application plumbing.
//!
//! Interrupt handling and run statistics used by the check runner.

pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use shutdown::{shutdown_gracefully, spawn_interrupt_watcher};
pub use statistics::{print_error_statistics, print_final_statistics};
