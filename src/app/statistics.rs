//! Run statistics logging.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::run::CheckReport;

/// Logs the totals of a finished run, then the outcome breakdown.
pub fn print_final_statistics(report: &CheckReport, stats: &ProcessingStats) {
    print_error_statistics(stats);
    print_simple_summary(report);
}

/// One-line run summary.
fn print_simple_summary(report: &CheckReport) {
    info!(
        "Checked {} domain{} ({} healthy, {} with problems, {} due for renewal, {} without certificate) in {:.1}s",
        report.total_domains,
        if report.total_domains == 1 { "" } else { "s" },
        report.healthy,
        report.with_problems,
        report.due_for_renewal,
        report.no_certificate,
        report.elapsed_seconds
    );
    if report.commands_run > 0 {
        info!(
            "Ran renew command {} time(s), {} failed",
            report.commands_run, report.command_failures
        );
    }
}

/// Logs error, warning, and info counts, skipping zero buckets.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total_errors = stats.total_errors();
    if total_errors > 0 {
        info!("Error Counts ({total_errors} total):");
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    let total_warnings = stats.total_warnings();
    if total_warnings > 0 {
        info!("Warning Counts ({total_warnings} total):");
        for warning_type in WarningType::iter() {
            let count = stats.get_warning_count(warning_type);
            if count > 0 {
                info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }

    let total_info = stats.total_info();
    if total_info > 0 {
        info!("Info Counts ({total_info} total):");
        for info_type in InfoType::iter() {
            let count = stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}
