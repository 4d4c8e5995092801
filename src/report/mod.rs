//! Verdict reporting.
//!
//! Output modes:
//! - Table: full diagnostic table of every verdict
//! - Renew list: due domains only, one per line
//! - Command: external renew action per due domain
//! - JSON: every verdict as a JSON array

mod command;
mod renew;
mod sink;
mod table;

use std::io::{self, Write};

use crate::check::DomainVerdict;

// Re-export public API
pub use command::{renew_due, renew_one, CommandSummary, ExternalCommand, RenewAction};
pub use renew::{write_renew_line, write_renew_list};
pub use sink::ReportSink;
pub use table::{render_table, table_row, write_table, TABLE_HEADERS};

/// Writes every verdict as a pretty-printed JSON array.
pub fn write_json<W: Write>(out: &mut W, verdicts: &[DomainVerdict]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, verdicts)?;
    writeln!(out)
}
