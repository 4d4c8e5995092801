//! Bare renew list: one due domain per line, nothing else.

use std::io::{self, Write};

use crate::check::DomainVerdict;

/// Writes `verdict`'s domain on its own line if it is due for renewal.
///
/// Returns whether a line was written.
pub fn write_renew_line<W: Write>(out: &mut W, verdict: &DomainVerdict) -> io::Result<bool> {
    if !verdict.is_due_for_renewal() {
        return Ok(false);
    }
    writeln!(out, "{}", verdict.domain())?;
    Ok(true)
}

/// Writes every due domain, in verdict order.
pub fn write_renew_list<W: Write>(out: &mut W, verdicts: &[DomainVerdict]) -> io::Result<usize> {
    let mut written = 0;
    for verdict in verdicts {
        if write_renew_line(out, verdict)? {
            written += 1;
        }
    }
    Ok(written)
}
