//! Report destination: stdout, or a file replaced atomically.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use tempfile::NamedTempFile;

/// Where the report is written.
///
/// File output goes to a temporary file in the destination directory and is
/// only moved into place by [`ReportSink::finish`]. Dropping the sink without
/// finishing (an interrupted run) deletes the temporary file and leaves any
/// existing destination untouched.
pub enum ReportSink {
    /// Standard output
    Stdout(io::Stdout),
    /// Pending file output
    File {
        /// Temporary file being written
        temp: NamedTempFile,
        /// Final destination
        destination: PathBuf,
    },
}

impl ReportSink {
    /// Opens stdout, or a temporary file next to `output`.
    pub fn open(output: Option<&Path>) -> Result<Self> {
        let Some(destination) = output else {
            return Ok(Self::Stdout(io::stdout()));
        };

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        debug!(
            "Writing report to {} via {}",
            destination.display(),
            temp.path().display()
        );

        Ok(Self::File {
            temp,
            destination: destination.to_path_buf(),
        })
    }

    /// True when writing to a terminal-facing stream rather than a file.
    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout(_))
    }

    /// Flushes and, for file output, moves the report into place.
    pub fn finish(self) -> Result<()> {
        match self {
            Self::Stdout(mut stdout) => stdout.flush().context("Failed to flush stdout"),
            Self::File {
                mut temp,
                destination,
            } => {
                temp.flush().context("Failed to flush report")?;
                temp.persist(&destination).with_context(|| {
                    format!("Failed to write report to {}", destination.display())
                })?;
                Ok(())
            }
        }
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::File { temp, .. } => temp.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::File { temp, .. } => temp.flush(),
        }
    }
}
