//! JSON report export.
//!
//! The report is the portable representation of a run: the canonical schema,
//! all three utility sets and per-partition fit diagnostics.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::ConjointError;
use crate::fit::UtilityReport;

/// Write the full utility report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &UtilityReport) -> Result<(), ConjointError> {
    let file = File::create(path).map_err(|e| ConjointError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(|e| ConjointError::io(path, e))?;
    info!(path = %path.display(), "wrote JSON report");
    Ok(())
}
