//! Report artifacts: report.json, report.html, run.log.
//!
//! `report.json` is the interchange artifact -- a serialized
//! `TenantReport` that any viewer consumes directly. The HTML document is
//! rendered from the same object, never re-parsed.

pub mod html;

use std::path::{Path, PathBuf};

use graphly_core::{RunLog, TenantReport};

use crate::error::CliError;
use crate::output;

/// Which artifacts a `report` run writes.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSelection {
    pub json: bool,
    pub html: bool,
}

impl ArtifactSelection {
    pub fn from_flags(json_only: bool, html_only: bool) -> Self {
        Self {
            json: !html_only,
            html: !json_only,
        }
    }
}

/// Write the selected artifacts plus run.log into `out_dir`.
///
/// The run log is always written, even for a partial selection -- it is
/// the record of what degraded during collection.
pub fn write_artifacts(
    report: &TenantReport,
    log: &RunLog,
    out_dir: &Path,
    selection: ArtifactSelection,
) -> Result<Vec<PathBuf>, CliError> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    if selection.json {
        let path = out_dir.join("report.json");
        std::fs::write(&path, output::json_pretty(report))?;
        written.push(path);
    }

    if selection.html {
        let path = out_dir.join("report.html");
        std::fs::write(&path, html::render(report))?;
        written.push(path);
    }

    let log_path = out_dir.join("run.log");
    std::fs::write(&log_path, log.render())?;
    written.push(log_path);

    Ok(written)
}
