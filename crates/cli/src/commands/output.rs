//! Artifact files written to the output directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kensa_scanners::{
    report,
    synthesis::{exploit_file_name, invariant_file_name, GeneratedTests},
    ContractAnalysis,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One `fs::write` per artifact; existing files are overwritten.
fn write_artifact(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

pub fn write_report(dir: &Path, analysis: &ContractAnalysis, date: NaiveDate) -> Result<PathBuf> {
    write_artifact(
        dir,
        &format!("{}.report.md", analysis.name()),
        &report::render_markdown(analysis, date),
    )
}

/// Writes whichever suites were generated; nothing is created when both
/// are absent.
pub fn write_tests(
    dir: &Path,
    analysis: &ContractAnalysis,
    tests: &GeneratedTests,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(suite) = &tests.invariant_suite {
        written.push(write_artifact(dir, &invariant_file_name(&analysis.model), suite)?);
    }
    if let Some(suite) = &tests.exploit_suite {
        written.push(write_artifact(dir, &exploit_file_name(&analysis.model), suite)?);
    }

    Ok(written)
}
