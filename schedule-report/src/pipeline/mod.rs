//! The three-stage report pipeline
//!
//! extract -> reshape -> format, each stage reading the previous stage's
//! workbook from disk and writing its own. Stages run strictly in sequence;
//! only the campaign metadata is passed along in memory.

pub mod extract;
pub mod format;
pub mod reshape;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{PathsConfig, ReportConfig};
use extract::Metadata;

/// Pipeline stage, used to qualify errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Reshape,
    Format,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Reshape => write!(f, "reshape"),
            Stage::Format => write!(f, "format"),
        }
    }
}

/// Artifact locations for one run
///
/// Existing files are overwritten. Runs sharing these paths must not overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub source: PathBuf,
    pub cleaned: PathBuf,
    pub reshaped: PathBuf,
    pub report: PathBuf,
}

impl PipelinePaths {
    /// Fixed artifact paths under `workdir` for a given source file
    pub fn in_workdir(workdir: &Path, paths: &PathsConfig, source: PathBuf) -> Self {
        let upload_dir = workdir.join(&paths.upload_dir);
        let processed_dir = workdir.join(&paths.processed_dir);
        Self {
            source,
            cleaned: upload_dir.join(&paths.cleaned_file),
            reshaped: processed_dir.join(&paths.reshaped_file),
            report: processed_dir.join(&paths.report_file),
        }
    }

    fn create_parent_dirs(&self) -> Result<()> {
        for path in [&self.cleaned, &self.reshaped, &self.report] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub metadata: Metadata,
    pub channel_sheets: usize,
    pub total_spots: usize,
    pub report: PathBuf,
}

/// Run extract, reshape and format in sequence
pub fn run(paths: &PipelinePaths, config: &ReportConfig) -> Result<RunSummary> {
    paths.create_parent_dirs()?;

    let metadata = extract::process_schedule(&paths.source, &paths.cleaned, &config.extract)?;
    let reshaped = reshape::transform_by_channel(&paths.cleaned, &paths.reshaped, &metadata)?;
    format::format_report(&paths.reshaped, &paths.report, config)?;

    Ok(RunSummary {
        metadata,
        channel_sheets: reshaped.sheets.len(),
        total_spots: reshaped.total_spots,
        report: paths.report.clone(),
    })
}
