//! Upload boundary
//!
//! Takes one uploaded spreadsheet, stores it under the upload directory and
//! runs the pipeline with the fixed per-run artifact paths. The outcome maps
//! directly onto a response: the report as a download, or a plain-text
//! message.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ReportConfig;
use crate::pipeline::{self, PipelinePaths, RunSummary};

const ALLOWED_EXTENSIONS: &[&str] = &["xls", "xlsx"];

pub const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Please upload an .xls or .xlsx file.";

/// Result of handling one upload
#[derive(Debug)]
pub enum UploadOutcome {
    /// No file was selected; show the form again
    NoFile,
    /// The file isn't a spreadsheet
    Rejected(String),
    /// Pipeline or storage failure, as a plain-text message
    Failed(String),
    /// Report ready for download
    Report {
        path: PathBuf,
        download_name: String,
        summary: RunSummary,
    },
}

/// Check the extension against xls/xlsx, ignoring case
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Store an upload under `workdir` and run the full pipeline on it
pub fn handle_upload(
    filename: &str,
    contents: &[u8],
    workdir: &Path,
    config: &ReportConfig,
) -> UploadOutcome {
    if filename.is_empty() {
        return UploadOutcome::NoFile;
    }
    if !allowed_file(filename) {
        log::warn!("Rejected upload '{}'", filename);
        return UploadOutcome::Rejected(INVALID_TYPE_MESSAGE.to_string());
    }

    match store_and_run(filename, contents, workdir, config) {
        Ok(summary) => UploadOutcome::Report {
            path: summary.report.clone(),
            download_name: config.paths.report_file.clone(),
            summary,
        },
        Err(err) => {
            log::error!("Processing '{}' failed: {:#}", filename, err);
            UploadOutcome::Failed(format!("An error occurred during processing: {:#}", err))
        }
    }
}

fn store_and_run(
    filename: &str,
    contents: &[u8],
    workdir: &Path,
    config: &ReportConfig,
) -> Result<RunSummary> {
    // Only the final component is kept so the upload can't escape the upload dir
    let stored_name = Path::new(filename)
        .file_name()
        .with_context(|| format!("Invalid upload file name: {}", filename))?;

    let upload_dir = workdir.join(&config.paths.upload_dir);
    fs::create_dir_all(&upload_dir)
        .with_context(|| format!("Failed to create directory: {}", upload_dir.display()))?;

    let source = upload_dir.join(stored_name);
    fs::write(&source, contents)
        .with_context(|| format!("Failed to store upload: {}", source.display()))?;
    log::info!("Stored upload at {}", source.display());

    let paths = PipelinePaths::in_workdir(workdir, &config.paths, source);
    pipeline::run(&paths, config)
}
