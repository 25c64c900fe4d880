//! `process` command: one upload, start to finish

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::config::ReportConfig;
use crate::upload::{UploadOutcome, handle_upload};

pub fn handle_process_command(file: &Path, workdir: &Path, config: &ReportConfig) -> Result<()> {
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Wrong extensions are rejected without reading the file
    let contents = if crate::upload::allowed_file(&filename) {
        fs::read(file).with_context(|| format!("Failed to read input file: {}", file.display()))?
    } else {
        Vec::new()
    };

    match handle_upload(&filename, &contents, workdir, config) {
        UploadOutcome::Report {
            path,
            download_name,
            summary,
        } => {
            println!(
                "{} {} / {}",
                "Campaign:".bold(),
                summary.metadata.brand.cyan(),
                summary.metadata.copyline.cyan()
            );
            println!(
                "{} {} spots across {} channel sheets",
                "Processed".green().bold(),
                summary.total_spots.to_string().bold(),
                summary.channel_sheets.to_string().bold()
            );
            println!("Report ({}): {}", download_name.dimmed(), path.display().to_string().cyan());
            Ok(())
        }
        UploadOutcome::Rejected(message) | UploadOutcome::Failed(message) => anyhow::bail!(message),
        UploadOutcome::NoFile => anyhow::bail!("No file selected: {}", file.display()),
    }
}
