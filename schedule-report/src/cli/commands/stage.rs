//! Single-stage commands, for rerunning one step on an intermediate workbook

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::config::ReportConfig;
use crate::pipeline::{extract, extract::Metadata, format, reshape};

fn ensure_parent(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

pub fn handle_extract_command(input: &Path, output: &Path, config: &ReportConfig) -> Result<()> {
    ensure_parent(output)?;
    let metadata = extract::process_schedule(input, output, &config.extract)?;

    println!("{} {}", "Brand:".bold(), metadata.brand.cyan());
    println!("{} {}", "Copyline:".bold(), metadata.copyline.cyan());
    println!("Cleaned table: {}", output.display().to_string().cyan());
    Ok(())
}

pub fn handle_reshape_command(input: &Path, output: &Path, brand: String, copyline: String) -> Result<()> {
    ensure_parent(output)?;
    let metadata = Metadata { brand, copyline };
    let summary = reshape::transform_by_channel(input, output, &metadata)?;

    for (sheet, channel, count) in &summary.sheets {
        if sheet == channel {
            println!("  {} {:>5} spots", format!("{:<31}", sheet).bold(), count);
        } else {
            println!(
                "  {} {:>5} spots  {}",
                format!("{:<31}", sheet).bold(),
                count,
                format!("({})", channel).dimmed()
            );
        }
    }
    println!(
        "{} {} spots in {} sheets: {}",
        "Reshaped".green().bold(),
        summary.total_spots,
        summary.sheets.len(),
        output.display().to_string().cyan()
    );
    Ok(())
}

pub fn handle_format_command(input: &Path, output: &Path, config: &ReportConfig) -> Result<()> {
    ensure_parent(output)?;
    let summary = format::format_report(input, output, config)?;

    println!(
        "{} {} sheets, {} body rows: {}",
        "Formatted".green().bold(),
        summary.sheets,
        summary.body_rows,
        output.display().to_string().cyan()
    );
    Ok(())
}
