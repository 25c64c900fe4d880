//! Stage 1: metadata and data-table extraction
//!
//! The reporting tool's export has a free-form header block, then a
//! name/value row pair carrying the campaign metadata, then the schedule
//! table. The table ends with a "Summary for Columns" block that must be cut
//! off, and its leading columns are sparse (a value is only printed when it
//! changes), so they're forward-filled.

use std::path::Path;

use anyhow::{Context, Result};

use super::Stage;
use crate::config::ExtractConfig;
use crate::workbook::{self, CellValue, Row, SheetGrid, Table, cell_at};

const BOUNDARY_MARKER: &str = "summary for columns";
const SUMMARY_MARKER: &str = "summary";

/// Campaign metadata carried onto every output sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub brand: String,
    pub copyline: String,
}

/// Extract metadata and the cleaned table from a raw schedule export
///
/// Writes the cleaned table (single sheet, header row included) to `output`
/// and returns the metadata.
pub fn process_schedule(input: &Path, output: &Path, options: &ExtractConfig) -> Result<Metadata> {
    extract_to_file(input, output, options).with_context(|| format!("Error in {}", Stage::Extract))
}

fn extract_to_file(input: &Path, output: &Path, options: &ExtractConfig) -> Result<Metadata> {
    log::info!("Extracting schedule from {}", input.display());
    let sheet = workbook::read_first_sheet(input)?;

    let metadata = extract_metadata(&sheet.rows, options.metadata_skip_rows);
    log::info!(
        "Brand: '{}', Copyline: '{}'",
        metadata.brand,
        metadata.copyline
    );

    let table = Table::from_grid(&sheet.rows, options.table_skip_rows).with_context(|| {
        format!(
            "Sheet '{}' has no data table header at row {}",
            sheet.name,
            options.table_skip_rows + 1
        )
    })?;
    let cleaned = clean_table(table);
    log::info!(
        "Cleaned table has {} row(s) and {} column(s)",
        cleaned.rows.len(),
        cleaned.columns.len()
    );

    workbook::write_sheets(
        output,
        &[SheetGrid {
            name: "Sheet1".to_string(),
            rows: cleaned.to_grid(),
        }],
    )?;
    log::info!("Wrote cleaned table to {}", output.display());

    Ok(metadata)
}

/// Read Brand and Copyline from the name/value row pair
///
/// `skip_rows` rows are skipped and the next row is the block's own header,
/// so names sit on the row after it and values on the row after that. Empty
/// cells are dropped from each row independently before pairing names with
/// values by position.
pub fn extract_metadata(rows: &[Row], skip_rows: usize) -> Metadata {
    let non_empty = |idx: usize| -> Vec<&CellValue> {
        rows.get(idx)
            .map(|row| row.iter().filter(|c| !c.is_empty()).collect())
            .unwrap_or_default()
    };
    let names = non_empty(skip_rows + 1);
    let values = non_empty(skip_rows + 2);

    let lookup = |key: &str| -> String {
        names
            .iter()
            .zip(values.iter())
            .find(|(name, _)| matches!(name, CellValue::String(s) if s == key))
            .map(|(_, value)| value.as_text())
            .unwrap_or_default()
    };

    Metadata {
        brand: lookup("Brand"),
        copyline: lookup("Copyline"),
    }
}

/// Forward-fill and truncate the data table
///
/// The boundary is the first row whose first column mentions "Summary for
/// Columns" (any case); rows after it are dropped. Without a boundary nothing
/// is dropped. Rows whose first column mentions "summary" are neither filled
/// nor used as a fill source. Fully blank rows are dropped up front.
pub fn clean_table(table: Table) -> Table {
    let Table { columns, mut rows } = table;
    let before = rows.len();
    rows.retain(|row| !row.iter().all(CellValue::is_empty));
    if rows.len() < before {
        log::debug!("Dropped {} blank row(s) from the data table", before - rows.len());
    }
    if rows.is_empty() {
        return Table { columns, rows };
    }

    let boundary = rows
        .iter()
        .position(|row| first_cell_contains(row, BOUNDARY_MARKER))
        .unwrap_or(rows.len() - 1);

    let is_summary: Vec<bool> = rows
        .iter()
        .map(|row| first_cell_contains(row, SUMMARY_MARKER))
        .collect();

    let mut rows = forward_fill(rows, |idx| idx <= boundary && !is_summary[idx]);
    rows.truncate(boundary + 1);

    Table { columns, rows }
}

/// Carry the last non-empty value of each column down into empty cells
///
/// Only rows accepted by `eligible` take part, both as fill targets and as
/// fill sources; other rows pass through untouched.
pub fn forward_fill(rows: Vec<Row>, eligible: impl Fn(usize) -> bool) -> Vec<Row> {
    let mut last_seen: Vec<Option<CellValue>> = Vec::new();

    rows.into_iter()
        .enumerate()
        .map(|(idx, mut row)| {
            if !eligible(idx) {
                return row;
            }
            if last_seen.len() < row.len() {
                last_seen.resize(row.len(), None);
            }
            for (col, cell) in row.iter_mut().enumerate() {
                if cell.is_empty() {
                    if let Some(prev) = &last_seen[col] {
                        *cell = prev.clone();
                    }
                } else {
                    last_seen[col] = Some(cell.clone());
                }
            }
            row
        })
        .collect()
}

fn first_cell_contains(row: &[CellValue], needle: &str) -> bool {
    cell_at(row, 0).as_text().to_lowercase().contains(needle)
}
