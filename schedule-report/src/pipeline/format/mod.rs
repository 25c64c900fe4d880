//! Stage 3: presentation formatting
//!
//! All channel sheets are stacked into one worksheet (one blank row between
//! them) below a three-row letterhead, then styled row by row.

mod classify;
mod styles;

pub use classify::{RowKind, classify_row};

use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::{Format, Worksheet};

use super::Stage;
use crate::config::{LetterheadConfig, REPORT_COLUMNS, ReportConfig};
use crate::workbook::{self, CellValue, Row, SheetGrid, cell_at, write_cell};
use styles::ReportStyles;

/// Rows taken by the letterhead above the report body
pub const LETTERHEAD_ROWS: usize = 3;

const REPORT_SHEET: &str = "Sheet1";

/// Label row position in the first sheet (below the global banner) and in
/// every later sheet
const FIRST_SHEET_LABEL_ROW: usize = 2;
const LABEL_ROW: usize = 1;

/// What the format stage produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSummary {
    pub sheets: usize,
    pub body_rows: usize,
}

/// Build the single-sheet, styled report from the per-channel workbook
pub fn format_report(input: &Path, output: &Path, config: &ReportConfig) -> Result<FormatSummary> {
    format_to_file(input, output, config).with_context(|| format!("Error in {}", Stage::Format))
}

fn format_to_file(input: &Path, output: &Path, config: &ReportConfig) -> Result<FormatSummary> {
    log::info!("Formatting report from {}", input.display());
    let sheets = workbook::read_workbook(input)?;
    if sheets.is_empty() {
        bail!("Excel file has no sheets: {}", input.display());
    }

    let body = stack_sheets(&sheets, &config.layout.header_labels)?;
    write_report(output, &body, config)?;

    log::info!(
        "Wrote report with {} body row(s) from {} sheet(s) to {}",
        body.len(),
        sheets.len(),
        output.display()
    );
    Ok(FormatSummary {
        sheets: sheets.len(),
        body_rows: body.len(),
    })
}

/// Stack sheets into one grid, relabelling each sheet's header row
///
/// Sheets are separated by a single blank row.
pub fn stack_sheets(sheets: &[SheetGrid], labels: &[String; REPORT_COLUMNS]) -> Result<Vec<Row>> {
    let mut body: Vec<Row> = Vec::new();

    for (idx, sheet) in sheets.iter().enumerate() {
        let label_row = if idx == 0 { FIRST_SHEET_LABEL_ROW } else { LABEL_ROW };
        let mut rows = sheet.rows.clone();
        let row = rows.get_mut(label_row).with_context(|| {
            format!(
                "Sheet '{}' has {} row(s), expected a header row at row {}",
                sheet.name,
                sheet.rows.len(),
                label_row + 1
            )
        })?;
        apply_labels(row, labels);

        if idx > 0 {
            body.push(Vec::new());
        }
        body.extend(rows);
    }

    Ok(body)
}

fn apply_labels(row: &mut Row, labels: &[String; REPORT_COLUMNS]) {
    if row.len() < REPORT_COLUMNS {
        row.resize(REPORT_COLUMNS, CellValue::Empty);
    }
    for (cell, label) in row.iter_mut().zip(labels) {
        *cell = CellValue::text(label.as_str());
    }
}

/// Style of each body row: the first row is always the bold, bordered
/// header; the rest are classified by content
pub fn row_styles(body: &[Row]) -> Vec<Option<RowKind>> {
    body.iter()
        .enumerate()
        .map(|(idx, row)| if idx == 0 { None } else { Some(classify_row(row)) })
        .collect()
}

fn write_report(path: &Path, body: &[Row], config: &ReportConfig) -> Result<()> {
    let styles = ReportStyles::new(&config.layout)?;
    let mut workbook = workbook::new_workbook()?;
    let sheet = workbook.add_worksheet();
    sheet.set_name(REPORT_SHEET)?;

    write_letterhead(sheet, &config.letterhead, &styles)?;

    for (col, width) in config.layout.column_widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    for ((idx, row), kind) in body.iter().enumerate().zip(row_styles(body)) {
        let sheet_row = (idx + LETTERHEAD_ROWS) as u32;
        let format = match kind {
            None => &styles.first_row,
            Some(kind) => styles.for_kind(kind),
        };
        for col in 0..row.len().max(REPORT_COLUMNS) {
            let styled = (col < REPORT_COLUMNS).then_some(format);
            write_cell(sheet, sheet_row, col as u16, cell_at(row, col), styled)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    Ok(())
}

/// Company name over C1:G2, taglines down column H, address across C3:G3
fn write_letterhead(
    sheet: &mut Worksheet,
    letterhead: &LetterheadConfig,
    styles: &ReportStyles,
) -> Result<()> {
    sheet.merge_range(0, 0, 2, 1, "", &Format::new())?;
    sheet.merge_range(0, 2, 1, 6, &letterhead.company, &styles.title)?;
    for (row, line) in letterhead.taglines.iter().enumerate() {
        sheet.write_string_with_format(row as u32, 7, line, &styles.letterhead)?;
    }
    sheet.merge_range(2, 2, 2, 6, &letterhead.address, &styles.letterhead)?;
    Ok(())
}
