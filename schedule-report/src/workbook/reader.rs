//! Read workbooks into absolute-coordinate grids

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};

use super::cell::{CellValue, Row};

/// One worksheet as a dense grid
///
/// Row and column indices match the sheet's own coordinates: calamine ranges
/// start at the first non-empty cell, so leading blank rows and columns are
/// restored here.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Read every worksheet of a workbook, in workbook order
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<SheetGrid>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        sheets.push(SheetGrid {
            rows: range_to_rows(&range),
            name: sheet_name,
        });
    }

    log::debug!("Read {} sheet(s) from {}", sheets.len(), path.display());
    Ok(sheets)
}

/// Read only the first worksheet of a workbook
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> Result<SheetGrid> {
    let path = path.as_ref();
    read_workbook(path)?
        .into_iter()
        .next()
        .with_context(|| format!("Excel file has no sheets: {}", path.display()))
}

fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Row> = vec![Vec::new(); start_row as usize];
    for cells in range.rows() {
        let mut row = vec![CellValue::Empty; start_col as usize];
        row.extend(cells.iter().map(CellValue::from));
        rows.push(row);
    }
    rows
}
