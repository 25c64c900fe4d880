//! Write plain (unstyled) workbooks

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};

use super::cell::CellValue;
use super::reader::SheetGrid;

const DATE_FORMAT: &str = "dd/mm/yyyy";
const DATETIME_FORMAT: &str = "dd/mm/yyyy hh:mm:ss";
const TIME_FORMAT: &str = "hh:mm:ss";

/// New workbook with a fixed creation time
///
/// The creation time is the only run-dependent part of the saved file, so
/// pinning it makes equal content produce byte-identical workbooks.
pub fn new_workbook() -> Result<Workbook> {
    let created = ExcelDateTime::from_ymd(1980, 1, 1)?;
    let properties = DocProperties::new().set_creation_datetime(&created);

    let mut workbook = Workbook::new();
    workbook.set_properties(&properties);
    Ok(workbook)
}

/// Write sheets to a new workbook, one worksheet per grid
///
/// The workbook is assembled in memory and saved in one step, so nothing is
/// left at `path` if any sheet fails.
pub fn write_sheets<P: AsRef<Path>>(path: P, sheets: &[SheetGrid]) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = new_workbook()?;

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .with_context(|| format!("Invalid sheet name: {}", sheet.name))?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                write_cell(worksheet, row_idx as u32, col_idx as u16, value, None)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::debug!("Wrote {} sheet(s) to {}", sheets.len(), path.display());
    Ok(())
}

/// Write one cell, optionally styled
///
/// Empty cells are only written when a format is given, so styling still
/// covers blank cells.
pub fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<()> {
    match (value, format) {
        (CellValue::Empty, None) => {}
        (CellValue::Empty, Some(fmt)) => {
            ws.write_blank(row, col, fmt)?;
        }
        (CellValue::String(s), None) => {
            ws.write_string(row, col, s)?;
        }
        (CellValue::String(s), Some(fmt)) => {
            ws.write_string_with_format(row, col, s, fmt)?;
        }
        (CellValue::Float(f), None) => {
            ws.write_number(row, col, *f)?;
        }
        (CellValue::Float(f), Some(fmt)) => {
            ws.write_number_with_format(row, col, *f, fmt)?;
        }
        (CellValue::Bool(b), None) => {
            ws.write_boolean(row, col, *b)?;
        }
        (CellValue::Bool(b), Some(fmt)) => {
            ws.write_boolean_with_format(row, col, *b, fmt)?;
        }
        (CellValue::DateTime(_) | CellValue::Time(_), fmt) => {
            let serial = value.excel_serial().unwrap_or_default();
            let num_format = temporal_num_format(value);
            let fmt = fmt.cloned().unwrap_or_else(Format::new).set_num_format(num_format);
            ws.write_number_with_format(row, col, serial, &fmt)?;
        }
    }
    Ok(())
}

fn temporal_num_format(value: &CellValue) -> &'static str {
    match value {
        CellValue::Time(_) => TIME_FORMAT,
        CellValue::DateTime(dt) if dt.time() == chrono::NaiveTime::MIN => DATE_FORMAT,
        _ => DATETIME_FORMAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::read_workbook;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_keeps_positions_and_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.xlsx");
        let date = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let sheets = vec![SheetGrid {
            name: "Data".to_string(),
            rows: vec![
                vec![],
                vec![CellValue::Empty, CellValue::text("CH1"), CellValue::Float(3.0)],
                vec![CellValue::DateTime(date), CellValue::Time(1800)],
            ],
        }];
        write_sheets(&path, &sheets).unwrap();

        let read = read_workbook(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].name, "Data");
        let rows = &read[0].rows;
        assert_eq!(rows[1][1], CellValue::text("CH1"));
        assert_eq!(rows[1][2], CellValue::Float(3.0));
        assert_eq!(rows[2][0], CellValue::DateTime(date));
        assert_eq!(rows[2][1], CellValue::Time(1800));
    }

    #[test]
    fn test_same_sheets_give_identical_bytes() {
        let dir = TempDir::new().unwrap();
        let sheets = vec![SheetGrid {
            name: "CH1".to_string(),
            rows: vec![vec![CellValue::text("Acme"), CellValue::Float(2.0)]],
        }];
        write_sheets(dir.path().join("a.xlsx"), &sheets).unwrap();
        write_sheets(dir.path().join("b.xlsx"), &sheets).unwrap();

        let a = std::fs::read(dir.path().join("a.xlsx")).unwrap();
        let b = std::fs::read(dir.path().join("b.xlsx")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.xlsx");
        let sheets = vec![SheetGrid {
            name: "bad[name]".to_string(),
            rows: vec![],
        }];
        assert!(write_sheets(&path, &sheets).is_err());
        assert!(!path.exists());
    }
}
