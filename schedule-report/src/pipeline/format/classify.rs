//! Row classification by cell content
//!
//! Banner rows are recognised by "Brand :" and label rows by "Date/Time".
//! Cells are scanned left to right and the first cell matching either marker
//! decides; within a cell the banner marker wins.

use crate::config::REPORT_COLUMNS;
use crate::workbook::CellValue;

pub const BANNER_MARKER: &str = "Brand :";
pub const LABEL_MARKER: &str = "Date/Time";

/// Kind of a report row, for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Channel banner, channel summary or grand total
    Banner,
    /// Column label row
    HeaderLabel,
    /// Anything else, blank separator rows included
    Data,
}

/// Classify a row from its styled columns (A through H)
pub fn classify_row(row: &[CellValue]) -> RowKind {
    for cell in row.iter().take(REPORT_COLUMNS) {
        if cell.is_empty() {
            continue;
        }
        let text = cell.as_text();
        if text.contains(BANNER_MARKER) {
            return RowKind::Banner;
        }
        if text.contains(LABEL_MARKER) {
            return RowKind::HeaderLabel;
        }
    }
    RowKind::Data
}
