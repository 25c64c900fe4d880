//! Builders for raw schedule exports used across tests

use std::path::Path;

use crate::workbook::{self, CellValue, Row, SheetGrid};

pub const RAW_HEADER: [&str; 9] = [
    "Channel",
    "Day Of Week",
    "Date",
    "Start Time",
    "Brk",
    "PIB",
    "Duration",
    "Program",
    "No. Of Spots",
];

/// One schedule line; an empty channel relies on forward-fill
#[derive(Debug, Clone)]
pub struct RawSpot {
    pub channel: String,
    pub date: String,
    pub start_time: String,
}

impl RawSpot {
    pub fn new(channel: &str, date: &str, start_time: &str) -> Self {
        Self {
            channel: channel.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
        }
    }
}

fn text_row(cells: &[&str]) -> Row {
    cells.iter().map(|c| CellValue::text(*c)).collect()
}

/// Grid laid out like the reporting tool's export
///
/// Rows 0-15 free-form header, row 16 block title, row 17 names, row 18
/// values, row 19 table header, spots from row 20, then the summary block and
/// a trailing line that must be cut off.
pub fn raw_schedule_rows(brand: &str, copyline: &str, spots: &[RawSpot]) -> Vec<Row> {
    let mut rows: Vec<Row> = vec![Vec::new(); 16];
    rows[0] = text_row(&["Daily Commercial Logs Export"]);
    rows[2] = text_row(&["Market", "", "Bangkok"]);
    rows[4] = text_row(&["Period", "", "01/01/2024 - 31/01/2024"]);

    rows.push(text_row(&["Report Variables"]));
    rows.push(text_row(&["Brand", "", "Copyline", "", "Media"]));
    rows.push(text_row(&[brand, "", copyline]));
    rows.push(text_row(&RAW_HEADER));

    for spot in spots {
        rows.push(text_row(&[
            spot.channel.as_str(),
            "",
            spot.date.as_str(),
            spot.start_time.as_str(),
            "1",
            "F",
            "00:30",
            "Evening News",
            "1",
        ]));
    }

    rows.push(text_row(&["Summary for Columns"]));
    rows.push(text_row(&["Total", "", "", "", "", "", "", "", "99"]));
    rows
}

/// Write a raw schedule export to `path`
pub fn write_raw_schedule(path: &Path, brand: &str, copyline: &str, spots: &[RawSpot]) {
    let sheet = SheetGrid {
        name: "Report".to_string(),
        rows: raw_schedule_rows(brand, copyline, spots),
    };
    workbook::write_sheets(path, &[sheet]).unwrap();
}
