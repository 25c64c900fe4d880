//! Cell values as they travel between stages

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// A single row of cells, indexed by column
pub type Row = Vec<CellValue>;

static EMPTY: CellValue = CellValue::Empty;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing or empty cell
    Empty,
    /// Text
    String(String),
    /// Any numeric cell (Excel stores integers as floats too)
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date or date-time cell
    DateTime(NaiveDateTime),
    /// Time-of-day or duration cell, in whole seconds
    Time(u32),
}

/// Get a cell by column, treating cells past the end of the row as empty
pub fn cell_at(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY)
}

impl CellValue {
    /// Shorthand for a text cell
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s)
        }
    }

    /// Check if this cell counts as missing (empty strings included)
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Render the cell the way it reads in a sheet
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Float(f) => {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Time(secs) => format!(
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ),
        }
    }

    /// Excel serial number for date and time cells
    pub fn excel_serial(&self) -> Option<f64> {
        match self {
            CellValue::DateTime(dt) => {
                let days = (dt.date() - excel_epoch()).num_days() as f64;
                Some(days + dt.num_seconds_from_midnight() as f64 / SECONDS_PER_DAY)
            }
            CellValue::Time(secs) => Some(*secs as f64 / SECONDS_PER_DAY),
            _ => None,
        }
    }

    /// Build a date or time cell from an Excel serial number
    ///
    /// Serials below one day have no date part and become `Time`, as do
    /// cells formatted as durations.
    pub fn from_excel_serial(serial: f64, is_duration: bool) -> Self {
        if !serial.is_finite() || serial < 0.0 {
            return CellValue::Float(serial);
        }
        if is_duration || serial < 1.0 {
            return CellValue::Time((serial * SECONDS_PER_DAY).round() as u32);
        }

        let mut days = serial.trunc() as i64;
        let mut secs = ((serial - serial.trunc()) * SECONDS_PER_DAY).round() as i64;
        if secs >= SECONDS_PER_DAY as i64 {
            days += 1;
            secs = 0;
        }
        Duration::try_days(days)
            .and_then(|offset| excel_epoch().checked_add_signed(offset))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| CellValue::DateTime(midnight + Duration::seconds(secs)))
            .unwrap_or(CellValue::Float(serial))
    }
}

fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::text(s.clone()),
            Data::Int(i) => CellValue::Float(*i as f64),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::from_excel_serial(dt.as_f64(), dt.is_duration()),
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(CellValue::DateTime)
                .unwrap_or_else(|_| CellValue::text(s.clone())),
            Data::DurationIso(s) => CellValue::text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }
}
