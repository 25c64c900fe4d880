//! Broadcast date/time normalization
//!
//! Schedules use hour values of 24 and above for slots after midnight that
//! still belong to the nominal broadcast day ("25:30" is 01:30 the next
//! morning). Normalization moves those slots onto the calendar day they air.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};

use crate::workbook::CellValue;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Day-first date layouts accepted for text dates
const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// A schedule slot on its real calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Why a row's slot couldn't be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Date or start time cell is empty
    MissingValue { field: &'static str },
    /// Date isn't a day-first date
    InvalidDate { value: String },
    /// Start time isn't `HH:MM`
    InvalidTime { value: String },
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::MissingValue { field } => write!(f, "{} is empty", field),
            NormalizeError::InvalidDate { value } => {
                write!(f, "'{}' is not a DD/MM/YYYY date", value)
            }
            NormalizeError::InvalidTime { value } => {
                write!(f, "'{}' is not an HH:MM start time", value)
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

impl NormalizedSlot {
    /// Weekday name (Mon..Sun) of the normalized date
    pub fn day_of_week(&self) -> &'static str {
        DAY_NAMES[self.date.weekday().num_days_from_monday() as usize]
    }

    /// Date rendered as DD/MM/YYYY
    pub fn date_text(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Start time rendered as zero-padded HH:MM
    pub fn start_time_text(&self) -> String {
        self.start_time.format("%H:%M").to_string()
    }
}

/// Normalize a row's Date and Start Time cells
///
/// Every whole day contained in the hour value is carried into the date, so
/// the resulting start time is always before 24:00.
pub fn normalize_slot(date: &CellValue, start_time: &CellValue) -> Result<NormalizedSlot, NormalizeError> {
    let date = parse_date(date)?;
    let (hours, minutes) = parse_hours_minutes(start_time)?;

    let invalid_time = || NormalizeError::InvalidTime {
        value: start_time.as_text(),
    };
    let start_time = NaiveTime::from_hms_opt(hours % 24, minutes, 0).ok_or_else(invalid_time)?;
    let date = date
        .checked_add_days(Days::new(u64::from(hours / 24)))
        .ok_or_else(|| NormalizeError::InvalidDate {
            value: date.to_string(),
        })?;

    Ok(NormalizedSlot { date, start_time })
}

fn parse_date(cell: &CellValue) -> Result<NaiveDate, NormalizeError> {
    match cell {
        CellValue::DateTime(dt) => Ok(dt.date()),
        CellValue::String(s) if !s.trim().is_empty() => {
            parse_day_first(s).ok_or_else(|| NormalizeError::InvalidDate { value: s.clone() })
        }
        cell if cell.is_empty() => Err(NormalizeError::MissingValue { field: "Date" }),
        other => Err(NormalizeError::InvalidDate {
            value: other.as_text(),
        }),
    }
}

/// Parse a day-first date, ignoring any trailing time part
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let date_part = text.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_hours_minutes(cell: &CellValue) -> Result<(u32, u32), NormalizeError> {
    match cell {
        CellValue::Time(secs) => Ok((secs / 3600, (secs % 3600) / 60)),
        CellValue::String(s) if !s.trim().is_empty() => {
            let invalid = || NormalizeError::InvalidTime { value: s.clone() };
            let mut parts = s.split(':');
            let (Some(hours), Some(minutes), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(invalid());
            };
            let hours = hours.trim().parse::<u32>().map_err(|_| invalid())?;
            let minutes = minutes.trim().parse::<u32>().map_err(|_| invalid())?;
            Ok((hours, minutes))
        }
        cell if cell.is_empty() => Err(NormalizeError::MissingValue {
            field: "Start Time",
        }),
        other => Err(NormalizeError::InvalidTime {
            value: other.as_text(),
        }),
    }
}
