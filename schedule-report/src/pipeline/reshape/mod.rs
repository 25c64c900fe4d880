//! Stage 2: per-channel reshaping
//!
//! Every sheet of the cleaned workbook is split by channel. Each channel
//! becomes its own worksheet: banner, header, the channel's spots in air
//! order, and a summary row with the spot count. The last worksheet also gets
//! the grand total.

mod layout;
mod normalize;
mod sheet_name;

pub use layout::ChannelSheet;
pub use normalize::{NormalizedSlot, normalize_slot};
use sheet_name::SheetNamer;

use std::path::Path;

use anyhow::{Context, Result, bail};

use super::Stage;
use super::extract::Metadata;
use crate::workbook::{self, CellValue, Row, SheetGrid, Table, cell_at};
use layout::{build_channel_sheet, grand_total};

/// Column names the reshaper reads or writes
pub mod cols {
    pub const CHANNEL: &str = "Channel";
    pub const DATE: &str = "Date";
    pub const START_TIME: &str = "Start Time";
    pub const DURATION: &str = "Duration";
    pub const SPOTS: &str = "No. Of Spots";
    pub const DAY_OF_WEEK: &str = "Day Of Week";
}

const SUMMARY_MARKER: &str = "Summary";

/// What the reshape stage produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeSummary {
    /// (sheet name, channel, spot count) in write order
    pub sheets: Vec<(String, String, usize)>,
    pub total_spots: usize,
}

/// Reshape a cleaned workbook into one worksheet per channel
pub fn transform_by_channel(input: &Path, output: &Path, meta: &Metadata) -> Result<ReshapeSummary> {
    reshape_to_file(input, output, meta).with_context(|| format!("Error in {}", Stage::Reshape))
}

fn reshape_to_file(input: &Path, output: &Path, meta: &Metadata) -> Result<ReshapeSummary> {
    log::info!("Reshaping {} by channel", input.display());
    let source = workbook::read_workbook(input)?;

    let sheets = reshape_sheets(&source, meta)?;
    if sheets.is_empty() {
        bail!("No channel rows found in {}", input.display());
    }

    let grids: Vec<SheetGrid> = sheets
        .iter()
        .map(|s| SheetGrid {
            name: s.name.clone(),
            rows: s.rows.clone(),
        })
        .collect();
    workbook::write_sheets(output, &grids)?;

    let summary = ReshapeSummary {
        total_spots: sheets.iter().map(|s| s.spot_count).sum(),
        sheets: sheets
            .into_iter()
            .map(|s| (s.name, s.channel, s.spot_count))
            .collect(),
    };
    log::info!(
        "Wrote {} channel sheet(s), {} spot(s) in total, to {}",
        summary.sheets.len(),
        summary.total_spots,
        output.display()
    );
    Ok(summary)
}

/// Build the channel sheets for every source sheet, grand total included
pub fn reshape_sheets(source: &[SheetGrid], meta: &Metadata) -> Result<Vec<ChannelSheet>> {
    let mut namer = SheetNamer::new();
    let mut sheets: Vec<ChannelSheet> = Vec::new();
    let mut total_spots = 0;
    let mut last_width = 0;

    for grid in source {
        let Some(table) = Table::from_grid(&grid.rows, 0) else {
            log::warn!("Skipping empty sheet '{}'", grid.name);
            continue;
        };
        let schedule = ScheduleTable::prepare(table, &grid.name)?;

        for group in schedule.group_by_channel() {
            let data = schedule.normalize_group(&group);
            let name = namer.name_for(&group.channel);
            log::debug!(
                "Channel '{}' -> sheet '{}': {} of {} row(s) kept",
                group.channel,
                name,
                data.len(),
                group.rows.len()
            );

            let columns = schedule.output_columns();
            let sheet = build_channel_sheet(
                name,
                &group.channel,
                meta,
                &columns,
                data,
                sheets.is_empty(),
            );
            total_spots += sheet.spot_count;
            last_width = columns.len();
            sheets.push(sheet);
        }
    }

    if let Some(last) = sheets.last_mut() {
        last.rows.push(grand_total(meta, last_width, total_spots));
    }

    Ok(sheets)
}

/// Rows of one channel, in source order
#[derive(Debug, Clone)]
struct ChannelGroup {
    channel: String,
    rows: Vec<Row>,
}

/// A source sheet with the schedule columns located and prepared
#[derive(Debug, Clone)]
struct ScheduleTable {
    table: Table,
    channel: usize,
    date: usize,
    start_time: usize,
    day_of_week: usize,
}

impl ScheduleTable {
    /// Locate columns, cut Duration to minutes, blank the spot column and
    /// drop rows without a usable channel
    fn prepare(mut table: Table, sheet_name: &str) -> Result<Self> {
        let require = |table: &Table, name: &str| {
            table
                .column_index(name)
                .with_context(|| format!("Column '{}' not found in sheet '{}'", name, sheet_name))
        };
        let channel = require(&table, cols::CHANNEL)?;
        let date = require(&table, cols::DATE)?;
        let start_time = require(&table, cols::START_TIME)?;
        let duration = require(&table, cols::DURATION)?;
        let spots = table.ensure_column(cols::SPOTS);
        let day_of_week = table.ensure_column(cols::DAY_OF_WEEK);

        for row in &mut table.rows {
            row[duration] = duration_minutes(&row[duration]);
            row[spots] = CellValue::Empty;
        }

        let before = table.rows.len();
        table.rows.retain(|row| has_channel(&row[channel]));
        log::debug!(
            "Sheet '{}': dropped {} summary/unassigned row(s)",
            sheet_name,
            before - table.rows.len()
        );

        Ok(Self {
            table,
            channel,
            date,
            start_time,
            day_of_week,
        })
    }

    /// Group rows by channel, groups ordered by first appearance
    fn group_by_channel(&self) -> Vec<ChannelGroup> {
        let mut groups: Vec<ChannelGroup> = Vec::new();
        for row in &self.table.rows {
            let channel = cell_at(row, self.channel).as_text();
            match groups.iter_mut().find(|g| g.channel == channel) {
                Some(group) => group.rows.push(row.clone()),
                None => groups.push(ChannelGroup {
                    channel,
                    rows: vec![row.clone()],
                }),
            }
        }
        groups
    }

    /// Normalize, drop unparseable rows, sort by air time and project to the
    /// output columns
    fn normalize_group(&self, group: &ChannelGroup) -> Vec<Row> {
        let mut slots: Vec<(NormalizedSlot, &Row)> = group
            .rows
            .iter()
            .filter_map(|row| {
                match normalize_slot(&row[self.date], &row[self.start_time]) {
                    Ok(slot) => Some((slot, row)),
                    Err(err) => {
                        log::debug!("Dropping row for channel '{}': {}", group.channel, err);
                        None
                    }
                }
            })
            .collect();

        // stable: rows in the same slot keep their source order
        slots.sort_by_key(|(slot, _)| *slot);

        slots
            .into_iter()
            .map(|(slot, row)| {
                let mut row = row.clone();
                row[self.date] = CellValue::text(slot.date_text());
                row[self.start_time] = CellValue::text(slot.start_time_text());
                row[self.day_of_week] = CellValue::text(slot.day_of_week());
                self.project(row)
            })
            .collect()
    }

    /// Every column except Channel, in table order
    fn output_columns(&self) -> Vec<String> {
        self.table
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != self.channel)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn project(&self, row: Row) -> Row {
        row.into_iter()
            .enumerate()
            .filter(|(idx, _)| *idx != self.channel)
            .map(|(_, cell)| cell)
            .collect()
    }
}

/// Keep only the minutes part of a duration ("00:30" -> "30")
fn duration_minutes(cell: &CellValue) -> CellValue {
    if cell.is_empty() {
        return CellValue::Empty;
    }
    let text = cell.as_text();
    let minutes = text.rsplit(':').next().unwrap_or_default();
    CellValue::text(minutes)
}

fn has_channel(cell: &CellValue) -> bool {
    match cell {
        CellValue::String(s) => !s.is_empty() && !s.contains(SUMMARY_MARKER),
        other => !other.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::layout::COUNT_COL;

    const HEADER: [&str; 9] = [
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

    fn meta() -> Metadata {
        Metadata {
            brand: "Acme".to_string(),
            copyline: "Spring Promo".to_string(),
        }
    }

    fn text_row(cells: &[&str]) -> Row {
        cells.iter().map(|c| CellValue::text(*c)).collect()
    }

    fn spot(channel: &str, date: &str, time: &str) -> Row {
        text_row(&[channel, "", date, time, "1", "F", "00:30", "News", "1"])
    }

    fn sheet(rows: Vec<Row>) -> SheetGrid {
        let mut all = vec![text_row(&HEADER)];
        all.extend(rows);
        SheetGrid {
            name: "Sheet1".to_string(),
            rows: all,
        }
    }

    fn data_rows(sheet: &ChannelSheet, banner_rows: usize) -> &[Row] {
        // banners + header before, summary after
        &sheet.rows[banner_rows + 1..banner_rows + 1 + sheet.spot_count]
    }

    #[test]
    fn test_wraparound_scenario() {
        let source = vec![sheet(vec![
            spot("CH1", "01/01/2024", "25:30"),
            spot("CH1", "01/01/2024", "23:00"),
        ])];
        let sheets = reshape_sheets(&source, &meta()).unwrap();

        assert_eq!(sheets.len(), 1);
        let ch1 = &sheets[0];
        assert_eq!(ch1.spot_count, 2);

        let rows = data_rows(ch1, 2);
        // columns after dropping Channel: Day, Date, Start Time, ...
        assert_eq!(rows[0][1], CellValue::text("01/01/2024"));
        assert_eq!(rows[0][2], CellValue::text("23:00"));
        assert_eq!(rows[0][0], CellValue::text("Mon"));
        assert_eq!(rows[1][1], CellValue::text("02/01/2024"));
        assert_eq!(rows[1][2], CellValue::text("01:30"));
        assert_eq!(rows[1][0], CellValue::text("Tue"));
    }

    #[test]
    fn test_unparseable_rows_dropped_from_count() {
        let source = vec![sheet(vec![
            spot("CH1", "01/01/2024", "10:00"),
            spot("CH1", "01/01/2024", "abc"),
            spot("CH1", "not a date", "09:00"),
            spot("CH1", "01/01/2024", "08:00"),
        ])];
        let sheets = reshape_sheets(&source, &meta()).unwrap();
        let ch1 = &sheets[0];

        assert_eq!(ch1.spot_count, 2);
        let rows = data_rows(ch1, 2);
        assert_eq!(rows[0][2], CellValue::text("08:00"));
        assert_eq!(rows[1][2], CellValue::text("10:00"));

        let summary = &ch1.rows[ch1.rows.len() - 2];
        assert_eq!(summary[COUNT_COL], CellValue::text("Total 2 Spots"));
    }

    #[test]
    fn test_two_channels_grand_total_on_last_sheet() {
        let mut rows = Vec::new();
        for i in 0..3 {
            rows.push(spot("CH1", "01/01/2024", &format!("1{}:00", i)));
        }
        for i in 0..5 {
            rows.push(spot("CH2", "02/01/2024", &format!("0{}:15", i)));
        }
        let sheets = reshape_sheets(&[sheet(rows)], &meta()).unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "CH1");
        assert_eq!(sheets[1].name, "CH2");
        assert_eq!(sheets[0].spot_count, 3);
        assert_eq!(sheets[1].spot_count, 5);

        // first sheet: global banner + channel banner + header + 3 + summary
        assert_eq!(sheets[0].rows.len(), 7);
        assert_eq!(sheets[0].rows[0][0], CellValue::text("Acme"));

        // last sheet: banner + header + 5 + summary + grand total
        let ch2 = &sheets[1];
        assert_eq!(ch2.rows.len(), 9);
        let total = ch2.rows.last().unwrap();
        assert_eq!(total[0], CellValue::text("Brand : Acme"));
        assert_eq!(total[COUNT_COL], CellValue::text("Grand Total 8 Spots"));
    }

    #[test]
    fn test_sort_is_stable_and_chronological() {
        let mut a = spot("CH1", "02/01/2024", "10:00");
        a[7] = CellValue::text("First");
        let mut b = spot("CH1", "02/01/2024", "10:00");
        b[7] = CellValue::text("Second");
        let source = vec![sheet(vec![
            a,
            spot("CH1", "01/01/2024", "26:00"),
            b,
            spot("CH1", "01/01/2024", "12:00"),
        ])];

        let sheets = reshape_sheets(&source, &meta()).unwrap();
        let rows = data_rows(&sheets[0], 2);
        let order: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r[1].as_text(), r[2].as_text()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("01/01/2024".to_string(), "12:00".to_string()),
                ("02/01/2024".to_string(), "02:00".to_string()),
                ("02/01/2024".to_string(), "10:00".to_string()),
                ("02/01/2024".to_string(), "10:00".to_string()),
            ]
        );
        assert_eq!(rows[2][6], CellValue::text("First"));
        assert_eq!(rows[3][6], CellValue::text("Second"));
    }

    #[test]
    fn test_summary_and_blank_channels_dropped() {
        let source = vec![sheet(vec![
            spot("CH1", "01/01/2024", "10:00"),
            spot("Summary CH1", "01/01/2024", "10:00"),
            spot("", "01/01/2024", "10:00"),
            // lowercase "summary" is a real channel name here
            spot("summary tv", "01/01/2024", "10:00"),
        ])];
        let sheets = reshape_sheets(&source, &meta()).unwrap();
        let names: Vec<&str> = sheets.iter().map(|s| s.channel.as_str()).collect();
        assert_eq!(names, vec!["CH1", "summary tv"]);
    }

    #[test]
    fn test_duration_and_spots_columns() {
        let source = vec![sheet(vec![spot("CH1", "01/01/2024", "10:00")])];
        let sheets = reshape_sheets(&source, &meta()).unwrap();
        let row = &data_rows(&sheets[0], 2)[0];
        assert_eq!(row[5], CellValue::text("30"));
        assert_eq!(row[7], CellValue::Empty);
        assert_eq!(row.len(), 8);
    }

    #[test]
    fn test_missing_columns_are_appended() {
        let source = vec![SheetGrid {
            name: "Sheet1".to_string(),
            rows: vec![
                text_row(&["Channel", "Date", "Start Time", "Duration"]),
                text_row(&["CH1", "05/01/2024", "07:00", "1:00:15"]),
            ],
        }];
        let sheets = reshape_sheets(&source, &meta()).unwrap();
        let header = &sheets[0].rows[2];
        assert_eq!(
            header,
            &text_row(&["Date", "Start Time", "Duration", "No. Of Spots", "Day Of Week"])
        );
        let row = &sheets[0].rows[3];
        assert_eq!(row[2], CellValue::text("15"));
        assert_eq!(row[4], CellValue::text("Fri"));
    }

    #[test]
    fn test_missing_required_column_is_error() {
        let source = vec![SheetGrid {
            name: "Sheet1".to_string(),
            rows: vec![text_row(&["Channel", "Date", "Start Time"])],
        }];
        let err = reshape_sheets(&source, &meta()).unwrap_err();
        assert!(err.to_string().contains("Duration"));
    }

    #[test]
    fn test_channel_without_valid_rows_still_gets_sheet() {
        let source = vec![sheet(vec![
            spot("CH1", "01/01/2024", "10:00"),
            spot("CH2", "01/01/2024", "bad"),
        ])];
        let sheets = reshape_sheets(&source, &meta()).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].spot_count, 0);
        let total = sheets[1].rows.last().unwrap();
        assert_eq!(total[COUNT_COL], CellValue::text("Grand Total 1 Spots"));
    }

    #[test]
    fn test_global_banner_only_once_across_source_sheets() {
        let source = vec![
            sheet(vec![spot("CH1", "01/01/2024", "10:00")]),
            sheet(vec![spot("CH2", "01/01/2024", "10:00")]),
        ];
        let sheets = reshape_sheets(&source, &meta()).unwrap();
        assert_eq!(sheets[0].rows[0][0], CellValue::text("Acme"));
        assert_eq!(sheets[1].rows[0][0], CellValue::text("CH2"));
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(duration_minutes(&CellValue::text("00:30")), CellValue::text("30"));
        assert_eq!(duration_minutes(&CellValue::text("45")), CellValue::text("45"));
        assert_eq!(duration_minutes(&CellValue::Float(15.0)), CellValue::text("15"));
        assert_eq!(duration_minutes(&CellValue::Time(30)), CellValue::text("30"));
        assert_eq!(duration_minutes(&CellValue::Empty), CellValue::Empty);
    }
}
