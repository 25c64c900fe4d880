//! Row layout of a channel sheet
//!
//! ```text
//! [Brand, , , , , , Copyline]                  global banner (first sheet only)
//! [Channel, "Brand : X", , , , , Copyline]     channel banner
//! [column names...]                            header
//! [data rows...]
//! [Channel, "Brand : X", , , , , "Total N Spots"]
//! [grand total row]                            last sheet only
//! ```
//!
//! The formatter relies on these offsets: its label row is row 2 on the
//! first sheet and row 1 on every other sheet.

use crate::pipeline::extract::Metadata;
use crate::workbook::{CellValue, Row};

/// Column that carries the Copyline and the spot counts
pub const COUNT_COL: usize = 6;
/// Minimum width of banner and total rows
const MIN_WIDTH: usize = COUNT_COL + 1;

/// One channel's worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSheet {
    pub name: String,
    pub channel: String,
    pub rows: Vec<Row>,
    /// Data rows emitted for the channel
    pub spot_count: usize,
}

fn brand_label(meta: &Metadata) -> String {
    format!("Brand : {}", meta.brand)
}

fn blank_row(width: usize) -> Row {
    vec![CellValue::Empty; width.max(MIN_WIDTH)]
}

/// Leading banner of the whole workbook
pub fn global_banner(meta: &Metadata) -> Row {
    let mut row = blank_row(MIN_WIDTH);
    row[0] = CellValue::text(meta.brand.as_str());
    row[COUNT_COL] = CellValue::text(meta.copyline.as_str());
    row
}

/// Banner above a channel's header row
pub fn channel_banner(channel: &str, meta: &Metadata) -> Row {
    let mut row = blank_row(MIN_WIDTH);
    row[0] = CellValue::text(channel);
    row[1] = CellValue::text(brand_label(meta));
    row[COUNT_COL] = CellValue::text(meta.copyline.as_str());
    row
}

/// Closing row of a channel block
pub fn channel_summary(channel: &str, meta: &Metadata, width: usize, count: usize) -> Row {
    let mut row = blank_row(width);
    row[0] = CellValue::text(channel);
    row[1] = CellValue::text(brand_label(meta));
    row[COUNT_COL] = CellValue::text(format!("Total {} Spots", count));
    row
}

/// Row appended once, below the last sheet's final row
pub fn grand_total(meta: &Metadata, width: usize, total: usize) -> Row {
    let mut row = blank_row(width);
    row[0] = CellValue::text(brand_label(meta));
    row[COUNT_COL] = CellValue::text(format!("Grand Total {} Spots", total));
    row
}

/// Assemble a channel sheet from its header and sorted data rows
pub fn build_channel_sheet(
    name: String,
    channel: &str,
    meta: &Metadata,
    columns: &[String],
    data: Vec<Row>,
    with_global_banner: bool,
) -> ChannelSheet {
    let spot_count = data.len();
    let mut rows = Vec::with_capacity(data.len() + 4);

    if with_global_banner {
        rows.push(global_banner(meta));
    }
    rows.push(channel_banner(channel, meta));
    rows.push(columns.iter().map(|c| CellValue::text(c.as_str())).collect());
    rows.extend(data);
    rows.push(channel_summary(channel, meta, columns.len(), spot_count));

    ChannelSheet {
        name,
        channel: channel.to_string(),
        rows,
        spot_count,
    }
}
