//! Workbook I/O shared by every pipeline stage
//!
//! Stages hand data to each other through `.xlsx` files. Reading goes through
//! calamine (so `.xls` uploads work too), writing through rust_xlsxwriter.

mod cell;
mod reader;
mod table;
mod writer;

pub use cell::{CellValue, Row, cell_at};
pub use reader::{SheetGrid, read_first_sheet, read_workbook};
pub use table::Table;
pub use writer::{new_workbook, write_cell, write_sheets};
