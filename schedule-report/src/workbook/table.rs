//! Header-plus-rows view of a sheet

use super::cell::{CellValue, Row};

/// A sheet region read with its own header row
///
/// Columns are named by the header cells; an empty header cell is named
/// `Unnamed: <col>`. Every row is padded to the header width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build a table from a grid, using `header_row` as the column names
    ///
    /// Rows above the header are ignored. Returns `None` when the grid has no
    /// row at `header_row`.
    pub fn from_grid(grid: &[Row], header_row: usize) -> Option<Self> {
        let header = grid.get(header_row)?;
        let body = &grid[header_row + 1..];

        let width = body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let columns = (0..width)
            .map(|col| match header.get(col) {
                Some(cell) if !cell.is_empty() => cell.as_text(),
                _ => format!("Unnamed: {}", col),
            })
            .collect();

        let rows = body
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Some(Self { columns, rows })
    }

    /// Find a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Find a column by name, appending an empty one when it doesn't exist
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }

    /// Header row followed by the data rows
    pub fn to_grid(&self) -> Vec<Row> {
        let header: Row = self.columns.iter().map(|c| CellValue::text(c.as_str())).collect();
        std::iter::once(header).chain(self.rows.iter().cloned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Row {
        cells.iter().map(|c| CellValue::text(*c)).collect()
    }

    #[test]
    fn test_from_grid_skips_rows_above_header() {
        let grid = vec![
            text_row(&["junk"]),
            text_row(&["Channel", "Date"]),
            text_row(&["CH1", "01/01/2024"]),
        ];
        let table = Table::from_grid(&grid, 1).unwrap();
        assert_eq!(table.columns, vec!["Channel", "Date"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_unnamed_columns_and_padding() {
        let grid = vec![
            text_row(&["A", ""]),
            text_row(&["1"]),
            text_row(&["1", "2", "3"]),
        ];
        let table = Table::from_grid(&grid, 0).unwrap();
        assert_eq!(table.columns, vec!["A", "Unnamed: 1", "Unnamed: 2"]);
        assert!(table.rows.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_missing_header_row() {
        let grid = vec![text_row(&["A"])];
        assert!(Table::from_grid(&grid, 3).is_none());
    }

    #[test]
    fn test_ensure_column_appends_once() {
        let grid = vec![text_row(&["A"]), text_row(&["1"])];
        let mut table = Table::from_grid(&grid, 0).unwrap();
        assert_eq!(table.ensure_column("B"), 1);
        assert_eq!(table.ensure_column("B"), 1);
        assert_eq!(table.ensure_column("A"), 0);
        assert_eq!(table.rows[0], vec![CellValue::text("1"), CellValue::Empty]);
    }
}
