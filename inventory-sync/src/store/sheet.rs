//! In-memory sheet addressed with 1-based spreadsheet coordinates

use super::value::CellValue;

/// An ordered sequence of cells, one per header position
pub type Row = Vec<CellValue>;

/// A named table inside a workbook
///
/// Row and column numbers are 1-based, the way a spreadsheet user refers to
/// them. Rows shorter than their neighbours are fine: missing trailing cells
/// read as [`CellValue::Empty`].
///
/// Equality compares name and cells only, not the modified flag.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    rows: Vec<Row>,
    /// Set by `write_cell` and `append_row`
    modified: bool,
}

impl PartialEq for Sheet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.rows == other.rows
    }
}

impl Sheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            rows: Vec::new(),
            modified: false,
        }
    }

    /// Create a sheet from rows, the first of which lands on row 1
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Sheet {
            name: name.into(),
            rows,
            modified: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once a cell was written or a row appended since the last
    /// [`Sheet::mark_clean`]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_clean(&mut self) {
        self.modified = false;
    }

    /// Number of the last row holding at least one non-blank cell (0 if none)
    pub fn last_row(&self) -> u32 {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_blank()))
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0)
    }

    /// Width of the widest row
    pub fn last_column(&self) -> u32 {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32
    }

    /// Read a cell; out-of-range coordinates read as empty
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(&EMPTY)
    }

    /// Read a header row as column names.
    ///
    /// Non-text header cells are rendered with their display form, blank
    /// cells become empty names.
    pub fn read_headers(&self, row: u32) -> Vec<String> {
        if row == 0 {
            return Vec::new();
        }
        match self.rows.get(row as usize - 1) {
            Some(cells) => cells.iter().map(|c| c.to_string()).collect(),
            None => Vec::new(),
        }
    }

    /// Read every row from `start_row` through the last non-empty row.
    ///
    /// Rows are padded to [`Sheet::last_column`] so callers can index any
    /// header position without bounds checks.
    pub fn read_data_rows(&self, start_row: u32) -> Vec<Row> {
        let start = start_row.max(1);
        let last = self.last_row();
        if start > last {
            return Vec::new();
        }
        let width = self.last_column() as usize;
        self.rows[(start - 1) as usize..last as usize]
            .iter()
            .map(|r| {
                let mut padded = r.clone();
                padded.resize(width, CellValue::Empty);
                padded
            })
            .collect()
    }

    /// Overwrite a single cell, growing the grid if needed
    pub fn write_cell(&mut self, row: u32, col: u32, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        let (r, c) = (row as usize - 1, col as usize - 1);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, CellValue::Empty);
        }
        cells[c] = value;
        self.modified = true;
    }

    /// Append a row after the last non-empty row and return its row number
    pub fn append_row(&mut self, row: Row) -> u32 {
        let last = self.last_row() as usize;
        self.rows.truncate(last);
        self.rows.push(row);
        self.modified = true;
        self.rows.len() as u32
    }

    /// Iterate `(row, col, value)` for every non-blank cell, 1-based
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| !c.is_blank())
                .map(move |(c, value)| (r as u32 + 1, c as u32 + 1, value))
        })
    }

    /// Raw rows, row 1 first
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
