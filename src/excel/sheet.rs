//! In-memory worksheet grid and cell normalization shared by header detection and extraction.

use crate::error::{StockError, StockResult};
use calamine::{Data, DataType, Range};

/// Which cell values a workbook pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// Values from the formula cache (what Excel last computed).
    Cached,
    /// Formula text for formula cells, literal values everywhere else.
    Raw,
}

impl std::fmt::Display for ValueMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueMode::Cached => write!(f, "cached"),
            ValueMode::Raw => write!(f, "raw"),
        }
    }
}

/// A worksheet as a dense grid addressed with 1-based `(row, column)` like Excel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Data>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet whose first vector is row 1 and first cell is column A.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Copy a calamine range, keeping absolute positions (a range may start below A1).
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        let mut sheet = Self::new(name);
        if let Some((start_row, start_col)) = range.start() {
            for (row, col, value) in range.used_cells() {
                sheet.set(
                    start_row + row as u32 + 1,
                    start_col + col as u32 + 1,
                    value.clone(),
                );
            }
        }
        sheet
    }

    /// Replace every cell holding a formula with its `=FORMULA` text.
    pub fn overlay_formulas(&mut self, formulas: &Range<String>) {
        if let Some((start_row, start_col)) = formulas.start() {
            for (row, col, formula) in formulas.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                let text = if formula.starts_with('=') {
                    formula.clone()
                } else {
                    format!("={}", formula)
                };
                self.set(
                    start_row + row as u32 + 1,
                    start_col + col as u32 + 1,
                    Data::String(text),
                );
            }
        }
    }

    /// Set a cell, growing the grid as needed. `row` and `col` are 1-based.
    pub fn set(&mut self, row: u32, col: u32, value: Data) {
        if row == 0 || col == 0 {
            return;
        }
        let (r, c) = ((row - 1) as usize, (col - 1) as usize);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, Data::Empty);
        }
        cells[c] = value;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the last row holding any cell (the sheet's max row); 0 for an empty sheet.
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Data> {
        if row == 0 || col == 0 {
            return None;
        }
        self.rows
            .get((row - 1) as usize)
            .and_then(|cells| cells.get((col - 1) as usize))
    }

    /// Normalized values of `columns` in `row`.
    pub fn row_values(&self, row: u32, columns: &[u32]) -> Vec<String> {
        columns
            .iter()
            .map(|&col| normalize_cell(self.cell(row, col)))
            .collect()
    }
}

/// Normalize a cell to a trimmed string.
///
/// Missing cells, `nan` and `none` become empty, and a trailing `.0` left by
/// numbers stored as text is stripped.
pub fn normalize_cell(cell: Option<&Data>) -> String {
    let raw = match cell {
        None | Some(Data::Empty) => return String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Bool(true)) => "TRUE".to_string(),
        Some(Data::Bool(false)) => "FALSE".to_string(),
        Some(cell @ Data::DateTime(_)) => match cell.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => s.clone(),
        Some(Data::Error(e)) => e.to_string(),
    };
    clean_str(&raw)
}

pub fn clean_str(value: &str) -> String {
    let s = value.trim();
    if s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("none") {
        return String::new();
    }
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

/// Convert a column letter to its 1-based index (A→1, J→10, AA→27).
pub fn column_index(letters: &str) -> StockResult<u32> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(StockError::Config("Empty column letter".to_string()));
    }
    letters.chars().try_fold(0u32, |acc, ch| {
        if !ch.is_ascii_alphabetic() {
            return Err(StockError::Config(format!(
                "Invalid column letter: {}",
                letters
            )));
        }
        let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        acc.checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .filter(|v| *v <= 16_384)
            .ok_or_else(|| StockError::Config(format!("Column out of range: {}", letters)))
    })
}

/// Convert a 1-based column index to its letter (1→A, 27→AA).
pub fn column_letter(index: u32) -> String {
    let mut result = String::new();
    let mut num = index;
    while num > 0 {
        let remainder = (num - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        num = (num - 1) / 26;
    }
    result
}
