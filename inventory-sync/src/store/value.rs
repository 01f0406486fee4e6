//! Cell value representation shared by every store backend

use calamine::Data;
use chrono::{Duration, NaiveDate};

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell
    #[default]
    Empty,
    /// Text cell
    Text(String),
    /// Numeric cell (integers are stored as whole floats)
    Number(f64),
    /// Boolean cell
    Bool(bool),
    /// Date or time, as an Excel serial (days since 1899-12-30)
    DateTime(f64),
}

impl CellValue {
    /// True for empty cells and empty text.
    ///
    /// This is the "no value" test used both when extracting source fields
    /// and when deciding which candidate fields to write.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Convert a calamine cell into a store value
    pub fn from_data(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            // Error cells are kept as their literal, e.g. "#N/A"
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }

    /// Parse a raw CSV field. CSV carries no types, so everything non-empty is text.
    pub fn from_csv_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_csv_field(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                // Whole numbers print without a trailing ".0"
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) if serial.fract() == 0.0 => write!(f, "{}", dt.format("%Y-%m-%d")),
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{}", serial),
            },
        }
    }
}

fn serial_to_datetime(serial: f64) -> Option<chrono::NaiveDateTime> {
    // Excel's calendar ends on 9999-12-31
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
