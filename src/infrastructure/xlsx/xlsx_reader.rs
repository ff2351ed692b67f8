// ============================================================
// XLSX READER
// ============================================================
// Read the first worksheet of an uploaded workbook

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::error::AppError;
use crate::domain::table::{CellValue, RawTable};

/// Workbook reader backed by calamine
#[derive(Default)]
pub struct XlsxReader;

impl XlsxReader {
    pub fn new() -> Self {
        Self
    }

    /// First row of the first sheet is the header; an empty sheet gives an empty table
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<RawTable, AppError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
            .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

        let mut rows = range.rows();

        let headers = match rows.next() {
            Some(row) => row.iter().map(header_text).collect(),
            None => return Ok(RawTable::default()),
        };

        let rows = rows
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        Ok(RawTable { headers, rows })
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Native numbers stay numbers, blanks and error cells are missing,
/// strings follow the CSV field rules, anything else keeps its display text
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) if f.is_finite() => CellValue::Number(*f),
        Data::String(s) => CellValue::from_field(s),
        other => CellValue::Text(other.to_string()),
    }
}
