// ============================================================
// CSV READER
// ============================================================
// Decode uploaded bytes and split them into header + cells

use std::borrow::Cow;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{Encoding, UTF_8};

use crate::domain::error::AppError;
use crate::domain::table::{CellValue, RawTable};

/// CSV reader for in-memory uploads
pub struct CsvReader {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    /// Create a new CSV reader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode and parse raw file bytes
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<RawTable, AppError> {
        let content = decode_text(bytes)?;
        self.read_str(&content)
    }

    /// Parse CSV content from string. The first record is the header.
    pub fn read_str(&self, content: &str) -> Result<RawTable, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .flexible(true) // short rows are padded later, long rows rejected below
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let width = headers.len();
        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > width {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }

            rows.push(parse_row(&record));
        }

        Ok(RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        })
    }
}

/// Honour a UTF-8/UTF-16 byte-order mark, otherwise require valid UTF-8
fn decode_text(bytes: &[u8]) -> Result<Cow<'_, str>, AppError> {
    let (encoding, bom_length): (&'static Encoding, usize) =
        Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));

    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
        .ok_or_else(|| {
            AppError::ParseError(format!("File is not valid {} text", encoding.name()))
        })
}

fn parse_row(record: &StringRecord) -> Vec<CellValue> {
    record.iter().map(CellValue::from_field).collect()
}
