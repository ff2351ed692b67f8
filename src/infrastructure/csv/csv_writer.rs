// ============================================================
// CSV WRITER
// ============================================================
// Serialize a table into an in-memory CSV buffer

use csv::WriterBuilder;

use crate::domain::error::AppError;
use crate::domain::table::Table;

/// CSV writer: header row, then one record per row, no index column
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing cells become empty fields, numbers use their shortest decimal form.
    /// A table without columns has no CSV form and is rejected.
    pub fn write_table(&self, table: &Table) -> Result<Vec<u8>, AppError> {
        if table.column_count() == 0 {
            return Err(AppError::ExportError(
                "Cannot write a CSV file without columns".to_string(),
            ));
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer
            .write_record(table.columns().iter().map(|c| c.name.as_str()))
            .map_err(|e| AppError::ExportError(format!("Failed to write CSV header: {}", e)))?;

        for (index, row) in table.rows().iter().enumerate() {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|e| {
                    AppError::ExportError(format!("Failed to write CSV row {}: {}", index + 1, e))
                })?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::ExportError(format!("Failed to flush CSV buffer: {}", e)))
    }
}
