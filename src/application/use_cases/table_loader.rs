// ============================================================
// TABLE LOADER USE CASE
// ============================================================
// Turn the bytes of a classified upload into a typed table

use crate::domain::error::Result;
use crate::domain::file_format::TabularFormat;
use crate::domain::table::Table;
use crate::domain::uploaded_file::UploadedFile;
use crate::infrastructure::csv::CsvReader;
use crate::infrastructure::xlsx::XlsxReader;

#[derive(Default)]
pub struct TableLoader {
    csv_reader: CsvReader,
    xlsx_reader: XlsxReader,
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `file` as `format`. Either the whole table loads or a `ParseError` is returned.
    pub fn load(&self, file: &UploadedFile, format: TabularFormat) -> Result<Table> {
        let raw = match format {
            TabularFormat::Csv => self.csv_reader.read_bytes(&file.bytes),
            TabularFormat::Spreadsheet => self.xlsx_reader.read_bytes(&file.bytes),
        }
        .map_err(|e| {
            tracing::warn!(file = %file.name, %format, error = %e, "Failed to parse upload");
            e
        })?;

        let table = Table::from_raw(raw);

        tracing::info!(
            file = %file.name,
            %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded table"
        );

        Ok(table)
    }
}
