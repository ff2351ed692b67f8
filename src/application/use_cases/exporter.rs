// ============================================================
// EXPORTER USE CASE
// ============================================================
// Serialize a table in memory and name the download

use crate::domain::error::Result;
use crate::domain::export::{ExportArtifact, ExportRequest};
use crate::domain::file_format::{replace_extension, TabularFormat};
use crate::domain::table::Table;
use crate::infrastructure::csv::CsvWriter;
use crate::infrastructure::xlsx::XlsxWriter;

#[derive(Default)]
pub struct Exporter {
    csv_writer: CsvWriter,
    xlsx_writer: XlsxWriter,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export(&self, table: &Table, request: &ExportRequest) -> Result<ExportArtifact> {
        let bytes = match request.target_format {
            TabularFormat::Csv => self.csv_writer.write_table(table)?,
            TabularFormat::Spreadsheet => self.xlsx_writer.write_table(table)?,
        };

        let file_name = replace_extension(&request.source_file_name, request.target_format);

        tracing::info!(
            source = %request.source_file_name,
            target = %file_name,
            bytes = bytes.len(),
            "Exported table"
        );

        Ok(ExportArtifact {
            bytes,
            file_name,
            mime_type: request.target_format.mime_type().to_string(),
        })
    }
}
