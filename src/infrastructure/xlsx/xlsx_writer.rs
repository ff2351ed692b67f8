// ============================================================
// XLSX WRITER
// ============================================================
// Serialize a table into a single-sheet workbook held in memory

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::error::AppError;
use crate::domain::table::{CellValue, Table};

/// Workbook writer: bold header row, one sheet, no index column
pub struct XlsxWriter {
    sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
        }
    }
}

impl XlsxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_table(&self, table: &Table) -> Result<Vec<u8>, AppError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.as_str()).map_err(to_export_error)?;

        for (col, column) in table.columns().iter().enumerate() {
            let col = column_number(col)?;
            worksheet
                .write_string_with_format(0, col, column.name.as_str(), &header_format)
                .map_err(to_export_error)?;
        }

        for (index, row) in table.rows().iter().enumerate() {
            // Header occupies the first sheet row
            let sheet_row = u32::try_from(index + 1).map_err(|_| too_many_rows(index))?;

            for (col, cell) in row.iter().enumerate() {
                let col = column_number(col)?;
                match cell {
                    CellValue::Number(n) => {
                        worksheet
                            .write_number(sheet_row, col, *n)
                            .map_err(to_export_error)?;
                    }
                    CellValue::Text(s) => {
                        worksheet
                            .write_string(sheet_row, col, s.as_str())
                            .map_err(to_export_error)?;
                    }
                    CellValue::Missing => {}
                }
            }
        }

        workbook.save_to_buffer().map_err(to_export_error)
    }
}

fn column_number(index: usize) -> Result<u16, AppError> {
    u16::try_from(index).map_err(|_| {
        AppError::ExportError(format!("Column {} exceeds the worksheet column limit", index + 1))
    })
}

fn too_many_rows(index: usize) -> AppError {
    AppError::ExportError(format!("Row {} exceeds the worksheet row limit", index + 1))
}

fn to_export_error(err: XlsxError) -> AppError {
    AppError::ExportError(format!("Failed to write Excel file: {}", err))
}
