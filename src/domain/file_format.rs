// ============================================================
// FILE FORMAT
// ============================================================
// Extension-based classification of uploaded files

use serde::{Deserialize, Serialize};

pub const CSV_MIME_TYPE: &str = "text/csv";
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Tabular formats that can be loaded and exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabularFormat {
    Csv,
    /// Office Open XML workbook (`.xlsx`)
    #[serde(alias = "xlsx", alias = "excel")]
    Spreadsheet,
}

impl TabularFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            TabularFormat::Csv => "csv",
            TabularFormat::Spreadsheet => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            TabularFormat::Csv => CSV_MIME_TYPE,
            TabularFormat::Spreadsheet => XLSX_MIME_TYPE,
        }
    }
}

impl std::fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabularFormat::Csv => write!(f, "CSV"),
            TabularFormat::Spreadsheet => write!(f, "Excel"),
        }
    }
}

/// Outcome of looking at a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedFormat {
    Supported(TabularFormat),
    /// Lowercased extension including the dot, empty when the name has none
    Unsupported { extension: String },
}

/// Classifies files by their lowercased extension only; content is never inspected
pub struct FormatDetector;

impl FormatDetector {
    pub fn detect(file_name: &str) -> DetectedFormat {
        let extension = file_extension(file_name);

        match extension.as_str() {
            ".csv" => DetectedFormat::Supported(TabularFormat::Csv),
            ".xlsx" => DetectedFormat::Supported(TabularFormat::Spreadsheet),
            _ => DetectedFormat::Unsupported { extension },
        }
    }
}

/// Lowercased final extension with its dot (`"Report.CSV"` -> `".csv"`).
/// Dot-files such as `.csv` have no extension.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(index) if index > 0 => file_name[index..].to_lowercase(),
        _ => String::new(),
    }
}

/// Source name with its final extension swapped for the target format's
pub fn replace_extension(file_name: &str, format: TabularFormat) -> String {
    let stem = match file_name.rfind('.') {
        Some(index) if index > 0 => &file_name[..index],
        _ => file_name,
    };

    format!("{}.{}", stem, format.extension())
}
