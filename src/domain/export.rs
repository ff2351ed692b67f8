// ============================================================
// EXPORT TYPES
// ============================================================

use super::file_format::TabularFormat;

/// What to convert a file into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub target_format: TabularFormat,
    pub source_file_name: String,
}

impl ExportRequest {
    pub fn new(target_format: TabularFormat, source_file_name: impl Into<String>) -> Self {
        Self {
            target_format,
            source_file_name: source_file_name.into(),
        }
    }
}

/// Serialized table ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}
