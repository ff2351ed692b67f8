pub mod chart;
pub mod cleaning;
pub mod error;
pub mod export;
pub mod file_format;
pub mod uploaded_file;

// Tabular data model
pub mod table;
