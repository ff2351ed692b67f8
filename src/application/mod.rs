pub mod use_cases;

pub use use_cases::cleaner::Cleaner;
pub use use_cases::column_projector::ColumnProjector;
pub use use_cases::exporter::Exporter;
pub use use_cases::session_store::{FileSummary, SessionStore, TablePreview};
pub use use_cases::table_loader::TableLoader;
pub use use_cases::visualizer::Visualizer;
