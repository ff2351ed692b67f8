pub mod cleaner;
pub mod column_projector;
pub mod exporter;
pub mod session_store;
pub mod table_loader;
pub mod visualizer;
