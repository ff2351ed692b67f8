// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Rows x named columns, the unit every pipeline stage works on
// No I/O, no async

mod cell_value;
mod column;
mod data_table;

pub use cell_value::{CellKey, CellValue};
pub use column::{Column, ColumnType};
pub use data_table::{RawTable, Table};
