// ============================================================
// COLUMN PROJECTOR USE CASE
// ============================================================

use std::collections::HashSet;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

#[derive(Default)]
pub struct ColumnProjector;

impl ColumnProjector {
    pub fn new() -> Self {
        Self
    }

    /// Keep only `requested` columns, in the table's own column order.
    /// Request order and repeats do not matter; an unknown name rejects the whole request.
    pub fn project<S: AsRef<str>>(&self, table: &Table, requested: &[S]) -> Result<Table> {
        let mut wanted = HashSet::with_capacity(requested.len());
        for name in requested {
            let name = name.as_ref();
            if table.column_index(name).is_none() {
                return Err(AppError::ValidationError(format!(
                    "Column '{}' does not exist",
                    name
                )));
            }
            wanted.insert(name);
        }

        let indices: Vec<usize> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| wanted.contains(column.name.as_str()))
            .map(|(index, _)| index)
            .collect();

        Ok(table.select_columns(&indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{CellValue, Column};

    fn table() -> Table {
        Table::new(
            vec![Column::numeric("a"), Column::text("b"), Column::numeric("c")],
            vec![vec![
                CellValue::Number(1.0),
                CellValue::Text("x".to_string()),
                CellValue::Number(3.0),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn test_original_order_wins() {
        let projected = ColumnProjector::new().project(&table(), &["c", "a"]).unwrap();
        assert_eq!(projected.column_names(), vec!["a", "c"]);
        assert_eq!(
            projected.rows()[0],
            vec![CellValue::Number(1.0), CellValue::Number(3.0)]
        );
    }

    #[test]
    fn test_every_subset_keeps_table_order() {
        let source = table();
        let names = ["a", "b", "c"];
        for mask in 0u8..8 {
            let mut subset: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| *n)
                .collect();
            let expected = subset.clone();
            subset.reverse();

            let projected = ColumnProjector::new().project(&source, &subset).unwrap();
            assert_eq!(projected.column_names(), expected);
            assert_eq!(projected.row_count(), source.row_count());
        }
    }

    #[test]
    fn test_repeated_names_are_ignored() {
        let projected = ColumnProjector::new()
            .project(&table(), &["b", "b"])
            .unwrap();
        assert_eq!(projected.column_names(), vec!["b"]);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let source = table();
        let result = ColumnProjector::new().project(&source, &["a", "gone"]);
        match result {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("gone")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(source.column_count(), 3);
    }
}
