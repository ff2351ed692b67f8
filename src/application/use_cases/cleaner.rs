// ============================================================
// CLEANER USE CASE
// ============================================================
// Duplicate-row removal and numeric mean imputation, in place

use std::collections::HashSet;

use crate::domain::cleaning::{CleaningOptions, CleaningReport};
use crate::domain::table::{CellKey, CellValue, Table};

#[derive(Default)]
pub struct Cleaner;

impl Cleaner {
    pub fn new() -> Self {
        Self
    }

    /// Apply the requested operations. Duplicates are always removed before means are
    /// computed, whatever order the user asked in.
    pub fn apply(&self, table: &mut Table, options: &CleaningOptions) -> CleaningReport {
        let mut report = CleaningReport::default();

        if options.remove_duplicates {
            report.duplicates_removed = self.remove_duplicates(table);
        }

        if options.fill_missing_numeric {
            let (filled, left_missing) = self.fill_missing_numeric(table);
            report.cells_filled = filled;
            report.columns_left_missing = left_missing;
        }

        report
    }

    /// Drop every row identical to an earlier one, keeping the first. Returns rows removed.
    pub fn remove_duplicates(&self, table: &mut Table) -> usize {
        let before = table.row_count();

        let keep: Vec<bool> = {
            let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(before);
            table
                .rows()
                .iter()
                .map(|row| seen.insert(row.iter().map(CellValue::key).collect()))
                .collect()
        };

        let mut flags = keep.into_iter();
        table.retain_rows(|_| flags.next().unwrap_or(true));

        let removed = before - table.row_count();
        tracing::debug!(removed, remaining = table.row_count(), "Removed duplicate rows");
        removed
    }

    /// Replace missing cells of numeric columns with the column mean taken before any
    /// replacement. Returns cells filled and the numeric columns that had no data.
    pub fn fill_missing_numeric(&self, table: &mut Table) -> (usize, Vec<String>) {
        let mut filled = 0;
        let mut left_missing = Vec::new();

        for index in table.numeric_column_indices() {
            let (sum, count) = table
                .column_cells(index)
                .filter_map(CellValue::as_number)
                .fold((0.0f64, 0usize), |(sum, count), n| (sum + n, count + 1));

            if count == 0 {
                if table.row_count() > 0 {
                    left_missing.push(table.columns()[index].name.clone());
                }
                continue;
            }

            let mean = sum / count as f64;
            for cell in table.column_cells_mut(index).filter(|c| c.is_missing()) {
                *cell = CellValue::Number(mean);
                filled += 1;
            }
        }

        tracing::debug!(filled, left_missing = left_missing.len(), "Filled missing numeric values");
        (filled, left_missing)
    }
}
