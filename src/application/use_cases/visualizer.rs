// ============================================================
// VISUALIZER USE CASE
// ============================================================
// Bar chart over the first numeric columns; the table is not touched

use crate::domain::chart::{BarChart, BarSeries, Visualization};
use crate::domain::table::Table;

/// Series drawn at most, taken from the leftmost numeric columns
pub const MAX_CHART_SERIES: usize = 2;

#[derive(Default)]
pub struct Visualizer;

impl Visualizer {
    pub fn new() -> Self {
        Self
    }

    pub fn visualize(&self, table: &Table) -> Visualization {
        let numeric = table.numeric_column_indices();
        if numeric.is_empty() {
            tracing::warn!("No numeric columns available for visualization");
            return Visualization::NoNumericColumns;
        }

        let series = numeric
            .into_iter()
            .take(MAX_CHART_SERIES)
            .map(|index| BarSeries {
                name: table.columns()[index].name.clone(),
                values: table.column_cells(index).map(|c| c.as_number()).collect(),
            })
            .collect();

        Visualization::Chart(BarChart {
            categories: (0..table.row_count()).collect(),
            series,
        })
    }
}
