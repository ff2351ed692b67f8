// ============================================================
// CHART TYPES
// ============================================================
// Bar chart data handed to the browser (or the SVG renderer)

use serde::Serialize;

pub const NO_NUMERIC_COLUMNS_WARNING: &str = "No numeric columns available for visualization.";

/// One bar per row for a single numeric column; `None` leaves a gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Grouped bar chart. Categories are row positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub categories: Vec<usize>,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    /// Smallest and largest plotted value, if any bar exists
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Outcome of a visualization request
#[derive(Debug, Clone, PartialEq)]
pub enum Visualization {
    Chart(BarChart),
    /// Nothing numeric to plot; the caller shows a warning
    NoNumericColumns,
}

impl Visualization {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Visualization::Chart(_) => None,
            Visualization::NoNumericColumns => Some(NO_NUMERIC_COLUMNS_WARNING),
        }
    }
}
