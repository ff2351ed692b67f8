// ============================================================
// CLEANING OPTIONS
// ============================================================
// Per-file cleaning choices and what applying them changed

use serde::{Deserialize, Serialize};

/// Cleaning operations requested for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningOptions {
    /// Drop rows identical to an earlier row
    #[serde(default)]
    pub remove_duplicates: bool,

    /// Replace missing numeric cells with their column mean
    #[serde(default)]
    pub fill_missing_numeric: bool,
}

impl CleaningOptions {
    pub fn new(remove_duplicates: bool, fill_missing_numeric: bool) -> Self {
        Self {
            remove_duplicates,
            fill_missing_numeric,
        }
    }

    /// True when no operation is requested
    pub fn is_empty(&self) -> bool {
        !self.remove_duplicates && !self.fill_missing_numeric
    }

    /// Options that are set in either `self` or `other`
    pub fn union(&self, other: &CleaningOptions) -> CleaningOptions {
        CleaningOptions {
            remove_duplicates: self.remove_duplicates || other.remove_duplicates,
            fill_missing_numeric: self.fill_missing_numeric || other.fill_missing_numeric,
        }
    }
}

/// Result of a cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningReport {
    /// Rows dropped as duplicates
    pub duplicates_removed: usize,

    /// Missing numeric cells replaced by a mean
    pub cells_filled: usize,

    /// Numeric columns with no data to average, left missing
    pub columns_left_missing: Vec<String>,
}

impl CleaningReport {
    /// Activity log line for the operations in `options`
    pub fn summary(&self, options: &CleaningOptions) -> String {
        let mut parts = Vec::new();
        if options.remove_duplicates {
            parts.push(format!("{} duplicate row(s) removed", self.duplicates_removed));
        }
        if options.fill_missing_numeric {
            parts.push(format!("{} missing value(s) filled", self.cells_filled));
        }
        parts.join("; ")
    }
}
