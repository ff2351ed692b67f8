// ============================================================
// CELL VALUE
// ============================================================
// A single table cell: number, text, or missing

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Field spellings read as "no data", compared exactly (no trimming)
static MISSING_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
        "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .collect()
});

/// Value stored in one cell of a [`super::Table`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Serialized as JSON `null`
    Missing,
}

impl CellValue {
    /// Build a cell from a raw text field, recognising missing-value tokens
    pub fn from_field(raw: &str) -> Self {
        if MISSING_TOKENS.contains(raw) {
            CellValue::Missing
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric reading of the cell: numbers as-is, text when it parses as a finite number
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_number(s),
            CellValue::Missing => None,
        }
    }

    /// Hashable identity used for whole-row comparison
    pub fn key(&self) -> CellKey<'_> {
        match self {
            // -0.0 and 0.0 compare equal, so they must hash equal too
            CellValue::Number(n) if *n == 0.0 => CellKey::Number(0.0f64.to_bits()),
            CellValue::Number(n) => CellKey::Number(n.to_bits()),
            CellValue::Text(s) => CellKey::Text(s),
            CellValue::Missing => CellKey::Missing,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => Ok(()),
        }
    }
}

/// Borrowed, hashable form of a [`CellValue`]. Missing equals missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
    Missing,
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
