use serde::Serialize;

use super::CellValue;

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Numeric when there is at least one cell and every non-missing cell reads as a number.
    /// A column with rows but no data at all is numeric; a column without rows is text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut seen_any = false;

        for cell in cells {
            seen_any = true;
            if !cell.is_missing() && cell.numeric_value().is_none() {
                return ColumnType::Text;
            }
        }

        if seen_any {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        }
    }
}

/// Named, typed column header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Numeric)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }
}
