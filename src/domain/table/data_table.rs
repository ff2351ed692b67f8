// ============================================================
// TABLE
// ============================================================
// Ordered, uniquely named columns and equally wide rows

use serde::Serialize;
use std::collections::HashSet;

use super::{CellValue, Column, ColumnType};
use crate::domain::error::{AppError, Result};

/// Header row plus untyped cells, exactly as a reader produced them
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// In-memory table. Every row holds one cell per column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from typed columns, rejecting duplicate names and ragged rows
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(AppError::ValidationError(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Normalize headers, square up rows and infer a type for every column.
    /// Cells of numeric columns are converted to numbers; text columns keep raw text.
    pub fn from_raw(raw: RawTable) -> Self {
        let names = normalize_headers(raw.headers);
        let width = names.len();

        let mut rows = raw.rows;
        for row in rows.iter_mut() {
            row.resize(width, CellValue::Missing);
        }

        let mut columns = Vec::with_capacity(width);
        for (index, name) in names.into_iter().enumerate() {
            let kind = ColumnType::infer(rows.iter().map(|row| &row[index]));
            for row in rows.iter_mut() {
                let converted = match (kind, &row[index]) {
                    (ColumnType::Numeric, cell @ CellValue::Text(_)) => {
                        cell.numeric_value().map(CellValue::Number)
                    }
                    // Spreadsheet numbers in a mixed column are kept as their text
                    (ColumnType::Text, CellValue::Number(n)) => Some(CellValue::Text(n.to_string())),
                    _ => None,
                };
                if let Some(value) = converted {
                    row[index] = value;
                }
            }
            columns.push(Column::new(name, kind));
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Positions of the numeric columns, in column order
    pub fn numeric_column_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind.is_numeric())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// First `n` rows (fewer if the table is shorter)
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    pub fn column_cells_mut(&mut self, index: usize) -> impl Iterator<Item = &mut CellValue> + '_ {
        self.rows.iter_mut().map(move |row| &mut row[index])
    }

    /// Keep rows for which `keep` returns true, in order
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        self.rows.retain(|row| keep(row.as_slice()));
    }

    /// New table made of the columns at `indices`, in the order given
    pub fn select_columns(&self, indices: &[usize]) -> Table {
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Table { columns, rows }
    }
}

/// Blank headers become `Unnamed: <index>`, repeats get `.1`, `.2`, ... suffixes
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();

    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                header
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}
