// ============================================================
// SESSION STORE
// ============================================================
// Per-file state for one browser session, one handler per user action

use serde::Serialize;

use crate::application::use_cases::cleaner::Cleaner;
use crate::application::use_cases::column_projector::ColumnProjector;
use crate::application::use_cases::exporter::Exporter;
use crate::application::use_cases::table_loader::TableLoader;
use crate::application::use_cases::visualizer::Visualizer;
use crate::domain::chart::Visualization;
use crate::domain::cleaning::{CleaningOptions, CleaningReport};
use crate::domain::error::{AppError, Result};
use crate::domain::export::{ExportArtifact, ExportRequest};
use crate::domain::file_format::{DetectedFormat, FormatDetector, TabularFormat};
use crate::domain::table::{CellValue, Column, Table};
use crate::domain::uploaded_file::UploadedFile;

/// Everything remembered about one uploaded file
#[derive(Debug, Clone)]
pub struct FileState {
    pub name: String,
    pub format: TabularFormat,
    /// Full table; cleaning mutates it, projection never does
    table: Table,
    /// Selected columns, always valid for `table` and in its column order
    selection: Vec<String>,
    /// Cleaning operations applied so far
    applied: CleaningOptions,
}

impl FileState {
    fn new(name: String, format: TabularFormat, table: Table) -> Self {
        let selection = table.column_names().iter().map(|s| s.to_string()).collect();
        Self {
            name,
            format,
            table,
            selection,
            applied: CleaningOptions::default(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// The table projected onto the selected columns
    pub fn view(&self, projector: &ColumnProjector) -> Result<Table> {
        projector.project(&self.table, &self.selection)
    }

    fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            format: self.format,
            columns: self.table.columns().to_vec(),
            selected_columns: self.selection.clone(),
            row_count: self.table.row_count(),
            cleaning: self.applied,
        }
    }
}

/// What the browser needs to render a file's controls
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub name: String,
    pub format: TabularFormat,
    pub columns: Vec<Column>,
    pub selected_columns: Vec<String>,
    pub row_count: usize,
    pub cleaning: CleaningOptions,
}

/// Leading rows of a file's current view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub file_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
    pub total_rows: usize,
}

/// Files of one session in upload order, keyed by file name
pub struct SessionStore {
    files: Vec<FileState>,
    preview_rows: usize,
    loader: TableLoader,
    cleaner: Cleaner,
    projector: ColumnProjector,
    visualizer: Visualizer,
    exporter: Exporter,
}

impl SessionStore {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            files: Vec::new(),
            preview_rows,
            loader: TableLoader::new(),
            cleaner: Cleaner::new(),
            projector: ColumnProjector::new(),
            visualizer: Visualizer::new(),
            exporter: Exporter::new(),
        }
    }

    /// Detect, load and remember a file. Re-uploading a name replaces its state in place.
    /// Unsupported or unreadable files leave the store untouched.
    pub fn upload(&mut self, file: UploadedFile) -> Result<FileSummary> {
        let format = match FormatDetector::detect(&file.name) {
            DetectedFormat::Supported(format) => format,
            DetectedFormat::Unsupported { extension } => {
                tracing::warn!(file = %file.name, %extension, "Unsupported file format");
                let shown = if extension.is_empty() {
                    "(no extension)".to_string()
                } else {
                    extension
                };
                return Err(AppError::UnsupportedFormat(shown));
            }
        };

        let table = self.loader.load(&file, format)?;
        let state = FileState::new(file.name, format, table);
        let summary = state.summary();

        match self.position(&state.name) {
            Some(index) => self.files[index] = state,
            None => self.files.push(state),
        }

        Ok(summary)
    }

    pub fn files(&self) -> Vec<FileSummary> {
        self.files.iter().map(FileState::summary).collect()
    }

    pub fn file(&self, name: &str) -> Result<&FileState> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| not_found(name))
    }

    pub fn summary(&self, name: &str) -> Result<FileSummary> {
        Ok(self.file(name)?.summary())
    }

    pub fn preview(&self, name: &str) -> Result<TablePreview> {
        let view = self.file(name)?.view(&self.projector)?;

        Ok(TablePreview {
            file_name: name.to_string(),
            columns: view.columns().to_vec(),
            rows: view.head(self.preview_rows).to_vec(),
            total_rows: view.row_count(),
        })
    }

    /// Clean the full table (duplicates first, then means) and record what was applied
    pub fn clean(&mut self, name: &str, options: CleaningOptions) -> Result<CleaningReport> {
        let index = self.position(name).ok_or_else(|| not_found(name))?;
        let state = &mut self.files[index];

        let report = self.cleaner.apply(&mut state.table, &options);
        state.applied = state.applied.union(&options);

        tracing::info!(
            file = %name,
            duplicates_removed = report.duplicates_removed,
            cells_filled = report.cells_filled,
            "Cleaned table"
        );

        Ok(report)
    }

    /// Replace the column selection. A name missing from the table rejects the request
    /// and keeps the previous selection.
    pub fn select_columns(&mut self, name: &str, columns: &[String]) -> Result<FileSummary> {
        let index = self.position(name).ok_or_else(|| not_found(name))?;
        let state = &mut self.files[index];

        let projected = self.projector.project(&state.table, columns)?;
        state.selection = projected
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        Ok(state.summary())
    }

    pub fn visualize(&self, name: &str) -> Result<Visualization> {
        let view = self.file(name)?.view(&self.projector)?;
        Ok(self.visualizer.visualize(&view))
    }

    pub fn convert(&self, name: &str, target: TabularFormat) -> Result<ExportArtifact> {
        let view = self.file(name)?.view(&self.projector)?;
        self.exporter
            .export(&view, &ExportRequest::new(target, name))
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index = self.position(name).ok_or_else(|| not_found(name))?;
        self.files.remove(index);
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name == name)
    }
}

fn not_found(name: &str) -> AppError {
    AppError::NotFound(format!("No uploaded file named '{}'", name))
}
