//! Spreadsheet upload

use super::{IngestPayload, IngestReceipt, UploadPanel, UploadState};
use crate::types::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Extensions the ingest service knows how to read.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "csv"];

/// State of the spreadsheet panel: the selected path as typed and the upload
/// state.
#[derive(Debug, Default)]
pub struct ExcelUpload {
    path: String,
    state: UploadState,
}

impl ExcelUpload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut String {
        &mut self.path
    }

    pub fn select(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn clear_selection(&mut self) {
        self.path.clear();
    }

    fn check_selection(&self) -> AppResult<PathBuf> {
        let raw = self.path.trim();
        if raw.is_empty() {
            return Err(AppError::validation("Please select an Excel file."));
        }

        let path = Path::new(raw);
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported file type: {}. Choose an .xlsx, .xls, .xlsm or .csv file.",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(AppError::validation(format!("File not found: {}", path.display())));
        }

        Ok(path.to_path_buf())
    }
}

impl UploadPanel for ExcelUpload {
    fn state(&self) -> &UploadState {
        &self.state
    }

    fn prepare_submit(&mut self) -> AppResult<IngestPayload> {
        match self.check_selection() {
            Ok(path) => {
                self.state = UploadState::Submitting;
                Ok(IngestPayload::File(path))
            }
            Err(e) => {
                self.state = UploadState::Invalid(e.to_string());
                Err(e)
            }
        }
    }

    fn finish(&mut self, result: &AppResult<IngestReceipt>) {
        if result.is_ok() {
            self.clear_selection();
        }
        self.state = UploadState::finished(result);
    }
}
