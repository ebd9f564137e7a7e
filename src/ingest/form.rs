//! Manual form entry

use super::{IngestPayload, IngestReceipt, UploadPanel, UploadState};
use crate::schema::{JobListing, SchemaField};
use crate::types::{AppError, AppResult};
use serde_json::Value;

/// Draft of one job listing, one string per schema field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormEntry {
    values: [String; SchemaField::COUNT],
}

impl FormEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SchemaField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: SchemaField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn get_mut(&mut self, field: SchemaField) -> &mut String {
        &mut self.values[field.index()]
    }

    /// Every field is non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| !v.trim().is_empty())
    }

    pub fn to_listing(&self) -> JobListing {
        SchemaField::ALL
            .iter()
            .map(|f| (f.key().to_string(), Value::String(self.get(*f).to_string())))
            .collect()
    }
}

/// Ordered list of drafts. Never empty.
#[derive(Debug)]
pub struct FormUpload {
    entries: Vec<FormEntry>,
    state: UploadState,
}

impl Default for FormUpload {
    fn default() -> Self {
        Self::new()
    }
}

impl FormUpload {
    /// Start with one empty entry.
    pub fn new() -> Self {
        Self {
            entries: vec![FormEntry::new()],
            state: UploadState::Idle,
        }
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an empty entry and return its index.
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(FormEntry::new());
        self.entries.len() - 1
    }

    /// Remove the entry at `index`. Removing the only entry leaves a fresh
    /// empty one in its place.
    pub fn remove_entry(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);
        if self.entries.is_empty() {
            self.entries.push(FormEntry::new());
        }
        true
    }

    pub fn edit_field(&mut self, index: usize, field: SchemaField, value: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn field_mut(&mut self, index: usize, field: SchemaField) -> Option<&mut String> {
        self.entries.get_mut(index).map(|e| e.get_mut(field))
    }

    /// Listings for every entry with all fields filled in.
    pub fn complete_listings(&self) -> Vec<JobListing> {
        self.entries
            .iter()
            .filter(|e| e.is_complete())
            .map(FormEntry::to_listing)
            .collect()
    }

    /// Drop every draft and reseed one empty entry.
    pub fn reset(&mut self) {
        self.entries = vec![FormEntry::new()];
    }
}

impl UploadPanel for FormUpload {
    fn state(&self) -> &UploadState {
        &self.state
    }

    fn prepare_submit(&mut self) -> AppResult<IngestPayload> {
        let listings = self.complete_listings();
        if listings.is_empty() {
            let err = AppError::validation("No valid entries to submit.");
            self.state = UploadState::Invalid(err.to_string());
            return Err(err);
        }

        self.state = UploadState::Submitting;
        Ok(IngestPayload::Listings(listings))
    }

    fn finish(&mut self, result: &AppResult<IngestReceipt>) {
        if result.is_ok() {
            self.reset();
        }
        self.state = UploadState::finished(result);
    }
}
