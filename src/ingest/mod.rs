//! Ingest Module
//!
//! The three ways of sending job listings to the ingest service: pasted JSON,
//! manual form entries and a spreadsheet file. Each panel owns its own state
//! and walks the same upload state machine:
//!
//! ```text
//! Idle → Invalid
//!      → Valid → Submitting → Succeeded
//!                           → ServerFailed
//!                           → NetworkFailed
//! ```
//!
//! Validation is synchronous, so there is no observable in-between state.
//!
//! Every end state except `Succeeded` is recovered from by fixing the input
//! and submitting again.

pub mod client;
pub mod excel;
pub mod form;
pub mod json;

pub use client::{IngestBackend, IngestClient, IngestReceipt, UploadFile};
pub use excel::ExcelUpload;
pub use form::{FormEntry, FormUpload};
pub use json::{validate_listings, JsonUpload, JsonValidation};

use crate::schema::JobListing;
use crate::status::StatusLine;
use crate::types::{AppError, AppResult};
use std::path::PathBuf;

/// Which upload panel is visible. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    #[default]
    Json,
    Form,
    Excel,
}

impl UploadMode {
    pub const ALL: [UploadMode; 3] = [UploadMode::Json, UploadMode::Form, UploadMode::Excel];

    pub fn label(self) -> &'static str {
        match self {
            UploadMode::Json => "JSON",
            UploadMode::Form => "Form",
            UploadMode::Excel => "Excel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Invalid(String),
    Valid {
        valid: usize,
        invalid: usize,
    },
    Submitting,
    Succeeded(String),
    ServerFailed {
        status: u16,
        body: String,
    },
    NetworkFailed(String),
}

impl UploadState {
    /// State after a submission has finished.
    pub fn finished(result: &AppResult<IngestReceipt>) -> Self {
        match result {
            Ok(receipt) => UploadState::Succeeded(receipt.message.clone()),
            Err(AppError::Validation(msg)) => UploadState::Invalid(msg.clone()),
            Err(AppError::Server { status, body }) => UploadState::ServerFailed {
                status: *status,
                body: body.clone(),
            },
            Err(AppError::Network(msg)) => UploadState::NetworkFailed(msg.clone()),
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, UploadState::Submitting)
    }

    pub fn status_line(&self) -> Option<StatusLine> {
        let line = match self {
            UploadState::Idle => return None,
            UploadState::Invalid(msg) => StatusLine::error(msg.as_str()),
            UploadState::Valid { valid, invalid } => {
                let text = format!("Valid objects: {}. Invalid: {}.", valid, invalid);
                if *invalid == 0 {
                    StatusLine::success(text)
                } else {
                    StatusLine::warning(text)
                }
            }
            UploadState::Submitting => StatusLine::neutral("Uploading..."),
            UploadState::Succeeded(msg) => StatusLine::success(msg.as_str()),
            UploadState::ServerFailed { status, body } => {
                StatusLine::error(format!("Upload failed: {} {}", status, body))
            }
            UploadState::NetworkFailed(msg) => StatusLine::error(format!("Network error: {}", msg)),
        };
        Some(line)
    }
}

/// What a panel hands over for submission.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestPayload {
    Listings(Vec<JobListing>),
    File(PathBuf),
}

/// Shared behaviour of the three upload panels.
pub trait UploadPanel {
    fn state(&self) -> &UploadState;

    /// Validate the panel's input. On success the panel is `Submitting` and
    /// the payload is returned; on failure it is `Invalid` and nothing must
    /// be sent.
    fn prepare_submit(&mut self) -> AppResult<IngestPayload>;

    /// Record the outcome of a submission, applying any reset it implies.
    fn finish(&mut self, result: &AppResult<IngestReceipt>);
}

/// Send a prepared payload.
pub async fn submit<B>(backend: &B, payload: IngestPayload) -> AppResult<IngestReceipt>
where
    B: IngestBackend + ?Sized,
{
    match payload {
        IngestPayload::Listings(listings) => backend.add_json(&listings).await,
        IngestPayload::File(path) => {
            let file = UploadFile::load(&path).await?;
            backend.add_file(file).await
        }
    }
}
