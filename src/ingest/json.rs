//! Pasted JSON upload

use super::{IngestPayload, IngestReceipt, UploadPanel, UploadState};
use crate::schema::{has_all_fields, JobListing};
use crate::types::{AppError, AppResult};
use serde_json::Value;
use tracing::debug;

/// Result of checking a pasted JSON array.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonValidation {
    pub valid: Vec<JobListing>,
    pub invalid: usize,
}

/// Parse `text` as a JSON array and keep the objects that carry every schema
/// key. Anything that is not a JSON array is rejected outright.
pub fn validate_listings(text: &str) -> AppResult<JsonValidation> {
    let parsed: Value =
        serde_json::from_str(text).map_err(|e| AppError::validation(format!("Invalid JSON: {}", e)))?;

    let items = match parsed {
        Value::Array(items) => items,
        _ => return Err(AppError::validation("Invalid JSON: Not an array")),
    };

    let total = items.len();
    let valid: Vec<JobListing> = items
        .into_iter()
        .filter(has_all_fields)
        .filter_map(|item| match item {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect();

    Ok(JsonValidation {
        invalid: total - valid.len(),
        valid,
    })
}

/// State of the JSON panel: the last validated subset and the upload state.
#[derive(Debug, Default)]
pub struct JsonUpload {
    valid: Vec<JobListing>,
    state: UploadState,
}

impl JsonUpload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate pasted text, replacing the previously validated subset.
    pub fn validate(&mut self, text: &str) -> &UploadState {
        self.state = match validate_listings(text) {
            Ok(result) => {
                debug!(valid = result.valid.len(), invalid = result.invalid, "validated JSON listings");
                let state = UploadState::Valid {
                    valid: result.valid.len(),
                    invalid: result.invalid,
                };
                self.valid = result.valid;
                state
            }
            Err(e) => {
                self.valid.clear();
                UploadState::Invalid(e.to_string())
            }
        };
        &self.state
    }

    pub fn valid_listings(&self) -> &[JobListing] {
        &self.valid
    }
}

impl UploadPanel for JsonUpload {
    fn state(&self) -> &UploadState {
        &self.state
    }

    fn prepare_submit(&mut self) -> AppResult<IngestPayload> {
        if self.valid.is_empty() {
            let err = AppError::validation("No valid objects to submit.");
            self.state = UploadState::Invalid(err.to_string());
            return Err(err);
        }

        self.state = UploadState::Submitting;
        Ok(IngestPayload::Listings(self.valid.clone()))
    }

    fn finish(&mut self, result: &AppResult<IngestReceipt>) {
        self.state = UploadState::finished(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{submit, IngestClient};
    use crate::schema::SchemaField;
    use crate::config::ServiceConfig;
    use serde_json::json;

    fn listing(title: &str) -> Value {
        let mut obj = serde_json::Map::new();
        for field in SchemaField::ALL {
            obj.insert(field.key().to_string(), json!(""));
        }
        obj.insert("Title".to_string(), json!(title));
        Value::Object(obj)
    }

    fn listing_without(title: &str, missing: SchemaField) -> Value {
        let mut value = listing(title);
        value.as_object_mut().unwrap().remove(missing.key());
        value
    }

    #[test]
    fn test_all_valid() {
        let text = json!([listing("a"), listing("b"), listing("c")]).to_string();
        let result = validate_listings(&text).unwrap();
        assert_eq!(result.valid.len(), 3);
        assert_eq!(result.invalid, 0);
    }

    #[test]
    fn test_counts_with_missing_keys() {
        let text = json!([
            listing("a"),
            listing_without("b", SchemaField::Expires),
            listing("c"),
            listing_without("d", SchemaField::JobRoles),
            "not an object",
            null
        ])
        .to_string();
        let result = validate_listings(&text).unwrap();
        assert_eq!(result.valid.len(), 2);
        assert_eq!(result.invalid, 4);
        assert_eq!(result.valid[1]["Title"], "c");
    }

    #[test]
    fn test_rejects_invalid_json_and_non_arrays() {
        let err = validate_listings("[{").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON: "));

        let err = validate_listings(r#"{"Title": "x"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON: Not an array");
    }

    #[test]
    fn test_failed_validation_clears_previous_subset() {
        let mut upload = JsonUpload::new();
        upload.validate(&json!([listing("a")]).to_string());
        assert_eq!(upload.valid_listings().len(), 1);

        let state = upload.validate("nope").clone();
        assert!(matches!(state, UploadState::Invalid(_)));
        assert!(upload.valid_listings().is_empty());
    }

    #[test]
    fn test_prepare_submit_blocks_when_nothing_valid() {
        let mut upload = JsonUpload::new();
        upload.validate(&json!([listing_without("a", SchemaField::Title)]).to_string());

        let err = upload.prepare_submit().unwrap_err();
        assert_eq!(err.to_string(), "No valid objects to submit.");
        assert_eq!(
            upload.state(),
            &UploadState::Invalid("No valid objects to submit.".into())
        );
    }

    #[tokio::test]
    async fn test_zero_valid_objects_never_hits_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/add-json")
            .expect(0)
            .create_async()
            .await;
        let client = IngestClient::new(&ServiceConfig {
            base_url: server.url(),
            timeout_secs: 5,
        })
        .unwrap();

        let mut upload = JsonUpload::new();
        upload.validate("[]");
        if let Ok(payload) = upload.prepare_submit() {
            let _ = submit(&client, payload).await;
        }

        mock.assert_async().await;
    }

    #[test]
    fn test_submit_moves_to_submitting_then_finished() {
        let mut upload = JsonUpload::new();
        upload.validate(&json!([listing("a"), listing("b")]).to_string());

        match upload.prepare_submit().unwrap() {
            IngestPayload::Listings(listings) => assert_eq!(listings.len(), 2),
            other => panic!("unexpected payload {:?}", other),
        }
        assert!(upload.state().is_submitting());

        upload.finish(&Err(AppError::Network("reset".into())));
        assert_eq!(upload.state(), &UploadState::NetworkFailed("reset".into()));
        // Still holds the subset so the user can retry
        assert_eq!(upload.valid_listings().len(), 2);
    }
}
