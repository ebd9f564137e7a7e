use crate::config::ServiceConfig;
use crate::http::{self, ServiceHealth};
use crate::schema::JobListing;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use tracing::info;

const ADD_JSON_ENDPOINT: &str = "/add-json";
const ADD_EXCEL_ENDPOINT: &str = "/add-excel";
const FILE_FIELD: &str = "file";

/// Confirmation returned by the ingest service.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReceipt {
    pub message: String,
}

impl IngestReceipt {
    fn from_body(body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(http::status_message)
            .unwrap_or_else(|| "Upload successful!".to_string());
        Self { message }
    }
}

/// A spreadsheet read from disk, sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub async fn load(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::validation(format!("Cannot read {}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            file_name,
            mime: mime_guess::from_path(path).first_or_octet_stream().to_string(),
            bytes,
        })
    }
}

/// The ingest backend as seen by the client.
#[async_trait]
pub trait IngestBackend: Send + Sync {
    async fn add_json(&self, listings: &[JobListing]) -> AppResult<IngestReceipt>;

    async fn add_file(&self, file: UploadFile) -> AppResult<IngestReceipt>;

    async fn health(&self) -> ServiceHealth;
}

/// HTTP client for the ingest service.
pub struct IngestClient {
    client: Client,
    base_url: String,
}

impl IngestClient {
    pub fn new(config: &ServiceConfig) -> AppResult<Self> {
        Ok(Self {
            client: http::build_client(config.timeout())?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn receipt(response: reqwest::Response) -> AppResult<IngestReceipt> {
        let response = http::check_status(response).await?;
        let body = response.text().await?;
        Ok(IngestReceipt::from_body(&body))
    }
}

#[async_trait]
impl IngestBackend for IngestClient {
    async fn add_json(&self, listings: &[JobListing]) -> AppResult<IngestReceipt> {
        let url = format!("{}{}", self.base_url, ADD_JSON_ENDPOINT);
        info!(count = listings.len(), "uploading job listings");

        let response = self.client.post(&url).json(listings).send().await?;
        Self::receipt(response).await
    }

    async fn add_file(&self, file: UploadFile) -> AppResult<IngestReceipt> {
        let url = format!("{}{}", self.base_url, ADD_EXCEL_ENDPOINT);
        info!(file = %file.file_name, bytes = file.bytes.len(), "uploading spreadsheet");

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::receipt(response).await
    }

    async fn health(&self) -> ServiceHealth {
        http::check_health(&self.client, &self.base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;

    fn client_for(server: &mockito::ServerGuard) -> IngestClient {
        IngestClient::new(&ServiceConfig {
            base_url: server.url(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_json_posts_raw_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/add-json")
            .match_body(Matcher::Json(json!([{"Title": "Chef"}])))
            .with_status(201)
            .with_body(r#"[{"status": "JSON data added successfully"}, 201]"#)
            .create_async()
            .await;

        let listing = json!({"Title": "Chef"}).as_object().cloned().unwrap();
        let receipt = client_for(&server).add_json(&[listing]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.message, "JSON data added successfully");
    }

    #[tokio::test]
    async fn test_add_json_failure_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/add-json")
            .with_status(500)
            .with_body(r#"{"detail":"Error processing JSON data"}"#)
            .create_async()
            .await;

        let err = client_for(&server).add_json(&[]).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Server {
                status: 500,
                body: r#"{"detail":"Error processing JSON data"}"#.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_add_file_sends_multipart_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/add-excel")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="jobs.csv""#.to_string()),
                Matcher::Regex("Title,Employer".to_string()),
            ]))
            .with_status(201)
            .with_body("not json")
            .create_async()
            .await;

        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "Title,Employer\nChef,Cafe").unwrap();
        let mut file = UploadFile::load(tmp.path()).await.unwrap();
        file.file_name = "jobs.csv".to_string();
        assert_eq!(file.mime, "text/csv");

        let receipt = client_for(&server).add_file(file).await.unwrap();
        mock.assert_async().await;
        assert_eq!(receipt.message, "Upload successful!");
    }

    #[tokio::test]
    async fn test_missing_file_is_validation_error() {
        let err = UploadFile::load(Path::new("/definitely/not/here.xlsx"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
