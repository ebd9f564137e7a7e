//! HTTP plumbing shared by the search and ingest clients.

use crate::types::{AppError, AppResult};
use chrono::{DateTime, Local};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const HEALTH_ENDPOINT: &str = "/health";

/// Build the HTTP client used for one backend.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Network(format!("failed to create HTTP client: {}", e)))
}

/// Turn a finished response into `Ok` for 2xx, or `AppError::Server` carrying
/// the status and the raw body text.
pub async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "backend returned an error status");
    Err(AppError::Server {
        status: status.as_u16(),
        body,
    })
}

/// Strip the `[body, status_code]` envelope some handlers return. The body
/// may be an object or an array; the code must be an HTTP status.
pub fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Array(mut items) if is_envelope(&items) => items.swap_remove(0),
        other => other,
    }
}

fn is_envelope(items: &[Value]) -> bool {
    let [body, code] = items else {
        return false;
    };
    let is_status = code.as_u64().is_some_and(|c| (100..=599).contains(&c));
    is_status && (body.is_object() || body.is_array())
}

/// The `status` message of a (possibly enveloped) body, if it has one.
pub fn status_message(payload: Value) -> Option<String> {
    unwrap_envelope(payload)
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Reachability of one backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ServiceHealth {
    #[default]
    Unknown,
    Healthy {
        message: String,
        checked_at: DateTime<Local>,
    },
    Unreachable {
        reason: String,
        checked_at: DateTime<Local>,
    },
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ServiceHealth::Healthy { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            ServiceHealth::Unknown => "not checked".to_string(),
            ServiceHealth::Healthy { message, checked_at } => {
                format!("{} (checked {})", message, checked_at.format("%H:%M:%S"))
            }
            ServiceHealth::Unreachable { reason, checked_at } => {
                format!("{} (checked {})", reason, checked_at.format("%H:%M:%S"))
            }
        }
    }
}

/// `GET {base_url}/health`.
pub async fn check_health(client: &Client, base_url: &str) -> ServiceHealth {
    let url = format!("{}{}", base_url, HEALTH_ENDPOINT);
    debug!(url = %url, "probing service health");

    let outcome = async {
        let response = check_status(client.get(&url).send().await?).await?;
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok::<_, AppError>(status_message(body).unwrap_or_else(|| "ok".to_string()))
    }
    .await;

    match outcome {
        Ok(message) => ServiceHealth::Healthy {
            message,
            checked_at: Local::now(),
        },
        Err(e) => ServiceHealth::Unreachable {
            reason: e.to_string(),
            checked_at: Local::now(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        let wrapped = json!([{"status": "ok"}, 200]);
        assert_eq!(unwrap_envelope(wrapped), json!({"status": "ok"}));

        // A two-element result list is not an envelope
        let list = json!([{"title": "a"}, {"title": "b"}]);
        assert_eq!(unwrap_envelope(list.clone()), list);

        assert_eq!(unwrap_envelope(json!({"results": []})), json!({"results": []}));
    }

    #[test]
    fn test_unwrap_envelope_around_array() {
        assert_eq!(unwrap_envelope(json!([[], 200])), json!([]));
        assert_eq!(
            unwrap_envelope(json!([[{"title": "a"}], 201])),
            json!([{"title": "a"}])
        );

        // Second element must look like an HTTP status
        let counts = json!([[1, 2], 7]);
        assert_eq!(unwrap_envelope(counts.clone()), counts);
        let scalars = json!(["a", 200]);
        assert_eq!(unwrap_envelope(scalars.clone()), scalars);
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message(json!([{"status": "JSON data added successfully"}, 201])),
            Some("JSON data added successfully".to_string())
        );
        assert_eq!(status_message(json!({"status": "  "})), None);
        assert_eq!(status_message(json!("done")), None);
    }

    #[tokio::test]
    async fn test_check_health() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"[{"status": "RAG service is healthy"}, 200]"#)
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let health = check_health(&client, &server.url()).await;
        mock.assert_async().await;
        match health {
            ServiceHealth::Healthy { message, .. } => assert_eq!(message, "RAG service is healthy"),
            other => panic!("unexpected health: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_health_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(503)
            .with_body("warming up")
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let health = check_health(&client, &server.url()).await;
        assert!(!health.is_healthy());
        assert!(health.describe().contains("503 warming up"));
    }
}
