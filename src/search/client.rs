use crate::config::ServiceConfig;
use crate::http::{self, ServiceHealth};
use crate::search::query::SearchQuery;
use crate::types::AppResult;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

const SEARCH_ENDPOINT: &str = "/search";

/// The search/RAG backend as seen by the client.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a query and return the raw JSON payload.
    async fn search(&self, query: &SearchQuery) -> AppResult<Value>;

    async fn health(&self) -> ServiceHealth;
}

/// HTTP client for the search service.
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(config: &ServiceConfig) -> AppResult<Self> {
        Ok(Self {
            client: http::build_client(config.timeout())?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(&self, query: &SearchQuery) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, SEARCH_ENDPOINT);
        info!(query = %query.query, use_ai = query.use_ai, n_results = ?query.n_results, "searching");

        let response = self.client.post(&url).json(query).send().await?;
        let response = http::check_status(response).await?;
        let payload: Value = response.json().await?;

        debug!("search payload received");
        Ok(payload)
    }

    async fn health(&self) -> ServiceHealth {
        http::check_health(&self.client, &self.base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> SearchClient {
        SearchClient::new(&ServiceConfig {
            base_url: server.url(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_posts_exact_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "query": "warehouse operative",
                "use_ai": true,
                "n_results": 7
            })))
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let query = SearchQuery::new("  warehouse operative ", Some(7), true).unwrap();
        let payload = client_for(&server).search(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(payload, json!({"results": []}));
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(400)
            .with_body("bad request")
            .create_async()
            .await;

        let query = SearchQuery::new("x", None, false).unwrap();
        let err = client_for(&server).search(&query).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Server {
                status: 400,
                body: "bad request".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = SearchClient::new(&ServiceConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let query = SearchQuery::new("x", None, false).unwrap();
        let err = client.search(&query).await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
