use crate::types::{AppError, AppResult};
use serde::Serialize;

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub use_ai: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
}

impl SearchQuery {
    /// Validate raw input. The query is trimmed; an empty query is rejected
    /// before any request can be made.
    pub fn new(raw: &str, n_results: Option<u32>, use_ai: bool) -> AppResult<Self> {
        let query = raw.trim();
        if query.is_empty() {
            return Err(AppError::validation("Enter a query"));
        }

        Ok(Self {
            query: query.to_string(),
            use_ai,
            n_results,
        })
    }
}

/// Parse the result-count input. Blank, non-numeric and zero values mean
/// "let the backend decide".
pub fn parse_n_results(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}
