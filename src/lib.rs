// jobsearch-ui - Terminal client for a job-listing search service and its ingest service

pub mod config;
pub mod http;
pub mod ingest;    // JSON / form / spreadsheet uploads to the ingest service
pub mod logging;
pub mod schema;
pub mod search;    // Queries, response normalization and result rendering
pub mod status;
pub mod tui;       // Terminal User Interface
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use types::{AppError, AppResult};
