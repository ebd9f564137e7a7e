//! Search Module
//!
//! Query validation, the HTTP client for the search (RAG) service, response
//! normalization across the payload shapes the service produces, and result
//! rendering.

pub mod client;
pub mod controller;
pub mod normalize;
pub mod query;
pub mod render;

pub use client::{SearchBackend, SearchClient};
pub use controller::{execute, SearchController, SearchTicket, SearchView};
pub use normalize::{normalize, ListingHit, ResponseShape, ResultItem};
pub use query::{parse_n_results, SearchQuery};
pub use render::{render_all, render_item, Link, ResultCard};
