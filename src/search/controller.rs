//! Search controller
//!
//! Owns the request ticket counter. Every accepted search gets a new ticket
//! and only the newest ticket may replace what is displayed; a slower,
//! older response arriving late is dropped.

use crate::search::client::SearchBackend;
use crate::search::normalize::normalize;
use crate::search::query::SearchQuery;
use crate::search::render::{render_all, ResultCard};
use crate::status::StatusLine;
use crate::types::AppResult;
use serde_json::Value;
use tracing::debug;

/// An accepted search, identified by its ticket number.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub id: u64,
    pub query: SearchQuery,
}

/// Everything the results region shows after a search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchView {
    pub status: StatusLine,
    pub cards: Vec<ResultCard>,
}

impl SearchView {
    /// Status shown while a request is in flight.
    pub fn pending() -> Self {
        Self {
            status: StatusLine::neutral("Searching…"),
            cards: Vec::new(),
        }
    }

    /// Build the view for a finished request.
    pub fn from_outcome(outcome: AppResult<Value>) -> Self {
        match outcome {
            Ok(payload) => {
                let cards = render_all(&normalize(payload));
                let status = if cards.is_empty() {
                    StatusLine::neutral("No results found.")
                } else {
                    StatusLine::neutral(format!("Got {} result(s)", cards.len()))
                };
                Self { status, cards }
            }
            Err(e) => Self {
                status: StatusLine::from(&e),
                cards: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchController {
    latest: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate input and issue a ticket. Invalid input issues no ticket but
    /// still supersedes any pending one, so its error stays on screen.
    pub fn begin(&mut self, raw_query: &str, n_results: Option<u32>, use_ai: bool) -> AppResult<SearchTicket> {
        self.latest += 1;
        let query = SearchQuery::new(raw_query, n_results, use_ai)?;
        Ok(SearchTicket {
            id: self.latest,
            query,
        })
    }

    /// Whether a finished request may update the display.
    pub fn is_current(&self, ticket_id: u64) -> bool {
        let current = ticket_id == self.latest;
        if !current {
            debug!(ticket_id, latest = self.latest, "dropping stale search response");
        }
        current
    }

    pub fn latest_ticket(&self) -> u64 {
        self.latest
    }
}

/// Run one ticket against a backend.
pub async fn execute<B>(backend: &B, ticket: &SearchTicket) -> SearchView
where
    B: SearchBackend + ?Sized,
{
    SearchView::from_outcome(backend.search(&ticket.query).await)
}
