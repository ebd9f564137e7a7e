//! Application State
//!
//! Holds the state of both views and applies user actions and results from
//! background requests.

use crate::config::Config;
use crate::http::ServiceHealth;
use crate::ingest::{self, ExcelUpload, FormUpload, IngestBackend, IngestReceipt, JsonUpload, UploadMode, UploadPanel, UploadState};
use crate::schema::SchemaField;
use crate::search::{self, parse_n_results, ResultCard, SearchBackend, SearchController, SearchView};
use crate::status::StatusLine;
use crate::tui::event::AppAction;
use crate::tui::{ui, widgets};
use crate::types::AppResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::{CursorMove, TextArea};

/// Widest result count the input accepts
const MAX_COUNT_DIGITS: usize = 4;

/// Lines moved by PageUp / PageDown
const PAGE: u16 = 10;

/// Current view/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Search,
    Upload,
}

/// Focused control in the search view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Query,
    ResultCount,
    UseAi,
}

impl SearchFocus {
    fn next(self) -> Self {
        match self {
            SearchFocus::Query => SearchFocus::ResultCount,
            SearchFocus::ResultCount => SearchFocus::UseAi,
            SearchFocus::UseAi => SearchFocus::Query,
        }
    }

    fn prev(self) -> Self {
        match self {
            SearchFocus::Query => SearchFocus::UseAi,
            SearchFocus::ResultCount => SearchFocus::Query,
            SearchFocus::UseAi => SearchFocus::ResultCount,
        }
    }
}

/// Position of the form cursor: entry index and field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormCursor {
    pub entry: usize,
    pub field: usize,
}

impl FormCursor {
    pub fn field(&self) -> SchemaField {
        SchemaField::ALL[self.field]
    }
}

/// Which backend a health result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Search,
    Ingest,
}

/// Results from background requests
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished { ticket: u64, view: SearchView },
    UploadFinished { mode: UploadMode, result: AppResult<IngestReceipt> },
    HealthChecked {
        generation: u64,
        service: Service,
        health: ServiceHealth,
    },
}

/// Main application state
pub struct App {
    pub view: View,
    pub show_help: bool,

    // Search view
    pub query: TextArea<'static>,
    pub n_results_input: String,
    pub use_ai: bool,
    pub search_focus: SearchFocus,
    pub search_status: Option<StatusLine>,
    pub results: Vec<ResultCard>,
    pub scroll_offset: u16,
    results_max_scroll: u16,
    controller: SearchController,

    // Upload view
    pub upload_mode: UploadMode,
    pub json_input: TextArea<'static>,
    pub json_upload: JsonUpload,
    pub form: FormUpload,
    pub form_cursor: FormCursor,
    pub excel: ExcelUpload,

    pub search_health: ServiceHealth,
    pub ingest_health: ServiceHealth,
    /// Bumped on every refresh; older check results are dropped
    health_generation: u64,

    search_backend: Arc<dyn SearchBackend>,
    ingest_backend: Arc<dyn IngestBackend>,
    event_tx: mpsc::Sender<AppEvent>,
    event_rx: mpsc::Receiver<AppEvent>,
}

impl App {
    /// Create the app with the given backends
    pub fn new(config: &Config, search_backend: Arc<dyn SearchBackend>, ingest_backend: Arc<dyn IngestBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);

        let mut query = TextArea::default();
        query.set_placeholder_text("Search job listings...");
        query.set_cursor_line_style(ratatui::style::Style::default());

        let mut json_input = TextArea::default();
        json_input.set_placeholder_text("Paste a JSON array of job listings, then Ctrl+L to validate");

        Self {
            view: View::default(),
            show_help: false,
            query,
            n_results_input: config
                .ui
                .default_n_results
                .map(|n| n.to_string())
                .unwrap_or_default(),
            use_ai: config.ui.default_use_ai,
            search_focus: SearchFocus::default(),
            search_status: None,
            results: Vec::new(),
            scroll_offset: 0,
            results_max_scroll: 0,
            controller: SearchController::new(),
            upload_mode: UploadMode::default(),
            json_input,
            json_upload: JsonUpload::new(),
            form: FormUpload::new(),
            form_cursor: FormCursor::default(),
            excel: ExcelUpload::new(),
            search_health: ServiceHealth::Unknown,
            ingest_health: ServiceHealth::Unknown,
            health_generation: 0,
            search_backend,
            ingest_backend,
            event_tx,
            event_rx,
        }
    }

    /// Query text as a single line
    pub fn query_text(&self) -> String {
        self.query.lines().join(" ")
    }

    pub fn panel(&self, mode: UploadMode) -> &dyn UploadPanel {
        match mode {
            UploadMode::Json => &self.json_upload,
            UploadMode::Form => &self.form,
            UploadMode::Excel => &self.excel,
        }
    }

    fn panel_mut(&mut self, mode: UploadMode) -> &mut dyn UploadPanel {
        match mode {
            UploadMode::Json => &mut self.json_upload,
            UploadMode::Form => &mut self.form,
            UploadMode::Excel => &mut self.excel,
        }
    }

    /// Status of the visible upload panel
    pub fn upload_status(&self) -> Option<StatusLine> {
        self.panel(self.upload_mode).state().status_line()
    }

    /// Drain finished background work
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished { ticket, view } => {
                if self.controller.is_current(ticket) {
                    self.search_status = Some(view.status);
                    self.results = view.cards;
                    self.scroll_offset = 0;
                }
            }
            AppEvent::UploadFinished { mode, result } => {
                info!(mode = mode.label(), ok = result.is_ok(), "upload finished");
                self.panel_mut(mode).finish(&result);
                if mode == UploadMode::Form {
                    self.clamp_form_cursor();
                }
            }
            AppEvent::HealthChecked {
                generation,
                service,
                health,
            } => {
                if generation != self.health_generation {
                    debug!(generation, latest = self.health_generation, "dropping stale health result");
                    return;
                }
                match service {
                    Service::Search => self.search_health = health,
                    Service::Ingest => self.ingest_health = health,
                }
            }
        }
    }

    /// Apply one user action. Quit actions are handled by the caller.
    pub fn handle_action(&mut self, action: AppAction) {
        if self.show_help {
            if matches!(action, AppAction::ToggleHelp | AppAction::Escape) {
                self.show_help = false;
            }
            return;
        }

        match action {
            AppAction::ToggleHelp => self.show_help = true,
            AppAction::SwitchView => {
                self.view = match self.view {
                    View::Search => View::Upload,
                    View::Upload => View::Search,
                };
            }
            AppAction::RefreshHealth => self.refresh_health(),
            AppAction::Quit | AppAction::ForceQuit | AppAction::Escape | AppAction::Tick => {}
            action => match self.view {
                View::Search => self.handle_search_action(action),
                View::Upload => self.handle_upload_action(action),
            },
        }
    }

    // === Search view ===

    fn handle_search_action(&mut self, action: AppAction) {
        match action {
            AppAction::Submit => self.start_search(),
            AppAction::NextField => self.search_focus = self.search_focus.next(),
            AppAction::PrevField => self.search_focus = self.search_focus.prev(),
            AppAction::ScrollUp => self.scroll_by(-1),
            AppAction::ScrollDown => self.scroll_by(1),
            AppAction::ScrollPageUp => self.scroll_by(-(PAGE as i32)),
            AppAction::ScrollPageDown => self.scroll_by(PAGE as i32),
            AppAction::Paste(text) => match self.search_focus {
                SearchFocus::Query => {
                    self.query.insert_str(text.replace(['\r', '\n'], " "));
                }
                SearchFocus::ResultCount => {
                    for c in text.chars().filter(char::is_ascii_digit) {
                        self.push_count_digit(c);
                    }
                }
                SearchFocus::UseAi => {}
            },
            AppAction::Input(key) => self.search_input(key),
            _ => {}
        }
    }

    fn search_input(&mut self, key: KeyEvent) {
        match self.search_focus {
            SearchFocus::Query => {
                self.query.input(key);
            }
            SearchFocus::ResultCount => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => self.push_count_digit(c),
                KeyCode::Backspace => {
                    self.n_results_input.pop();
                }
                _ => {}
            },
            SearchFocus::UseAi => {
                if key.code == KeyCode::Char(' ') {
                    self.use_ai = !self.use_ai;
                }
            }
        }
    }

    fn push_count_digit(&mut self, c: char) {
        if self.n_results_input.len() < MAX_COUNT_DIGITS {
            self.n_results_input.push(c);
        }
    }

    /// Validate the query and, if accepted, send it in the background
    pub fn start_search(&mut self) {
        let raw = self.query_text();
        let n_results = parse_n_results(&self.n_results_input);

        let ticket = match self.controller.begin(&raw, n_results, self.use_ai) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.search_status = Some(StatusLine::from(&e));
                return;
            }
        };

        let pending = SearchView::pending();
        self.search_status = Some(pending.status);
        self.results = pending.cards;
        self.scroll_offset = 0;

        debug!(ticket = ticket.id, "search started");
        let backend = Arc::clone(&self.search_backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let view = search::execute(backend.as_ref(), &ticket).await;
            let _ = tx
                .send(AppEvent::SearchFinished {
                    ticket: ticket.id,
                    view,
                })
                .await;
        });
    }

    /// Recompute how far the results can scroll for the given terminal area
    pub fn calculate_scroll_bounds(&mut self, terminal_area: Rect) {
        let inner = ui::results_inner_area(terminal_area);
        let total = widgets::results::build_lines(&self.results, inner.width).len();
        self.results_max_scroll = u16::try_from(total)
            .unwrap_or(u16::MAX)
            .saturating_sub(inner.height);
        self.scroll_offset = self.scroll_offset.min(self.results_max_scroll);
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll_offset) + delta).clamp(0, i32::from(self.results_max_scroll));
        self.scroll_offset = next as u16;
    }

    // === Upload view ===

    fn handle_upload_action(&mut self, action: AppAction) {
        match action {
            AppAction::SelectUploadMode(mode) => self.upload_mode = mode,
            AppAction::SubmitUpload => self.submit_upload(),
            _ => match self.upload_mode {
                UploadMode::Json => self.json_action(action),
                UploadMode::Form => self.form_action(action),
                UploadMode::Excel => self.excel_action(action),
            },
        }
    }

    fn json_action(&mut self, action: AppAction) {
        match action {
            AppAction::ValidateJson => {
                let text = self.json_input.lines().join("\n");
                self.json_upload.validate(&text);
            }
            AppAction::Submit => self.json_input.insert_newline(),
            AppAction::ScrollUp => self.json_input.move_cursor(CursorMove::Up),
            AppAction::ScrollDown => self.json_input.move_cursor(CursorMove::Down),
            AppAction::ScrollPageUp => self.json_input.scroll(tui_textarea::Scrolling::PageUp),
            AppAction::ScrollPageDown => self.json_input.scroll(tui_textarea::Scrolling::PageDown),
            AppAction::Paste(text) => {
                self.json_input.insert_str(text);
            }
            AppAction::Input(key) => {
                self.json_input.input(key);
            }
            _ => {}
        }
    }

    fn form_action(&mut self, action: AppAction) {
        let field_count = SchemaField::COUNT;
        match action {
            AppAction::AddEntry => {
                let entry = self.form.add_entry();
                self.form_cursor = FormCursor { entry, field: 0 };
            }
            AppAction::RemoveEntry => {
                self.form.remove_entry(self.form_cursor.entry);
                self.clamp_form_cursor();
            }
            AppAction::NextField | AppAction::ScrollDown | AppAction::Submit => {
                let cursor = &mut self.form_cursor;
                if cursor.field + 1 < field_count {
                    cursor.field += 1;
                } else if cursor.entry + 1 < self.form.len() {
                    cursor.entry += 1;
                    cursor.field = 0;
                }
            }
            AppAction::PrevField | AppAction::ScrollUp => {
                let cursor = &mut self.form_cursor;
                if cursor.field > 0 {
                    cursor.field -= 1;
                } else if cursor.entry > 0 {
                    cursor.entry -= 1;
                    cursor.field = field_count - 1;
                }
            }
            AppAction::ScrollPageDown => {
                if self.form_cursor.entry + 1 < self.form.len() {
                    self.form_cursor.entry += 1;
                }
            }
            AppAction::ScrollPageUp => {
                self.form_cursor.entry = self.form_cursor.entry.saturating_sub(1);
            }
            AppAction::Paste(text) => {
                let FormCursor { entry, .. } = self.form_cursor;
                let field = self.form_cursor.field();
                if let Some(value) = self.form.field_mut(entry, field) {
                    value.push_str(&text.replace(['\r', '\n'], " "));
                }
            }
            AppAction::Input(key) => {
                let FormCursor { entry, .. } = self.form_cursor;
                let field = self.form_cursor.field();
                if let Some(value) = self.form.field_mut(entry, field) {
                    edit_line(value, key);
                }
            }
            _ => {}
        }
    }

    fn clamp_form_cursor(&mut self) {
        let last = self.form.len().saturating_sub(1);
        if self.form_cursor.entry > last {
            self.form_cursor = FormCursor { entry: last, field: 0 };
        }
    }

    fn excel_action(&mut self, action: AppAction) {
        match action {
            AppAction::Submit => self.submit_upload(),
            AppAction::Paste(text) => self.excel.path_mut().push_str(text.trim()),
            AppAction::Input(key) => edit_line(self.excel.path_mut(), key),
            _ => {}
        }
    }

    /// Validate the visible panel and send its payload in the background
    pub fn submit_upload(&mut self) {
        let mode = self.upload_mode;
        let panel = self.panel_mut(mode);
        if panel.state().is_submitting() {
            debug!(mode = mode.label(), "upload already in flight");
            return;
        }

        let payload = match panel.prepare_submit() {
            Ok(payload) => payload,
            Err(e) => {
                debug!(mode = mode.label(), error = %e, "upload blocked");
                return;
            }
        };

        let backend = Arc::clone(&self.ingest_backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = ingest::submit(backend.as_ref(), payload).await;
            let _ = tx.send(AppEvent::UploadFinished { mode, result }).await;
        });
    }

    // === Health ===

    /// Check both services in the background
    pub fn refresh_health(&mut self) {
        self.health_generation += 1;
        let generation = self.health_generation;
        self.search_health = ServiceHealth::Unknown;
        self.ingest_health = ServiceHealth::Unknown;

        let search = Arc::clone(&self.search_backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let health = search.health().await;
            let _ = tx
                .send(AppEvent::HealthChecked {
                    generation,
                    service: Service::Search,
                    health,
                })
                .await;
        });

        let ingest = Arc::clone(&self.ingest_backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let health = ingest.health().await;
            let _ = tx
                .send(AppEvent::HealthChecked {
                    generation,
                    service: Service::Ingest,
                    health,
                })
                .await;
        });
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.panel(self.upload_mode).state(), UploadState::Submitting)
    }
}

/// Single-line editing for plain string inputs
fn edit_line(value: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => value.push(c),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}
