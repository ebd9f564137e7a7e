//! UI Rendering
//!
//! Main layout and rendering for both views.

use crate::http::ServiceHealth;
use crate::status::StatusLine;
use crate::tui::app::{App, SearchFocus, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

/// Split the terminal into header, tabs, main area and status bar
fn main_layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(6),    // View
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Split the search view into query, options, status and results
fn search_layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query
            Constraint::Length(1), // Options
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Results
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Inner area of the results block for a terminal of the given size
pub fn results_inner_area(terminal_area: Rect) -> Rect {
    let [_, _, main, _] = main_layout(terminal_area);
    let [_, _, _, results] = search_layout(main);
    Block::default().borders(Borders::ALL).inner(results)
}

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let [header, tabs, main, status_bar] = main_layout(frame.area());

    render_header(frame, header, app);
    render_tabs(frame, tabs, app.view);
    match app.view {
        View::Search => render_search(frame, main, app),
        View::Upload => render_upload(frame, main, app),
    }
    render_status_bar(frame, status_bar, app);

    if app.show_help {
        render_help(frame);
    }
}

fn health_spans(name: &'static str, health: &ServiceHealth) -> Vec<Span<'static>> {
    vec![
        Span::styled(Icons::DOT, Theme::health(health)),
        Span::styled(format!(" {}", name), Theme::text_secondary()),
    ]
}

/// Render the header with service health dots
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("Job Search", Theme::title()),
        Span::styled(" Console", Theme::text_secondary()),
        Span::raw("    "),
    ];
    spans.extend(health_spans("search", &app.search_health));
    spans.push(Span::raw("  "));
    spans.extend(health_spans("ingest", &app.ingest_health));

    let title = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

    frame.render_widget(title, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, view: View) {
    let selected = match view {
        View::Search => 0,
        View::Upload => 1,
    };
    let tabs = Tabs::new(vec![" Search ", " Upload "])
        .select(selected)
        .style(Theme::text_secondary())
        .highlight_style(Theme::selected())
        .divider("│");
    frame.render_widget(tabs, area);
}

fn status_paragraph(status: Option<StatusLine>) -> Paragraph<'static> {
    let line = match status {
        Some(status) => Line::from(Span::styled(format!(" {}", status.text), Theme::tone(status.tone))),
        None => Line::from(""),
    };
    Paragraph::new(line)
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let [query_area, options_area, status_area, results_area] = search_layout(area);

    let block = Block::default()
        .title(" Query ")
        .borders(Borders::ALL)
        .border_style(Theme::border_for(app.search_focus == SearchFocus::Query));
    let inner = block.inner(query_area);
    frame.render_widget(block, query_area);
    frame.render_widget(&app.query, inner);

    let focus_style = |focus: SearchFocus| {
        if app.search_focus == focus {
            Theme::selected()
        } else {
            Theme::text_secondary()
        }
    };
    let count = if app.n_results_input.is_empty() {
        Span::styled("default", Theme::placeholder())
    } else {
        Span::styled(app.n_results_input.clone(), Theme::text())
    };
    let checkbox = if app.use_ai { Icons::CHECK_ON } else { Icons::CHECK_OFF };
    let options = Line::from(vec![
        Span::styled(" Results: ", focus_style(SearchFocus::ResultCount)),
        Span::raw("["),
        count,
        Span::raw("]    "),
        Span::styled(format!("{} Use AI", checkbox), focus_style(SearchFocus::UseAi)),
    ]);
    frame.render_widget(Paragraph::new(options), options_area);

    frame.render_widget(status_paragraph(app.search_status.clone()), status_area);
    widgets::render_results(frame, results_area, &app.results, app.scroll_offset);
}

fn render_upload(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Mode selector
            Constraint::Min(3),    // Panel
            Constraint::Length(1), // Status
        ])
        .split(area);

    widgets::render_mode_selector(frame, chunks[0], app.upload_mode);
    widgets::render_panel(frame, chunks[1], app);
    frame.render_widget(status_paragraph(app.upload_status()), chunks[2]);
}

fn shortcut(key: &'static str, desc: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(format!(" [{}]", key), Theme::shortcut_key()),
        Span::styled(format!(" {}", desc), Theme::shortcut_desc()),
    ]
}

/// Render the status bar with the shortcuts of the current view
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let keys: &[(&'static str, &'static str)] = match (app.view, app.upload_mode) {
        (View::Search, _) => &[("Enter", "Search"), ("Tab", "Focus"), ("↑↓", "Scroll")],
        (View::Upload, crate::ingest::UploadMode::Json) => &[("Ctrl+L", "Validate"), ("Ctrl+S", "Upload")],
        (View::Upload, crate::ingest::UploadMode::Form) => &[
            ("Ctrl+N", "Add"),
            ("Ctrl+D", "Remove"),
            ("Ctrl+S", "Upload"),
        ],
        (View::Upload, crate::ingest::UploadMode::Excel) => &[("Enter", "Upload")],
    };

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|&(k, d)| shortcut(k, d))
        .chain(shortcut("F2", "Switch"))
        .chain(shortcut("F1", "Help"))
        .chain(shortcut("Ctrl+Q", "Quit"))
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

const HELP: &[(&str, &str)] = &[
    ("F2", "Switch between Search and Upload"),
    ("Tab / Shift+Tab", "Move focus / form field"),
    ("Enter", "Search, next form field, upload file"),
    ("Space", "Toggle Use AI (when focused)"),
    ("↑/↓ PgUp/PgDn", "Scroll results, move in forms"),
    ("F5 / F6 / F7", "JSON / Form / Excel upload"),
    ("Ctrl+L", "Validate JSON"),
    ("Ctrl+S", "Upload current panel"),
    ("Ctrl+N / Ctrl+D", "Add / remove form entry"),
    ("Ctrl+R", "Re-check service health"),
    ("Ctrl+Q", "Quit"),
    ("Ctrl+C", "Force quit"),
];

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(64, 70, frame.area());
    frame.render_widget(Clear, area);

    let mut help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
    ];
    help_lines.extend(HELP.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("{:<18}", key), Theme::shortcut_key()),
            Span::styled(*desc, Theme::text()),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled("Esc or F1 to close", Theme::text_dim())));

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
