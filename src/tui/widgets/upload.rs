//! Upload Widgets
//!
//! Mode selector and the three upload panels.

use crate::ingest::{excel::SUPPORTED_EXTENSIONS, UploadMode};
use crate::schema::SchemaField;
use crate::tui::app::App;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Lines per form entry: header plus one per field
const ENTRY_LINES: usize = SchemaField::COUNT + 1;

const LABEL_WIDTH: usize = 18;

/// Render the radio-style mode selector
pub fn render_mode_selector(frame: &mut Frame, area: Rect, current: UploadMode) {
    let mut spans = vec![Span::raw(" ")];
    for (mode, key) in UploadMode::ALL.iter().zip(["F5", "F6", "F7"]) {
        let selected = *mode == current;
        let (radio, style) = if selected {
            (Icons::RADIO_ON, Theme::selected())
        } else {
            (Icons::RADIO_OFF, Theme::text_secondary())
        };
        spans.push(Span::styled(format!("{} {}", radio, mode.label()), style));
        spans.push(Span::styled(format!(" [{}]   ", key), Theme::text_dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the panel for the current mode
pub fn render_panel(frame: &mut Frame, area: Rect, app: &App) {
    match app.upload_mode {
        UploadMode::Json => render_json(frame, area, app),
        UploadMode::Form => render_form(frame, area, app),
        UploadMode::Excel => render_excel(frame, area, app),
    }
}

fn render_json(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" JSON listings ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.json_input, inner);
}

/// Lines of the form panel and the index of the line under the cursor
pub fn form_lines(app: &App) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::with_capacity(app.form.len() * ENTRY_LINES);
    let cursor = app.form_cursor;

    for (i, entry) in app.form.entries().iter().enumerate() {
        let state = if entry.is_complete() {
            Span::styled("  complete", Theme::tone(crate::status::Tone::Success))
        } else {
            Span::styled("  incomplete", Theme::text_dim())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("Entry {}", i + 1), Theme::heading()),
            state,
        ]));

        for (f, field) in SchemaField::ALL.iter().enumerate() {
            let focused = i == cursor.entry && f == cursor.field;
            let marker = if focused { Icons::SELECTED } else { " " };
            let mut spans = vec![
                Span::styled(format!(" {} ", marker), Theme::selected()),
                Span::styled(
                    format!("{:<width$}", field.key(), width = LABEL_WIDTH),
                    Theme::text_secondary(),
                ),
                Span::styled(entry.get(*field).to_string(), Theme::text()),
            ];
            if focused {
                spans.push(Span::styled(Icons::CURSOR, Theme::selected()));
            }
            let line = Line::from(spans);
            lines.push(if focused { line.style(Theme::cursor_row()) } else { line });
        }
    }

    let cursor_line = cursor.entry * ENTRY_LINES + 1 + cursor.field;
    (lines, cursor_line)
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" Entries ({}) ", app.form.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (lines, cursor_line) = form_lines(app);
    // Keep the cursor row on screen
    let height = usize::from(inner.height.max(1));
    let scroll = cursor_line.saturating_sub(height - 1);
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn render_excel(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Spreadsheet ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let path = if app.excel.path().is_empty() {
        Span::styled("type or paste a file path", Theme::placeholder())
    } else {
        Span::styled(app.excel.path().to_string(), Theme::text())
    };

    let extensions = SUPPORTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(" ");

    let lines = vec![
        Line::from(vec![
            Span::styled("File: ", Theme::text_secondary()),
            path,
            Span::styled(Icons::CURSOR, Theme::selected()),
        ]),
        Line::from(""),
        Line::from(Span::styled(format!("Supported: {}", extensions), Theme::text_dim())),
        Line::from(Span::styled(
            "Press Enter or Ctrl+S to upload.",
            Theme::text_dim(),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
