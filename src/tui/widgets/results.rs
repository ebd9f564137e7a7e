//! Results Widget
//!
//! Draws result cards as pre-wrapped lines so scrolling can be bounded by the
//! real rendered height.

use crate::search::ResultCard;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const INDENT: &str = "    ";

/// Lines for every card, wrapped to `width` columns
pub fn build_lines(cards: &[ResultCard], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width).max(INDENT.len() + 8);
    let mut lines = Vec::new();

    for card in cards {
        let mut header = vec![
            Span::styled(format!("[{}] ", card.index + 1), Theme::text_dim()),
            Span::styled(card.title.clone(), Theme::title()),
        ];
        if let Some(score) = &card.score {
            header.push(Span::styled(format!("  score {}", score), Theme::text_secondary()));
        }
        lines.push(Line::from(header));

        if let Some(subtitle) = &card.subtitle {
            push_wrapped(&mut lines, subtitle, width, Theme::text_secondary());
        }

        for paragraph in card.body.lines() {
            push_wrapped(&mut lines, paragraph, width, Theme::text());
        }

        for (label, value) in &card.fields {
            if value.is_empty() {
                continue;
            }
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(format!("{}: ", label), Theme::text_secondary()),
                Span::styled(value.clone(), Theme::text()),
            ]));
        }

        if let Some(link) = &card.link {
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(format!("{} {} ", Icons::ARROW, link.label), Theme::text_secondary()),
                Span::styled(link.url.clone(), Theme::link()),
            ]));
        }

        lines.push(Line::from(""));
    }

    lines
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: ratatui::style::Style) {
    for chunk in wrap(text, width - INDENT.len()) {
        lines.push(Line::from(vec![Span::raw(INDENT), Span::styled(chunk, style)]));
    }
}

/// Greedy word wrap on display columns. Words wider than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(2);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if word_width > width {
            if current_width > 0 {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for c in word.chars() {
                let w = UnicodeWidthChar::width(c).unwrap_or(0);
                if current_width + w > width {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
            continue;
        }

        let needed = if current_width == 0 {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed > width {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if current_width > 0 || out.is_empty() {
        out.push(current);
    }
    out
}

/// Render the results region
pub fn render_results(frame: &mut Frame, area: Rect, cards: &[ResultCard], scroll: u16) {
    let title = if cards.is_empty() {
        " Results ".to_string()
    } else {
        format!(" Results ({}) ", cards.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = build_lines(cards, inner.width);
    let max_scroll = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(inner.height);

    let paragraph = Paragraph::new(lines).scroll((scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Link;

    fn card() -> ResultCard {
        ResultCard {
            index: 0,
            title: "Backend Engineer".into(),
            subtitle: Some("Full-time at Acme".into()),
            score: None,
            body: "Build services.".into(),
            fields: vec![("Location", "Remote".into()), ("Salary", String::new())],
            link: Some(Link {
                label: "View Job Posting".into(),
                url: "https://jobs.example/1".into(),
            }),
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 4), vec![""]);
    }

    #[test]
    fn test_wrap_counts_wide_characters_as_two_columns() {
        let lines = wrap("東京 大阪 名古屋", 6);
        assert_eq!(lines, vec!["東京", "大阪", "名古屋"]);
        assert!(lines.iter().all(|l| UnicodeWidthStr::width(l.as_str()) <= 6));

        assert_eq!(wrap("数据工程师", 4), vec!["数据", "工程", "师"]);
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let lines = build_lines(&[card()], 60);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Location: Remote")));
        assert!(!text.iter().any(|l| l.contains("Salary")));
        assert!(text.iter().any(|l| l.contains("https://jobs.example/1")));
        // header, subtitle, body, one field, link, spacer
        assert_eq!(lines.len(), 6);
    }
}
