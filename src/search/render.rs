//! Result rendering
//!
//! Turns a normalized [`ResultItem`] into a [`ResultCard`]: plain, sanitized
//! text fields that the terminal UI and the CLI lay out. Nothing here is ever
//! interpreted as markup or as terminal control sequences.

use crate::search::normalize::{ListingHit, ResultItem};
use serde_json::{Map, Value};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A link shown under a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Display fragment for one search result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    /// Zero-based position in the result list
    pub index: usize,
    pub title: String,
    pub subtitle: Option<String>,
    /// Score rounded to 3 decimals
    pub score: Option<String>,
    pub body: String,
    pub fields: Vec<(&'static str, String)>,
    pub link: Option<Link>,
}

/// Render one item.
pub fn render_item(item: &ResultItem, index: usize) -> ResultCard {
    match item {
        ResultItem::Document(value) => render_document(value, index),
        ResultItem::Listing(hit) => render_listing(hit, index),
    }
}

/// Render every item in order.
pub fn render_all(items: &[ResultItem]) -> Vec<ResultCard> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| render_item(item, i))
        .collect()
}

fn render_document(value: &Value, index: usize) -> ResultCard {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(sanitize)
    };

    let title = text("title")
        .or_else(|| text("source"))
        .unwrap_or_else(|| format!("Result {}", index + 1));

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .map(|s| format!("{:.3}", s));

    let body = text("answer")
        .or_else(|| text("snippet"))
        .or_else(|| text("text"))
        .unwrap_or_else(|| {
            sanitize(&serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
        });

    let link = text("source").or_else(|| text("url")).map(|url| Link {
        label: "Source".to_string(),
        url,
    });

    ResultCard {
        index,
        title,
        subtitle: None,
        score,
        body,
        fields: Vec::new(),
        link,
    }
}

fn render_listing(hit: &ListingHit, index: usize) -> ResultCard {
    let meta = |key: &str| metadata_text(&hit.metadata, key);

    let employment_type = meta("Employment Type");
    let employer = meta("Employer");
    let subtitle = if employment_type.is_empty() && employer.is_empty() {
        None
    } else {
        Some(format!("{} at {}", employment_type, employer))
    };

    let url = meta("URL");
    let link = (!url.is_empty()).then(|| Link {
        label: "View Job Posting".to_string(),
        url,
    });

    ResultCard {
        index,
        title: meta("Title"),
        subtitle,
        score: None,
        body: sanitize(&hit.document),
        fields: vec![
            ("Location", meta("Job Location")),
            ("Salary", meta("Job Salary")),
            (
                "Distance",
                hit.distance.map(|d| d.to_string()).unwrap_or_default(),
            ),
            ("Job Roles", meta("Job Roles")),
        ],
        link,
    }
}

fn metadata_text(metadata: &Map<String, Value>, key: &str) -> String {
    match metadata.get(key) {
        Some(Value::String(s)) => sanitize(s),
        Some(Value::Null) | None => String::new(),
        Some(other) => sanitize(&other.to_string()),
    }
}

/// Remove terminal escape sequences and control characters from untrusted
/// text. Newlines are kept, tabs become spaces.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => skip_escape(&mut chars),
            '\n' => out.push('\n'),
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

fn skip_escape(chars: &mut Peekable<Chars<'_>>) {
    match chars.peek() {
        // CSI: parameters up to a final byte in @..~
        Some('[') => {
            chars.next();
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    break;
                }
            }
        }
        // OSC: terminated by BEL or ESC \
        Some(']') => {
            chars.next();
            while let Some(c) = chars.next() {
                if c == '\u{7}' {
                    break;
                }
                if c == '\u{1b}' {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    break;
                }
            }
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

impl fmt::Display for ResultCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index + 1, self.title)?;
        if let Some(score) = &self.score {
            write!(f, "  (score {})", score)?;
        }
        writeln!(f)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "    {}", subtitle)?;
        }
        for line in self.body.lines() {
            writeln!(f, "    {}", line)?;
        }
        for (label, value) in &self.fields {
            writeln!(f, "    {}: {}", label, value)?;
        }
        if let Some(link) = &self.link {
            writeln!(f, "    {}: {}", link.label, link.url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::normalize::normalize;
    use serde_json::json;

    #[test]
    fn test_title_precedence() {
        let card = render_item(&ResultItem::Document(json!({"title": "T", "source": "S"})), 0);
        assert_eq!(card.title, "T");

        let card = render_item(&ResultItem::Document(json!({"source": "S"})), 0);
        assert_eq!(card.title, "S");

        let card = render_item(&ResultItem::Document(json!({"text": "body"})), 4);
        assert_eq!(card.title, "Result 5");
    }

    #[test]
    fn test_score_rounded_only_when_present() {
        let card = render_item(&ResultItem::Document(json!({"score": 0.987654})), 0);
        assert_eq!(card.score.as_deref(), Some("0.988"));

        let card = render_item(&ResultItem::Document(json!({"title": "x"})), 0);
        assert_eq!(card.score, None);
    }

    #[test]
    fn test_body_precedence() {
        let card = render_item(
            &ResultItem::Document(json!({"answer": "A", "snippet": "S", "text": "T"})),
            0,
        );
        assert_eq!(card.body, "A");

        let card = render_item(&ResultItem::Document(json!({"snippet": "S", "text": "T"})), 0);
        assert_eq!(card.body, "S");

        let card = render_item(&ResultItem::Document(json!({"text": "T"})), 0);
        assert_eq!(card.body, "T");

        let card = render_item(&ResultItem::Document(json!({"id": 7})), 0);
        assert_eq!(card.body, "{\n  \"id\": 7\n}");
    }

    #[test]
    fn test_link_only_with_source_or_url() {
        let card = render_item(&ResultItem::Document(json!({"url": "https://x.test"})), 0);
        assert_eq!(card.link.unwrap().url, "https://x.test");

        let card = render_item(&ResultItem::Document(json!({"title": "none"})), 0);
        assert!(card.link.is_none());
    }

    #[test]
    fn test_answer_response_renders_two_cards() {
        let cards = render_all(&normalize(json!({"answer": "X", "sources": [{"title": "A"}]})));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "AI answer");
        assert_eq!(cards[0].body, "X");
        assert_eq!(cards[1].title, "A");
    }

    #[test]
    fn test_listing_card_reads_metadata_and_distance() {
        let items = normalize(json!({
            "results": {
                "documents": [["Care assistant, nights"]],
                "metadatas": [[{
                    "Title": "Care Assistant",
                    "Employment Type": "Full-time",
                    "Employer": "Acme Care",
                    "Job Location": "York",
                    "URL": "https://jobs.test/1"
                }]],
                "distances": [[0.25]]
            }
        }));
        let card = render_item(&items[0], 0);
        assert_eq!(card.title, "Care Assistant");
        assert_eq!(card.subtitle.as_deref(), Some("Full-time at Acme Care"));
        assert_eq!(card.body, "Care assistant, nights");
        assert!(card.fields.contains(&("Location", "York".to_string())));
        assert!(card.fields.contains(&("Salary", String::new())));
        assert!(card.fields.contains(&("Distance", "0.25".to_string())));
        assert_eq!(card.link.unwrap().label, "View Job Posting");
    }

    #[test]
    fn test_server_text_is_sanitized() {
        let card = render_item(
            &ResultItem::Document(json!({
                "title": "\u{1b}]0;pwned\u{7}Hello\u{1b}[31m",
                "text": "line one\r\nline\ttwo\u{0}"
            })),
            0,
        );
        assert_eq!(card.title, "Hello");
        assert_eq!(card.body, "line one\nline two");
    }

    #[test]
    fn test_display_layout() {
        let card = render_item(&ResultItem::Document(json!({"title": "T", "text": "B"})), 1);
        assert_eq!(card.to_string(), "[2] T\n    B\n");
    }
}
