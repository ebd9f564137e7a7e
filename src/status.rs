//! Status lines shown next to each control.

use crate::types::AppError;

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: crate::search::render::sanitize(&text.into()),
            tone,
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Neutral)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Success)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Warning)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Error)
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }
}

impl From<&AppError> for StatusLine {
    fn from(err: &AppError) -> Self {
        StatusLine::error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_from_app_error() {
        let status = StatusLine::from(&AppError::Server {
            status: 502,
            body: "upstream down".into(),
        });
        assert!(status.is_error());
        assert_eq!(status.text, "Server error: 502 upstream down");
    }

    #[test]
    fn test_status_text_is_sanitized() {
        let status = StatusLine::neutral("ok\u{1b}[2J done");
        assert_eq!(status.text, "ok done");
        assert_eq!(status.tone, Tone::Neutral);
    }
}
