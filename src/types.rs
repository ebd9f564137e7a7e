// Shared error type for every client operation

/// The three ways a user action can fail. They are reported separately and
/// never folded into one another.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Rejected locally, no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The request completed with a non-2xx status.
    #[error("Server error: {status} {body}")]
    Server { status: u16, body: String },

    /// The request did not complete (or its body could not be read).
    #[error("Network error: {0}")]
    Network(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message_keeps_status_and_body() {
        let err = AppError::Server {
            status: 400,
            body: "bad request".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("bad request"));
    }

    #[test]
    fn test_messages_are_distinct_per_kind() {
        assert_eq!(AppError::validation("Enter a query").to_string(), "Enter a query");
        assert_eq!(
            AppError::Network("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
        assert!(AppError::validation("x").is_validation());
        assert!(!AppError::Network("x".into()).is_validation());
    }
}
