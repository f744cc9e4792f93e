//! Submission action error types

use std::time::Duration;

/// Errors raised by a submit or social action that did not produce an outcome.
///
/// A server that *answers* with a rejection (wrong credentials, taken email)
/// produces a [`SubmissionOutcome`](crate::SubmissionOutcome) instead; this
/// type covers everything that went wrong on the way there.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Network error while reaching the endpoint.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Unexpected HTTP status from the endpoint.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, possibly empty.
        message: String,
    },

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The action gave up without an outcome.
    #[error("{}", .0.as_deref().unwrap_or("Action rejected"))]
    Rejected(Option<String>),
}

impl ActionError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a rejection carrying a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(Some(message.into()))
    }

    /// Creates a rejection without any message.
    pub fn rejected_silently() -> Self {
        Self::Rejected(None)
    }

    /// Returns the message to show the user, if this error carries a
    /// non-empty one.
    ///
    /// Callers fall back to a generic message when this returns `None`.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            Self::Rejected(None) => return None,
            Self::Rejected(Some(message)) => message.clone(),
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        };

        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if resubmitting might succeed without user changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}
