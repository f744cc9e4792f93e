use serde::Deserialize;
use serde::Serialize;

use crate::validation::FieldErrors;

/// The answer a submit or social action produced.
///
/// Serialized with a `kind` tag:
///
/// ```
/// use authform_lib::SubmissionOutcome;
///
/// let json = serde_json::to_string(&SubmissionOutcome::success("/")).unwrap();
/// assert_eq!(json, r#"{"kind":"success","redirectTarget":"/"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SubmissionOutcome {
    /// Accepted; navigate to `redirect_target`.
    Success { redirect_target: String },
    /// Rejected with a message for the top-level banner.
    Failure { message: String },
    /// Rejected with per-field messages.
    FieldErrors { errors: FieldErrors },
}

impl SubmissionOutcome {
    /// Creates a success outcome.
    pub fn success(redirect_target: impl Into<String>) -> Self {
        Self::Success {
            redirect_target: redirect_target.into(),
        }
    }

    /// Creates a failure outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Creates a field errors outcome.
    pub fn field_errors(errors: FieldErrors) -> Self {
        Self::FieldErrors { errors }
    }

    /// Returns `true` for success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
