//! Submission controller and social sign-in triggers
//!
//! Both controllers share the settle step: an action result is turned into a
//! state update on the form, then navigation or a toast. Errors never escape
//! a controller; every exit path leaves the busy flag cleared.

mod social;
mod submit;

pub use social::{LoadingScope, SocialAuthTrigger};
pub use submit::SubmissionController;

use crate::action::{Notifier, Router, SubmissionOutcome, Toast};
use crate::error::ActionError;
use crate::form::FormState;

/// Fallback banner text when a submit action fails without a message.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";

/// Which exit path a submit or trigger call took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Already busy or unmounted; nothing happened.
    Ignored,
    /// Client-side validation failed; no action was invoked.
    Invalid,
    /// The action succeeded and navigation was requested.
    Succeeded { redirect_target: String },
    /// The action answered with a failure message.
    Failed,
    /// The action answered with per-field errors.
    FieldErrors,
    /// The action failed without an answer.
    Rejected,
    /// The form was unmounted before the action settled; the result was dropped.
    Detached,
}

/// Side effects left to run once the state lock is released.
#[derive(Debug)]
enum Effect {
    Navigate(String),
    Announce(Toast),
}

/// Settings shared by both controllers for the settle step.
#[derive(Debug, Clone, Default)]
struct SettleOptions {
    success_message: Option<String>,
    failure_toasts: bool,
}

/// Apply an action result to `state`. Returns the status and the effects
/// to run after the write.
fn apply_result(
    state: &mut FormState,
    result: Result<SubmissionOutcome, ActionError>,
    fallback: &str,
    options: &SettleOptions,
) -> (SubmitStatus, Vec<Effect>) {
    let mut effects = Vec::new();

    let status = match result {
        Ok(SubmissionOutcome::Success { redirect_target }) => {
            state.errors.clear();
            state.top_level_error = None;
            if let Some(message) = &options.success_message {
                effects.push(Effect::Announce(Toast::success(message.clone())));
            }
            effects.push(Effect::Navigate(redirect_target.clone()));
            SubmitStatus::Succeeded { redirect_target }
        }
        Ok(SubmissionOutcome::Failure { message }) => {
            if options.failure_toasts {
                effects.push(Effect::Announce(Toast::error(message.clone())));
            }
            state.top_level_error = Some(message);
            SubmitStatus::Failed
        }
        Ok(SubmissionOutcome::FieldErrors { errors }) => {
            state.errors.merge(errors);
            SubmitStatus::FieldErrors
        }
        Err(err) => {
            log::warn!("Action failed: {}", err);
            let message = err.user_message().unwrap_or_else(|| fallback.to_string());
            if options.failure_toasts {
                effects.push(Effect::Announce(Toast::error(message.clone())));
            }
            state.top_level_error = Some(message);
            SubmitStatus::Rejected
        }
    };

    (status, effects)
}

fn run_effects(effects: Vec<Effect>, router: &dyn Router, notifier: &dyn Notifier) {
    for effect in effects {
        match effect {
            Effect::Navigate(path) => router.navigate(&path),
            Effect::Announce(toast) => notifier.show(toast),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldErrors;

    #[test]
    fn test_success_clears_errors_and_navigates() {
        let mut state = FormState::default();
        state.errors.insert("email", "stale");
        state.top_level_error = Some("stale".into());

        let options = SettleOptions {
            success_message: Some("Signed in successfully!".into()),
            ..Default::default()
        };
        let (status, effects) = apply_result(
            &mut state,
            Ok(SubmissionOutcome::success("/")),
            DEFAULT_FALLBACK_MESSAGE,
            &options,
        );

        assert_eq!(
            status,
            SubmitStatus::Succeeded {
                redirect_target: "/".into()
            }
        );
        assert!(state.errors.is_empty());
        assert_eq!(state.top_level_error, None);
        assert!(matches!(&effects[..], [Effect::Announce(_), Effect::Navigate(p)] if p == "/"));
    }

    #[test]
    fn test_field_errors_merge() {
        let mut state = FormState::default();
        state.errors.insert("password", "weak");

        let incoming: FieldErrors = [("email", "taken")].into_iter().collect();
        let (status, effects) = apply_result(
            &mut state,
            Ok(SubmissionOutcome::field_errors(incoming)),
            DEFAULT_FALLBACK_MESSAGE,
            &SettleOptions::default(),
        );

        assert_eq!(status, SubmitStatus::FieldErrors);
        assert!(effects.is_empty());
        assert_eq!(state.errors.get("email"), Some("taken"));
        assert_eq!(state.errors.get("password"), Some("weak"));
    }

    #[test]
    fn test_rejection_uses_fallback_without_message() {
        let mut state = FormState::default();
        let (status, _) = apply_result(
            &mut state,
            Err(ActionError::rejected_silently()),
            "Fallback",
            &SettleOptions::default(),
        );
        assert_eq!(status, SubmitStatus::Rejected);
        assert_eq!(state.top_level_error.as_deref(), Some("Fallback"));
    }

    #[test]
    fn test_failure_toasts_when_enabled() {
        let mut state = FormState::default();
        let options = SettleOptions {
            failure_toasts: true,
            ..Default::default()
        };
        let (_, effects) = apply_result(
            &mut state,
            Ok(SubmissionOutcome::failure("Invalid email or password. Please try again.")),
            DEFAULT_FALLBACK_MESSAGE,
            &options,
        );
        assert!(matches!(&effects[..], [Effect::Announce(t)] if t == &Toast::error("Invalid email or password. Please try again.")));
    }
}
