//! Timed fake actions for demos and tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::action::{Provider, SocialAction, SubmissionOutcome, SubmitAction};
use crate::error::ActionError;
use crate::form::FormValues;
use crate::validation::FieldErrors;

/// Default delay before a simulated action resolves.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
enum Script {
    Answer(SubmissionOutcome),
    Reject(Option<String>),
}

/// One recorded invocation of a [`SimulatedAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedCall {
    /// Called as a submit action with these values.
    Submit(FormValues),
    /// Called as a social action for this provider.
    Authenticate(Provider),
}

/// An action that waits, then resolves to a scripted result.
///
/// Clones share the call log.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use authform_lib::simulated::SimulatedAction;
///
/// let action = SimulatedAction::fail("Invalid email or password. Please try again.")
///     .with_delay(Duration::ZERO);
/// assert_eq!(action.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAction {
    script: Script,
    delay: Duration,
    calls: Arc<Mutex<Vec<SimulatedCall>>>,
}

impl SimulatedAction {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            delay: DEFAULT_DELAY,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolves with success, navigating to `redirect_target`.
    pub fn succeed(redirect_target: impl Into<String>) -> Self {
        Self::scripted(Script::Answer(SubmissionOutcome::success(redirect_target)))
    }

    /// Resolves with a failure message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::scripted(Script::Answer(SubmissionOutcome::failure(message)))
    }

    /// Resolves with per-field errors.
    pub fn field_errors(errors: FieldErrors) -> Self {
        Self::scripted(Script::Answer(SubmissionOutcome::field_errors(errors)))
    }

    /// Rejects with an error carrying `message`.
    pub fn reject(message: impl Into<String>) -> Self {
        Self::scripted(Script::Reject(Some(message.into())))
    }

    /// Rejects without any message.
    pub fn reject_without_message() -> Self {
        Self::scripted(Script::Reject(None))
    }

    /// Sets the delay before resolving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<SimulatedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    async fn run(&self, call: SimulatedCall) -> Result<SubmissionOutcome, ActionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.script {
            Script::Answer(outcome) => Ok(outcome.clone()),
            Script::Reject(message) => Err(ActionError::Rejected(message.clone())),
        }
    }
}

#[async_trait]
impl SubmitAction for SimulatedAction {
    async fn submit(&self, values: &FormValues) -> Result<SubmissionOutcome, ActionError> {
        self.run(SimulatedCall::Submit(values.clone())).await
    }
}

#[async_trait]
impl SocialAction for SimulatedAction {
    async fn authenticate(&self, provider: &Provider) -> Result<SubmissionOutcome, ActionError> {
        log::debug!("Simulating {} sign-in", provider.label());
        self.run(SimulatedCall::Authenticate(provider.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let action = SimulatedAction::succeed("/").with_delay(Duration::ZERO);
        let values = FormValues::new().with("email", "a@b.co");

        let outcome = action.submit(&values).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::success("/"));

        action.authenticate(&Provider::GitHub).await.unwrap();
        assert_eq!(
            action.calls(),
            vec![
                SimulatedCall::Submit(values),
                SimulatedCall::Authenticate(Provider::GitHub)
            ]
        );
    }

    #[tokio::test]
    async fn test_clones_share_log() {
        let action = SimulatedAction::reject_without_message().with_delay(Duration::ZERO);
        let clone = action.clone();

        let err = clone.submit(&FormValues::new()).await.unwrap_err();
        assert!(err.user_message().is_none());
        assert_eq!(action.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let action = SimulatedAction::fail("nope");
        let started = tokio::time::Instant::now();
        let outcome = action.submit(&FormValues::new()).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::failure("nope"));
        assert!(started.elapsed() >= DEFAULT_DELAY);
    }
}
