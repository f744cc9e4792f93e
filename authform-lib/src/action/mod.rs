//! Submission outcomes and the collaborators a controller talks to

mod notifier;
mod outcome;
mod provider;
mod router;

use std::sync::Arc;

use async_trait::async_trait;

pub use notifier::{LogNotifier, Notifier, RecordingNotifier, Toast, ToastKind};
pub use outcome::SubmissionOutcome;
pub use provider::Provider;
pub use router::{RecordingRouter, Router};

use crate::error::ActionError;
use crate::form::FormValues;

/// The work a form does once its values pass validation.
///
/// Real deployments bind this to an HTTP call
/// ([`HttpSubmitAction`](crate::http::HttpSubmitAction)); demos and tests bind
/// it to a timed fake ([`SimulatedAction`](crate::simulated::SimulatedAction)).
///
/// Return `Ok` whenever the other side answered, including rejections such as
/// wrong credentials. `Err` is reserved for failures that produced no answer.
#[async_trait]
pub trait SubmitAction: Send + Sync {
    /// Submit validated values.
    async fn submit(&self, values: &FormValues) -> Result<SubmissionOutcome, ActionError>;
}

/// The work behind a "Continue with {provider}" button.
#[async_trait]
pub trait SocialAction: Send + Sync {
    /// Start authentication with `provider`.
    async fn authenticate(&self, provider: &Provider) -> Result<SubmissionOutcome, ActionError>;
}

#[async_trait]
impl<T: SubmitAction + ?Sized> SubmitAction for Arc<T> {
    async fn submit(&self, values: &FormValues) -> Result<SubmissionOutcome, ActionError> {
        (**self).submit(values).await
    }
}

#[async_trait]
impl<T: SocialAction + ?Sized> SocialAction for Arc<T> {
    async fn authenticate(&self, provider: &Provider) -> Result<SubmissionOutcome, ActionError> {
        (**self).authenticate(provider).await
    }
}
