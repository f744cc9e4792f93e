use std::sync::Arc;

use super::{DEFAULT_FALLBACK_MESSAGE, SettleOptions, SubmitStatus, apply_result, run_effects};
use crate::action::{LogNotifier, Notifier, Router, SubmitAction};
use crate::form::{Form, SubmitEvent};
use crate::validation::FieldSchema;

/// Drives one form's submit: validate, invoke the action, settle the state.
///
/// The controller is not re-entrant: while a submission is in flight further
/// submits are ignored, which is what a disabled submit button expresses in
/// a view (see [`can_submit`](Self::can_submit)).
///
/// # Example
///
/// ```no_run
/// use authform_lib::action::RecordingRouter;
/// use authform_lib::forms;
/// use authform_lib::simulated::SimulatedAction;
/// use authform_lib::{Form, SubmissionController, SubmitEvent};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let form = Form::new();
/// let controller = SubmissionController::new(
///     form.clone(),
///     forms::sign_in_schema()?,
///     SimulatedAction::succeed("/"),
///     RecordingRouter::new(),
/// );
///
/// form.set_value("email", "test@example.com");
/// form.set_value("password", "password123");
/// controller.on_submit(&mut SubmitEvent::new()).await;
/// # Ok(())
/// # }
/// ```
pub struct SubmissionController {
    form: Form,
    schema: Arc<FieldSchema>,
    action: Arc<dyn SubmitAction>,
    router: Arc<dyn Router>,
    notifier: Arc<dyn Notifier>,
    fallback_message: String,
    options: SettleOptions,
}

impl SubmissionController {
    /// Creates a controller for `form`.
    ///
    /// Toasts go to the `log` facade until [`with_notifier`](Self::with_notifier)
    /// is called.
    pub fn new(
        form: Form,
        schema: FieldSchema,
        action: impl SubmitAction + 'static,
        router: impl Router + 'static,
    ) -> Self {
        Self {
            form,
            schema: Arc::new(schema),
            action: Arc::new(action),
            router: Arc::new(router),
            notifier: Arc::new(LogNotifier),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            options: SettleOptions::default(),
        }
    }

    /// Sets the toast collaborator.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Sets the banner text used when the action fails without a message.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Announces a success toast before navigating.
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.options.success_message = Some(message.into());
        self
    }

    /// Also announces failures as error toasts.
    pub fn with_failure_toasts(mut self, enabled: bool) -> Self {
        self.options.failure_toasts = enabled;
        self
    }

    /// The form this controller drives.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The schema submits are validated against.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Whether a submit control should be enabled right now.
    ///
    /// False while any action on the form is pending, social sign-in included.
    pub fn can_submit(&self) -> bool {
        self.form.is_mounted() && !self.form.is_busy()
    }

    /// Re-validate one field against the current values and update its error.
    pub fn validate_field(&self, field: &str) -> Option<String> {
        let message = self.schema.validate_field(&self.form.values(), field);
        self.form.set_field_error(field, message.clone());
        message
    }

    /// Handle a submit event.
    ///
    /// Exactly one action call is made per valid submit and none when
    /// validation fails. `is_submitting` is cleared on every exit path,
    /// including when this future is dropped before completing.
    pub async fn on_submit(&self, event: &mut SubmitEvent) -> SubmitStatus {
        event.prevent_default();

        let Some(in_flight) = self.form.begin_submit() else {
            log::debug!("{}: submit ignored (busy or unmounted)", self.form.id());
            return SubmitStatus::Ignored;
        };

        let values = self.form.values();
        let errors = self.schema.validate(&values);
        if !errors.is_empty() {
            log::debug!(
                "{}: validation failed on {} field(s)",
                self.form.id(),
                errors.len()
            );
            in_flight.settle(|state| state.errors = errors);
            return SubmitStatus::Invalid;
        }

        log::debug!("{}: submitting", self.form.id());
        let result = self.action.submit(&values).await;

        if !self.form.is_mounted() {
            log::debug!("{}: unmounted before settle, result dropped", self.form.id());
            return SubmitStatus::Detached;
        }

        let fallback = &self.fallback_message;
        let options = &self.options;
        let Some((status, effects)) =
            in_flight.settle(|state| apply_result(state, result, fallback, options))
        else {
            return SubmitStatus::Ignored;
        };

        log::debug!("{}: settled with {:?}", self.form.id(), status);
        run_effects(effects, self.router.as_ref(), self.notifier.as_ref());
        status
    }
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("form", &self.form.id())
            .field("schema", &self.schema)
            .field("fallback_message", &self.fallback_message)
            .finish_non_exhaustive()
    }
}
