use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use super::{Effect, SettleOptions, SubmitStatus, apply_result, run_effects};
use crate::action::{LogNotifier, Notifier, Provider, Router, SocialAction, SubmissionOutcome};
use crate::error::{ActionError, ConfigError};
use crate::form::{Form, Hold, InFlight};

/// How far a busy social trigger disables the other provider buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadingScope {
    /// One busy flag for the whole form: while any provider is pending, all
    /// provider buttons and the submit control are disabled, and the form
    /// reports `is_submitting`.
    #[default]
    Shared,
    /// Each provider has its own busy flag. Submits are still refused while
    /// any provider is pending, but `is_submitting` stays false.
    PerProvider,
}

impl FromStr for LoadingScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per-provider" | "per_provider" => Ok(Self::PerProvider),
            other => Err(ConfigError::invalid_value("loading scope", other)),
        }
    }
}

/// One-shot "Continue with {provider}" actions for a form.
///
/// Failures land in the form's top-level error, successes navigate. The
/// fallback message reads `Failed to {verb} with {provider}. Please try
/// again.`, with `verb` defaulting to `sign in`.
pub struct SocialAuthTrigger {
    form: Form,
    action: Arc<dyn SocialAction>,
    router: Arc<dyn Router>,
    notifier: Arc<dyn Notifier>,
    scope: LoadingScope,
    busy: Arc<Mutex<HashSet<Provider>>>,
    verb: String,
    options: SettleOptions,
}

impl SocialAuthTrigger {
    /// Creates a trigger reporting into `form`.
    pub fn new(form: Form, action: impl SocialAction + 'static, router: impl Router + 'static) -> Self {
        Self {
            form,
            action: Arc::new(action),
            router: Arc::new(router),
            notifier: Arc::new(LogNotifier),
            scope: LoadingScope::default(),
            busy: Arc::new(Mutex::new(HashSet::new())),
            verb: "sign in".to_string(),
            options: SettleOptions::default(),
        }
    }

    /// Sets the busy flag scope.
    pub fn with_scope(mut self, scope: LoadingScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the verb used in the fallback message (e.g. `signup`).
    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = verb.into();
        self
    }

    /// Sets the toast collaborator.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Announces a success toast before navigating.
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.options.success_message = Some(message.into());
        self
    }

    /// The busy flag scope.
    pub fn scope(&self) -> LoadingScope {
        self.scope
    }

    /// Whether `provider`'s button should be disabled right now.
    pub fn is_busy(&self, provider: &Provider) -> bool {
        let Ok(busy) = self.busy.lock() else {
            return false;
        };
        let pending = match self.scope {
            LoadingScope::Shared => !busy.is_empty(),
            LoadingScope::PerProvider => busy.contains(provider),
        };
        pending || self.form.is_submitting()
    }

    /// Whether any provider is pending.
    pub fn is_any_busy(&self) -> bool {
        self.busy.lock().map(|busy| !busy.is_empty()).unwrap_or(false)
    }

    /// The message shown when `provider` fails without one.
    pub fn fallback_message(&self, provider: &Provider) -> String {
        format!("Failed to {} with {}. Please try again.", self.verb, provider)
    }

    /// Run the social action for `provider`.
    pub async fn trigger(&self, provider: Provider) -> SubmitStatus {
        if !self.form.is_mounted() {
            return SubmitStatus::Ignored;
        }

        let Some(pending) = self.claim(&provider) else {
            log::debug!("{}: {} trigger ignored (busy)", self.form.id(), provider);
            return SubmitStatus::Ignored;
        };
        let Some(claim) = self.claim_form() else {
            log::debug!("{}: {} trigger ignored (form busy)", self.form.id(), provider);
            return SubmitStatus::Ignored;
        };

        log::debug!("{}: starting {} sign-in", self.form.id(), provider);
        let result = self.action.authenticate(&provider).await;

        if !self.form.is_mounted() {
            log::debug!("{}: unmounted before {} settled", self.form.id(), provider);
            return SubmitStatus::Detached;
        }

        let fallback = self.fallback_message(&provider);
        let settled = self.settle(claim, result, &fallback);
        drop(pending);

        let Some((status, effects)) = settled else {
            return SubmitStatus::Ignored;
        };
        run_effects(effects, self.router.as_ref(), self.notifier.as_ref());
        status
    }

    fn claim(&self, provider: &Provider) -> Option<Pending<'_>> {
        let mut busy = self.busy.lock().ok()?;
        let blocked = match self.scope {
            LoadingScope::Shared => !busy.is_empty(),
            LoadingScope::PerProvider => busy.contains(provider),
        };
        if blocked || self.form.is_submitting() {
            return None;
        }
        busy.insert(provider.clone());
        Some(Pending {
            busy: &self.busy,
            provider: provider.clone(),
        })
    }

    fn claim_form(&self) -> Option<FormClaim<'_>> {
        match self.scope {
            LoadingScope::Shared => self.form.begin_side_action().map(FormClaim::Submitting),
            LoadingScope::PerProvider => self.form.hold().map(FormClaim::Held),
        }
    }

    fn settle(
        &self,
        claim: FormClaim<'_>,
        result: Result<SubmissionOutcome, ActionError>,
        fallback: &str,
    ) -> Option<(SubmitStatus, Vec<Effect>)> {
        match claim {
            FormClaim::Submitting(in_flight) => {
                in_flight.settle(|state| apply_result(state, result, fallback, &self.options))
            }
            FormClaim::Held(hold) => {
                let mut settled = None;
                self.form
                    .update(|state| settled = Some(apply_result(state, result, fallback, &self.options)));
                drop(hold);
                settled
            }
        }
    }
}

impl std::fmt::Debug for SocialAuthTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialAuthTrigger")
            .field("form", &self.form.id())
            .field("scope", &self.scope)
            .field("verb", &self.verb)
            .finish_non_exhaustive()
    }
}

/// What a pending trigger holds on its form.
enum FormClaim<'a> {
    Submitting(InFlight<'a>),
    Held(Hold<'a>),
}

/// Clears a provider's busy flag when dropped.
struct Pending<'a> {
    busy: &'a Mutex<HashSet<Provider>>,
    provider: Provider,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if let Ok(mut busy) = self.busy.lock() {
            busy.remove(&self.provider);
        }
    }
}
