use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use super::values::{FieldValue, FormValues};
use super::visibility::Visibility;
use crate::validation::FieldErrors;

/// Unique identifier for a mounted form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(usize);

impl FormId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__form_{}", self.0)
    }
}

/// Everything a view needs to render a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Current field values
    pub values: FormValues,
    /// Per-field validation messages
    pub errors: FieldErrors,
    /// True only while a submission is in flight
    pub is_submitting: bool,
    /// Banner message for failures not tied to a field
    pub top_level_error: Option<String>,
    /// Password visibility per field; fields not listed are masked
    pub visibility: IndexMap<String, Visibility>,
}

impl FormState {
    /// Visibility of a field's value.
    pub fn visibility(&self, field: &str) -> Visibility {
        self.visibility.get(field).copied().unwrap_or_default()
    }
}

/// Handle to the state of one mounted form.
///
/// Clones share the same state, so a view and the controller driving it can
/// each hold one. Nothing is shared between separately created forms.
///
/// # Example
///
/// ```
/// use authform_lib::Form;
///
/// let form = Form::new();
/// form.set_value("email", "user@example.com");
/// assert_eq!(form.values().text("email"), "user@example.com");
/// assert!(!form.is_submitting());
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    /// Unique identifier for this form instance
    id: FormId,
    /// Internal state
    inner: Arc<RwLock<FormState>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
    /// Cleared on unmount; late action results are dropped once false
    mounted: Arc<AtomicBool>,
    /// Side actions pending without the submitting flag
    held: Arc<AtomicUsize>,
}

impl Form {
    /// Mount a new form with no values.
    pub fn new() -> Self {
        Self::with_values(FormValues::new())
    }

    /// Mount a new form with initial values.
    pub fn with_values(values: FormValues) -> Self {
        Self {
            id: FormId::new(),
            inner: Arc::new(RwLock::new(FormState {
                values,
                ..Default::default()
            })),
            dirty: Arc::new(AtomicBool::new(true)),
            mounted: Arc::new(AtomicBool::new(true)),
            held: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the unique ID for this form
    pub fn id(&self) -> FormId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Get a copy of the whole state
    pub fn snapshot(&self) -> FormState {
        self.read(|state| state.clone()).unwrap_or_default()
    }

    /// Get a copy of the current values
    pub fn values(&self) -> FormValues {
        self.read(|state| state.values.clone()).unwrap_or_default()
    }

    /// Get a single field value
    pub fn value(&self, field: &str) -> Option<FieldValue> {
        self.read(|state| state.values.get(field).cloned()).flatten()
    }

    /// Get a copy of the current field errors
    pub fn errors(&self) -> FieldErrors {
        self.read(|state| state.errors.clone()).unwrap_or_default()
    }

    /// Get the error message for a field (if any)
    pub fn error(&self, field: &str) -> Option<String> {
        self.read(|state| state.errors.get(field).map(str::to_string))
            .flatten()
    }

    /// Get the top-level error message (if any)
    pub fn top_level_error(&self) -> Option<String> {
        self.read(|state| state.top_level_error.clone()).flatten()
    }

    /// Check if a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.read(|state| state.is_submitting).unwrap_or(false)
    }

    /// Check if any action is pending on this form, including side actions
    /// that do not set `is_submitting`
    pub fn is_busy(&self) -> bool {
        self.held.load(Ordering::SeqCst) > 0 || self.is_submitting()
    }

    /// Get the visibility of a field's value
    pub fn visibility(&self, field: &str) -> Visibility {
        self.read(|state| state.visibility(field)).unwrap_or_default()
    }

    /// Check if the form is still mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Check and reset the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Set a field value and clear that field's error
    pub fn set_value(&self, field: impl Into<String>, value: impl Into<FieldValue>) {
        let field = field.into();
        self.update(|state| {
            state.errors.remove(&field);
            state.values.set(field, value);
        });
    }

    /// Remove a field value, making it absent
    pub fn clear_value(&self, field: &str) {
        self.update(|state| {
            state.errors.remove(field);
            state.values.remove(field);
        });
    }

    /// Replace all field errors
    pub fn set_errors(&self, errors: FieldErrors) {
        self.update(|state| state.errors = errors);
    }

    /// Set or clear the error for a single field
    pub fn set_field_error(&self, field: &str, message: Option<String>) {
        self.update(|state| match message {
            Some(message) => state.errors.insert(field, message),
            None => {
                state.errors.remove(field);
            }
        });
    }

    /// Set or clear the top-level error
    pub fn set_top_level_error(&self, message: Option<String>) {
        self.update(|state| state.top_level_error = message);
    }

    /// Flip the visibility of a field's value and return the new state
    pub fn toggle_visibility(&self, field: &str) -> Visibility {
        let mut toggled = Visibility::default();
        self.update(|state| {
            toggled = state.visibility(field).toggle();
            state.visibility.insert(field.to_string(), toggled);
        });
        toggled
    }

    /// Detach the form; pending action results will be ignored
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Submission lifecycle (called by controllers)
    // -------------------------------------------------------------------------

    /// Enter the submitting state, or return `None` if another action is
    /// already pending or the form is unmounted.
    pub(crate) fn begin_submit(&self) -> Option<InFlight<'_>> {
        self.enter(|state| {
            state.errors.clear();
            state.top_level_error = None;
        })
    }

    /// Like [`Form::begin_submit`], but keeps field errors.
    pub(crate) fn begin_side_action(&self) -> Option<InFlight<'_>> {
        self.enter(|state| state.top_level_error = None)
    }

    /// Mark a side action pending without setting `is_submitting`.
    ///
    /// Several holds may coexist. Submissions are refused while any is alive,
    /// and no hold is granted while a submission is in flight.
    pub(crate) fn hold(&self) -> Option<Hold<'_>> {
        if !self.is_mounted() {
            return None;
        }

        let mut guard = self.inner.write().ok()?;
        if guard.is_submitting {
            return None;
        }
        guard.top_level_error = None;
        self.held.fetch_add(1, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);

        Some(Hold { form: self })
    }

    fn enter(&self, reset: impl FnOnce(&mut FormState)) -> Option<InFlight<'_>> {
        if !self.is_mounted() {
            return None;
        }

        let mut guard = self.inner.write().ok()?;
        if guard.is_submitting || self.held.load(Ordering::SeqCst) > 0 {
            return None;
        }
        guard.is_submitting = true;
        reset(&mut guard);
        self.dirty.store(true, Ordering::SeqCst);

        Some(InFlight {
            form: self,
            armed: true,
        })
    }

    /// Apply a mutation under the write lock and mark the form dirty
    pub(crate) fn update(&self, f: impl FnOnce(&mut FormState)) {
        if let Ok(mut guard) = self.inner.write() {
            f(&mut guard);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&FormState) -> T) -> Option<T> {
        self.inner.read().ok().map(|guard| f(&guard))
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks a submission in flight.
///
/// Settling applies the result and clears `is_submitting` in one write.
/// Dropping an unsettled guard (early return, cancelled future, panic)
/// clears `is_submitting` as well.
pub(crate) struct InFlight<'a> {
    form: &'a Form,
    armed: bool,
}

impl InFlight<'_> {
    pub(crate) fn settle<T>(mut self, f: impl FnOnce(&mut FormState) -> T) -> Option<T> {
        let mut out = None;
        self.form.update(|state| {
            out = Some(f(state));
            state.is_submitting = false;
        });
        self.armed = false;
        out
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.form.update(|state| state.is_submitting = false);
        }
    }
}

/// Keeps [`Form::is_busy`] set until dropped.
pub(crate) struct Hold<'a> {
    form: &'a Form,
}

impl Drop for Hold<'_> {
    fn drop(&mut self) {
        // Released under the write lock so it orders against `enter`
        let _lock = self.form.inner.write();
        self.form.held.fetch_sub(1, Ordering::SeqCst);
        self.form.dirty.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_clears_field_error() {
        let form = Form::new();
        form.set_field_error("email", Some("Please enter a valid email address".into()));
        form.set_field_error("password", Some("too short".into()));

        form.set_value("email", "valid@example.com");

        assert_eq!(form.error("email"), None);
        assert_eq!(form.error("password"), Some("too short".into()));
    }

    #[test]
    fn test_begin_submit_is_exclusive() {
        let form = Form::new();
        form.set_top_level_error(Some("old".into()));
        form.set_field_error("email", Some("old".into()));

        let first = form.begin_submit();
        assert!(first.is_some());
        assert!(form.is_submitting());
        assert_eq!(form.top_level_error(), None);
        assert!(form.errors().is_empty());

        assert!(form.begin_submit().is_none());

        drop(first);
        assert!(!form.is_submitting());
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_settle_clears_submitting() {
        let form = Form::new();
        let in_flight = form.begin_submit().unwrap();
        let seen = in_flight.settle(|state| {
            state.top_level_error = Some("nope".into());
            state.is_submitting
        });
        assert_eq!(seen, Some(true));
        assert!(!form.is_submitting());
        assert_eq!(form.top_level_error(), Some("nope".into()));
    }

    #[test]
    fn test_side_action_keeps_field_errors() {
        let form = Form::new();
        form.set_field_error("email", Some("Please enter a valid email address".into()));
        form.set_top_level_error(Some("old".into()));

        let in_flight = form.begin_side_action().unwrap();
        assert!(form.is_submitting());
        assert_eq!(form.top_level_error(), None);
        assert!(form.error("email").is_some());
        assert!(form.begin_submit().is_none());

        drop(in_flight);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_hold_and_submit_exclude_each_other() {
        let form = Form::new();

        let first = form.hold().unwrap();
        let second = form.hold().unwrap();
        assert!(form.is_busy());
        assert!(!form.is_submitting());
        assert!(form.begin_submit().is_none());

        drop(first);
        assert!(form.begin_submit().is_none());
        drop(second);
        assert!(!form.is_busy());

        let in_flight = form.begin_submit().unwrap();
        assert!(form.hold().is_none());
        drop(in_flight);
        assert!(form.hold().is_some());
    }

    #[test]
    fn test_unmounted_form_refuses_submit() {
        let form = Form::new();
        form.unmount();
        assert!(!form.is_mounted());
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn test_clones_share_state_but_forms_do_not() {
        let form = Form::new();
        let view_handle = form.clone();
        let other = Form::new();

        form.set_value("email", "a@b.co");

        assert_eq!(view_handle.values().text("email"), "a@b.co");
        assert!(other.values().is_empty());
        assert_ne!(form.id(), other.id());
    }

    #[test]
    fn test_toggle_visibility_per_field() {
        let form = Form::new();
        assert!(form.visibility("password").is_masked());
        assert!(form.toggle_visibility("password").visible);
        assert!(form.visibility("confirmPassword").is_masked());
        assert!(form.toggle_visibility("password").is_masked());
    }

    #[test]
    fn test_dirty_tracking() {
        let form = Form::new();
        assert!(form.take_dirty());
        assert!(!form.take_dirty());
        form.set_value("email", "x");
        assert!(form.take_dirty());
    }
}
