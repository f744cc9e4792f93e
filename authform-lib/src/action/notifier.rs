use std::sync::{Arc, Mutex};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient announcement, shown independently of inline field errors.
///
/// # Example
///
/// ```
/// use authform_lib::action::{Toast, ToastKind};
///
/// let toast = Toast::success("Signed in successfully!");
/// assert_eq!(toast.kind, ToastKind::Success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    /// Create an info toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }

    /// Create a success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    /// Create a warning toast.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Warning,
            message: message.into(),
        }
    }

    /// Create an error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Toast/notification collaborator.
pub trait Notifier: Send + Sync {
    /// Show a toast.
    fn show(&self, toast: Toast);
}

/// Writes toasts to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Info | ToastKind::Success => log::info!("{}", toast.message),
            ToastKind::Warning => log::warn!("{}", toast.message),
            ToastKind::Error => log::error!("{}", toast.message),
        }
    }
}

/// Keeps every toast shown. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All toasts shown, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}
