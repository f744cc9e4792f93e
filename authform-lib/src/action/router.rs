use std::sync::{Arc, Mutex};

/// Navigation collaborator. Invoked only after a successful submission.
pub trait Router: Send + Sync {
    /// Navigate to `path`.
    fn navigate(&self, path: &str);
}

/// A router that records every navigation instead of performing it.
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    history: Arc<Mutex<Vec<String>>>,
}

impl RecordingRouter {
    /// Create a router with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// All paths navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// The most recent path, if any.
    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .ok()
            .and_then(|h| h.last().cloned())
    }
}

impl Router for RecordingRouter {
    fn navigate(&self, path: &str) {
        log::debug!("Navigating to {}", path);
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
    }
}
