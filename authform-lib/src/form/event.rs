/// A form submit event as delivered by the presentation layer.
///
/// The submission controller always suppresses the default behaviour
/// (a full page navigation in a browser); views can check
/// [`is_default_prevented`](Self::is_default_prevented) to honour that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// Create a new submit event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the environment's default submit behaviour.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check if the default behaviour was suppressed.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
