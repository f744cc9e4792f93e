//! Password visibility toggle

/// How an input renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// Characters are masked.
    Password,
    /// Characters are shown as typed.
    Text,
}

/// Visibility state of a password input. Masked by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    /// The masked state.
    pub const MASKED: Self = Self { visible: false };

    /// The plain-text state.
    pub const VISIBLE: Self = Self { visible: true };

    /// Return the flipped state.
    pub fn toggle(self) -> Self {
        Self {
            visible: !self.visible,
        }
    }

    /// The input type a view should render for this state.
    pub fn input_type(self) -> InputType {
        if self.visible {
            InputType::Text
        } else {
            InputType::Password
        }
    }

    /// Check if the value is masked.
    pub fn is_masked(self) -> bool {
        !self.visible
    }
}

/// Flip a visibility state.
pub fn toggle(state: Visibility) -> Visibility {
    state.toggle()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_masked() {
        assert_eq!(Visibility::default(), Visibility::MASKED);
        assert_eq!(Visibility::default().input_type(), InputType::Password);
    }

    #[test]
    fn test_toggle_once_shows_text() {
        let shown = toggle(Visibility::MASKED);
        assert!(shown.visible);
        assert_eq!(shown.input_type(), InputType::Text);
    }

    #[test]
    fn test_toggle_twice_restores_mask() {
        let state = Visibility::MASKED;
        assert_eq!(toggle(toggle(state)), state);
        assert_eq!(toggle(toggle(state)).input_type(), InputType::Password);
    }
}
