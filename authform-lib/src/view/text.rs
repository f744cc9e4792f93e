//! Plain-text form renderer

use std::fmt::Write;

use super::{FieldKind, FieldLayout, FormLayout, FormView};
use crate::form::{FieldValue, FormState};
use crate::validation::ErrorDisplay;

const MASK: char = '•';

/// Renders a form as plain text lines.
///
/// Each `render` call replaces the previous output.
///
/// ```text
/// Sign in
///
/// ! Invalid email or password. Please try again.
///
/// Email: test@example.com
/// Password: ••••••••
///
/// [ Sign in ]
/// ```
#[derive(Debug, Default, Clone)]
pub struct TextRenderer {
    output: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output of the last render.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Take the output of the last render, leaving it empty.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    fn display_value(state: &FormState, field: &FieldLayout) -> String {
        let value = state.values.get(&field.name);

        match (&field.kind, value) {
            (FieldKind::Checkbox, value) => {
                let checked = value.and_then(FieldValue::as_bool).unwrap_or(false);
                let mark = if checked { "[x]" } else { "[ ]" };
                mark.to_string()
            }
            (_, None) => String::new(),
            (_, Some(value)) if value.is_empty() => String::new(),
            (FieldKind::Password, Some(value)) if state.visibility(&field.name).is_masked() => {
                MASK.to_string().repeat(value.to_string().chars().count())
            }
            (FieldKind::Select(_), Some(value)) => {
                let raw = value.to_string();
                field.option_label(&raw).map(str::to_string).unwrap_or(raw)
            }
            (_, Some(value)) => value.to_string(),
        }
    }
}

impl FormView for TextRenderer {
    fn render(&mut self, state: &FormState, layout: &FormLayout) {
        let mut out = String::new();

        let _ = writeln!(out, "{}", layout.title);
        if let Some(subtitle) = &layout.subtitle {
            let _ = writeln!(out, "{}", subtitle);
        }
        out.push('\n');

        if let Some(banner) = &state.top_level_error {
            let _ = writeln!(out, "! {}", banner);
            out.push('\n');
        }

        for field in &layout.fields {
            let value = Self::display_value(state, field);
            let error = state.errors.get(&field.name);

            let mut line = match field.kind {
                FieldKind::Checkbox => format!("{} {}", value, field.label),
                _ if value.is_empty() => match &field.placeholder {
                    Some(placeholder) => format!("{}: ({})", field.label, placeholder),
                    None => format!("{}:", field.label),
                },
                _ => format!("{}: {}", field.label, value),
            };

            if error.is_some() && layout.error_display == ErrorDisplay::None {
                line.push_str(" *");
            }
            if let Some(message) = error
                && layout.error_display == ErrorDisplay::Inline
            {
                let _ = write!(line, "  ({})", message);
            }
            let _ = writeln!(out, "{}", line);

            if let Some(message) = error
                && layout.error_display == ErrorDisplay::Below
            {
                let _ = writeln!(out, "  {}", message);
            }
            if let Some(hint) = &field.hint {
                let _ = writeln!(out, "  {}", hint);
            }
        }

        out.push('\n');
        let _ = writeln!(out, "[ {} ]", layout.submit_text(state.is_submitting));

        if !layout.providers.is_empty() {
            let labels: Vec<&str> = layout.providers.iter().map(|p| p.label()).collect();
            let _ = writeln!(out, "Or continue with: {}", labels.join(", "));
        }

        self.output = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Provider;
    use crate::form::{FormValues, Visibility};
    use crate::validation::FieldErrors;

    fn layout() -> FormLayout {
        FormLayout::new("Sign in")
            .field(FieldLayout::email("email", "Email").placeholder("example@email.com"))
            .field(FieldLayout::password("password", "Password"))
            .submit("Sign in", "Signing in...")
    }

    fn state(values: FormValues) -> FormState {
        FormState {
            values,
            ..FormState::default()
        }
    }

    #[test]
    fn test_masks_password_until_revealed() {
        let mut state = state(
            FormValues::new()
                .with("email", "test@example.com")
                .with("password", "secret12"),
        );
        let mut view = TextRenderer::new();

        view.render(&state, &layout());
        assert!(view.output().contains("Email: test@example.com"));
        assert!(view.output().contains("Password: ••••••••"));
        assert!(!view.output().contains("secret12"));

        state.visibility.insert("password".into(), Visibility::VISIBLE);
        view.render(&state, &layout());
        assert!(view.output().contains("Password: secret12"));
    }

    #[test]
    fn test_placeholder_banner_and_loading_label() {
        let mut state = state(FormValues::new());
        state.top_level_error = Some("Invalid email or password. Please try again.".into());
        state.is_submitting = true;

        let mut view = TextRenderer::new();
        view.render(&state, &layout());
        let out = view.take_output();

        assert!(out.contains("! Invalid email or password. Please try again."));
        assert!(out.contains("Email: (example@email.com)"));
        assert!(out.contains("[ Signing in... ]"));
        assert!(view.output().is_empty());
    }

    #[test]
    fn test_error_display_modes() {
        let mut state = state(FormValues::new().with("email", "nope"));
        state.errors = FieldErrors::from_iter([("email", "Please enter a valid email address")]);
        let mut view = TextRenderer::new();

        view.render(&state, &layout());
        assert!(
            view.output()
                .contains("Email: nope\n  Please enter a valid email address\n")
        );

        view.render(&state, &layout().error_display(ErrorDisplay::Inline));
        assert!(
            view.output()
                .contains("Email: nope  (Please enter a valid email address)\n")
        );

        view.render(&state, &layout().error_display(ErrorDisplay::None));
        assert!(view.output().contains("Email: nope *\n"));
        assert!(!view.output().contains("valid email"));
    }

    #[test]
    fn test_checkbox_select_and_providers() {
        let layout = FormLayout::new("Register")
            .field(FieldLayout::select(
                "occupation",
                "Occupation",
                [("developer", "Developer")],
            ))
            .field(FieldLayout::checkbox("termsAccepted", "I accept the terms"))
            .provider(Provider::Google)
            .provider(Provider::GitHub);
        let state = state(
            FormValues::new()
                .with("occupation", "developer")
                .with("termsAccepted", true),
        );

        let mut view = TextRenderer::new();
        view.render(&state, &layout);

        assert!(view.output().contains("Occupation: Developer"));
        assert!(view.output().contains("[x] I accept the terms"));
        assert!(view.output().contains("Or continue with: Google, GitHub"));
    }
}
