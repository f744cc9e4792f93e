//! Static description of how a form is laid out

use crate::action::Provider;
use crate::validation::ErrorDisplay;

/// Kind of input control backing a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Checkbox,
    /// Pick one of `(value, label)` pairs.
    Select(Vec<(String, String)>),
}

/// One field of a [`FormLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    /// Helper text shown under the field.
    pub hint: Option<String>,
}

impl FieldLayout {
    fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            placeholder: None,
            hint: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn select<V, L>(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = (V, L)>,
    ) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(value, label)| (value.into(), label.into()))
            .collect();
        Self::new(name, label, FieldKind::Select(options))
    }

    /// Set the placeholder.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the helper text.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Whether values of this field are masked until revealed.
    pub fn is_secret(&self) -> bool {
        self.kind == FieldKind::Password
    }

    /// Label of a select option, if `value` is one.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        match &self.kind {
            FieldKind::Select(options) => options
                .iter()
                .find(|(v, _)| v == value)
                .map(|(_, label)| label.as_str()),
            _ => None,
        }
    }
}

/// Title, fields, and buttons of a form screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
    pub title: String,
    pub subtitle: Option<String>,
    pub fields: Vec<FieldLayout>,
    pub submit_label: String,
    /// Submit label while a submission is in flight.
    pub loading_label: String,
    /// Providers offered as "Continue with" buttons.
    pub providers: Vec<Provider>,
    pub error_display: ErrorDisplay,
}

impl FormLayout {
    /// Create a layout with a `Submit` button and no fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            fields: Vec::new(),
            submit_label: "Submit".to_string(),
            loading_label: "Submitting...".to_string(),
            providers: Vec::new(),
            error_display: ErrorDisplay::default(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn field(mut self, field: FieldLayout) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the submit label and its in-flight variant.
    pub fn submit(mut self, label: impl Into<String>, loading: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self.loading_label = loading.into();
        self
    }

    pub fn provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn error_display(mut self, display: ErrorDisplay) -> Self {
        self.error_display = display;
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The label the submit button shows.
    pub fn submit_text(&self, is_submitting: bool) -> &str {
        if is_submitting {
            &self.loading_label
        } else {
            &self.submit_label
        }
    }
}
