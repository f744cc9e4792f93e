//! Field schema and the fluent builder that declares it.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::engine;
use super::result::FieldErrors;
use crate::error::SchemaError;
use crate::form::{FieldValue, FormValues};

/// Type alias for single-field rule closures.
type Check = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// Type alias for cross-field rule closures: `(this value, other value)`.
type CrossCheck = Arc<dyn Fn(&FieldValue, &FieldValue) -> bool + Send + Sync>;

/// A single validation rule: a predicate and the message shown when it fails.
///
/// Rules are skipped for empty values (absent, or blank text) unless marked
/// with [`including_empty`](Self::including_empty); that is how `required`
/// differs from format checks such as `email` or `min_length`.
#[derive(Clone)]
pub struct Rule {
    check: Check,
    message: String,
    applies_to_empty: bool,
}

impl Rule {
    /// Create a rule that passes when `check` returns `true`.
    pub fn new<F>(check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            message: message.into(),
            applies_to_empty: false,
        }
    }

    /// Also evaluate this rule when the value is empty.
    pub fn including_empty(mut self) -> Self {
        self.applies_to_empty = true;
        self
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if the rule is evaluated for empty values.
    pub fn applies_to_empty(&self) -> bool {
        self.applies_to_empty
    }

    /// Evaluate the rule. `None` means the field is absent.
    pub fn passes(&self, value: Option<&FieldValue>) -> bool {
        let empty = value.is_none_or(FieldValue::is_empty);
        if empty && !self.applies_to_empty {
            return true;
        }

        match value {
            Some(value) => (self.check)(value),
            None => (self.check)(&FieldValue::Text(String::new())),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message)
            .field("applies_to_empty", &self.applies_to_empty)
            .finish()
    }
}

/// A rule over two fields, reported on the field it is attached to.
///
/// Absent values on either side are compared as empty text.
#[derive(Clone)]
pub struct CrossFieldRule {
    other: String,
    check: CrossCheck,
    message: String,
}

impl CrossFieldRule {
    /// Create a cross-field rule against `other`.
    pub fn new<F>(other: impl Into<String>, check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue, &FieldValue) -> bool + Send + Sync + 'static,
    {
        Self {
            other: other.into(),
            check: Arc::new(check),
            message: message.into(),
        }
    }

    /// The other field this rule reads.
    pub fn other(&self) -> &str {
        &self.other
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Evaluate the rule against this field's and the other field's values.
    pub fn passes(&self, value: Option<&FieldValue>, other: Option<&FieldValue>) -> bool {
        let empty = FieldValue::Text(String::new());
        (self.check)(value.unwrap_or(&empty), other.unwrap_or(&empty))
    }
}

impl fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossFieldRule")
            .field("other", &self.other)
            .field("message", &self.message)
            .finish()
    }
}

/// The rules declared for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    name: String,
    rules: Vec<Rule>,
    cross_rules: Vec<CrossFieldRule>,
}

impl FieldRules {
    fn new(name: String) -> Self {
        Self {
            name,
            rules: Vec::new(),
            cross_rules: Vec::new(),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-field rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Cross-field rules in evaluation order.
    pub fn cross_rules(&self) -> &[CrossFieldRule] {
        &self.cross_rules
    }
}

/// Declarative validation rules for a whole form.
///
/// Built with [`FieldSchema::builder`]. Field order is declaration order,
/// which is also the order of the resulting [`FieldErrors`].
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    fields: Vec<FieldRules>,
}

impl FieldSchema {
    /// Start declaring a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// All declared fields in order.
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Look up a field's rules.
    pub fn field(&self, name: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Run the schema against `values`.
    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        engine::validate(self, values)
    }

    /// Run a single field's rules against `values`.
    pub fn validate_field(&self, values: &FormValues, field: &str) -> Option<String> {
        engine::validate_field(self, values, field)
    }
}

/// Builder for declaring the fields of a [`FieldSchema`].
///
/// # Example
///
/// ```
/// use authform_lib::FieldSchema;
///
/// let schema = FieldSchema::builder()
///     .field("password")
///         .min_length(8, "Password must be at least 8 characters")
///     .field("confirmPassword")
///         .equals_field("password", "Passwords don't match")
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldRules>,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start declaring rules for a field.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            schema: self,
            current: FieldRules::new(name.into()),
        }
    }

    /// Finish the schema.
    ///
    /// Fails on the first invalid pattern, duplicated field, or cross-field
    /// rule naming a field that was never declared.
    pub fn build(self) -> Result<FieldSchema, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        for field in &self.fields {
            for cross in &field.cross_rules {
                if !self.fields.iter().any(|f| f.name == cross.other) {
                    return Err(SchemaError::UnknownField {
                        field: field.name.clone(),
                        other: cross.other.clone(),
                    });
                }
            }
        }

        Ok(FieldSchema {
            fields: self.fields,
        })
    }

    fn push(&mut self, field: FieldRules) {
        if self.error.is_some() {
            return;
        }
        if self.fields.iter().any(|f| f.name == field.name) {
            self.error = Some(SchemaError::DuplicateField(field.name));
            return;
        }
        self.fields.push(field);
    }
}

/// Builder for adding validation rules to a single field.
#[derive(Debug)]
pub struct FieldBuilder {
    schema: SchemaBuilder,
    current: FieldRules,
}

impl FieldBuilder {
    /// Add a prepared rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.current.rules.push(rule);
        self
    }

    /// Add a custom rule (skipped for empty values).
    pub fn rule<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.with_rule(Rule::new(f, msg))
    }

    /// Add a custom cross-field rule against `other`.
    pub fn cross_rule<F>(mut self, other: impl Into<String>, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&FieldValue, &FieldValue) -> bool + Send + Sync + 'static,
    {
        self.current.cross_rules.push(CrossFieldRule::new(other, f, msg));
        self
    }

    /// Continue to the next field.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        self.finalize().field(name)
    }

    /// Finalize and build the schema.
    pub fn build(self) -> Result<FieldSchema, SchemaError> {
        self.finalize().build()
    }

    /// Finalize this field and return the schema builder.
    fn finalize(self) -> SchemaBuilder {
        let mut schema = self.schema;
        schema.push(self.current);
        schema
    }

    // -------------------------------------------------------------------------
    // Text rules
    // -------------------------------------------------------------------------

    /// Require the field to be present and non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.with_rule(Rule::new(|v| !v.is_empty(), msg).including_empty())
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.as_text().is_some_and(|s| s.chars().count() >= min), msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.as_text().is_some_and(|s| s.chars().count() <= max), msg)
    }

    /// Require a valid email address.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| v.as_text().is_some_and(|s| email_address::EmailAddress::is_valid(s.trim())),
            msg,
        )
    }

    /// Require the value to match a regex pattern.
    ///
    /// An invalid pattern makes [`build`](Self::build) fail.
    pub fn pattern(mut self, pattern: &str, msg: impl Into<String>) -> Self {
        match Regex::new(pattern) {
            Ok(re) => self.rule(move |v| v.as_text().is_some_and(|s| re.is_match(s)), msg),
            Err(source) => {
                if self.schema.error.is_none() {
                    self.schema.error = Some(SchemaError::InvalidPattern {
                        field: self.current.name.clone(),
                        pattern: pattern.to_string(),
                        source,
                    });
                }
                self
            }
        }
    }

    /// Require the value to contain a substring.
    pub fn contains(self, substr: impl Into<String>, msg: impl Into<String>) -> Self {
        let substr = substr.into();
        self.rule(move |v| v.as_text().is_some_and(|s| s.contains(&substr)), msg)
    }

    /// Require the value to be one of `options`.
    pub fn one_of<S: Into<String>>(self, options: impl IntoIterator<Item = S>, msg: impl Into<String>) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.rule(
            move |v| v.as_text().is_some_and(|s| options.iter().any(|o| o == s)),
            msg,
        )
    }

    // -------------------------------------------------------------------------
    // Number rules
    // -------------------------------------------------------------------------

    /// Require a number no smaller than `min`.
    pub fn min(self, min: f64, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.as_number().is_some_and(|n| n >= min), msg)
    }

    /// Require a number no larger than `max`.
    pub fn max(self, max: f64, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.as_number().is_some_and(|n| n <= max), msg)
    }

    // -------------------------------------------------------------------------
    // Bool rules
    // -------------------------------------------------------------------------

    /// Require the checkbox to be checked. Absent counts as unchecked.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        self.with_rule(Rule::new(|v| v.as_bool() == Some(true), msg).including_empty())
    }

    // -------------------------------------------------------------------------
    // Cross-field rules
    // -------------------------------------------------------------------------

    /// Require the value to equal another field's value.
    pub fn equals_field(self, other: impl Into<String>, msg: impl Into<String>) -> Self {
        self.cross_rule(other, |a, b| a == b, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rules_skip_empty_values() {
        let rule = Rule::new(|_| false, "never");
        assert!(rule.passes(None));
        assert!(rule.passes(Some(&FieldValue::text(""))));
        assert!(!rule.passes(Some(&FieldValue::text("x"))));
    }

    #[test]
    fn test_including_empty_rules_see_absent_as_empty_text() {
        let rule = Rule::new(|v| v == &FieldValue::text(""), "saw empty").including_empty();
        assert!(rule.applies_to_empty());
        assert!(rule.passes(None));
    }

    #[test]
    fn test_invalid_pattern_is_a_build_error() {
        let result = FieldSchema::builder()
            .field("code")
            .pattern("[unclosed", "bad")
            .build();

        match result {
            Err(SchemaError::InvalidPattern { field, pattern, .. }) => {
                assert_eq!(field, "code");
                assert_eq!(pattern, "[unclosed");
            }
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let result = FieldSchema::builder()
            .field("email")
            .required("a")
            .field("email")
            .required("b")
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateField(name)) if name == "email"));
    }

    #[test]
    fn test_cross_rule_must_name_declared_field() {
        let result = FieldSchema::builder()
            .field("confirmPassword")
            .equals_field("password", "Passwords don't match")
            .build();
        assert!(matches!(
            result,
            Err(SchemaError::UnknownField { ref field, ref other })
                if field == "confirmPassword" && other == "password"
        ));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let schema = FieldSchema::builder()
            .field("b")
            .field("a")
            .field("c")
            .build()
            .unwrap();
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(schema.field("a").is_some());
        assert!(schema.field("z").is_none());
    }

    #[test]
    fn test_builtin_rules() {
        let email = Rule::new(
            |v| v.as_text().is_some_and(email_address::EmailAddress::is_valid),
            "bad",
        );
        assert!(email.passes(Some(&"valid@example.com".into())));
        assert!(!email.passes(Some(&"invalid-email".into())));

        let schema = FieldSchema::builder()
            .field("age")
            .min(18.0, "too young")
            .max(100.0, "too old")
            .field("terms")
            .checked("accept")
            .build()
            .unwrap();

        let ok = FormValues::new().with("age", 30).with("terms", true);
        assert!(schema.validate(&ok).is_empty());

        let bad = FormValues::new().with("age", 12);
        let errors = schema.validate(&bad);
        assert_eq!(errors.get("age"), Some("too young"));
        assert_eq!(errors.get("terms"), Some("accept"));
    }
}
