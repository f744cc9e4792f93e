//! Validation engine

use super::result::FieldErrors;
use super::schema::{FieldRules, FieldSchema};
use crate::form::FormValues;

/// Run `schema` against `values`.
///
/// For each field in declaration order, rules run in order and the first
/// failing rule's message is recorded. Cross-field rules run only when all of
/// the field's own rules passed. Fields without a failure are absent from the
/// result. Pure and deterministic.
pub fn validate(schema: &FieldSchema, values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in schema.fields() {
        if let Some(message) = check_field(field, values) {
            errors.insert(field.name(), message);
        }
    }

    errors
}

/// Run a single field's rules. Returns `None` for valid or undeclared fields.
pub fn validate_field(schema: &FieldSchema, values: &FormValues, field: &str) -> Option<String> {
    schema.field(field).and_then(|rules| check_field(rules, values))
}

fn check_field(field: &FieldRules, values: &FormValues) -> Option<String> {
    let value = values.get(field.name());

    if let Some(rule) = field.rules().iter().find(|rule| !rule.passes(value)) {
        return Some(rule.message().to_string());
    }

    field
        .cross_rules()
        .iter()
        .find(|rule| !rule.passes(value, values.get(rule.other())))
        .map(|rule| rule.message().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;

    fn password_schema() -> FieldSchema {
        FieldSchema::builder()
            .field("password")
            .min_length(8, "Password must be at least 8 characters")
            .rule(
                |v| v.as_text().is_some_and(|s| s.chars().any(char::is_uppercase)),
                "Password must contain at least one uppercase letter",
            )
            .field("confirmPassword")
            .equals_field("password", "Passwords don't match")
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_values_produce_no_errors() {
        let values = FormValues::new()
            .with("password", "Abcdefgh1")
            .with("confirmPassword", "Abcdefgh1");
        assert!(validate(&password_schema(), &values).is_empty());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let values = FormValues::new()
            .with("password", "short")
            .with("confirmPassword", "short");
        let errors = validate(&password_schema(), &values);
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_later_rule_reported_when_earlier_passes() {
        let values = FormValues::new()
            .with("password", "lowercase only")
            .with("confirmPassword", "lowercase only");
        let errors = validate(&password_schema(), &values);
        assert_eq!(
            errors.get("password"),
            Some("Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_cross_rule_attaches_to_dependent_field() {
        let values = FormValues::new()
            .with("password", "Abc12345")
            .with("confirmPassword", "Abc99999");
        let errors = validate(&password_schema(), &values);
        assert_eq!(errors.get("confirmPassword"), Some("Passwords don't match"));
        assert!(!errors.contains("password"));
    }

    #[test]
    fn test_cross_rule_waits_for_own_rules() {
        let schema = FieldSchema::builder()
            .field("password")
            .field("confirmPassword")
            .min_length(3, "too short")
            .equals_field("password", "Passwords don't match")
            .build()
            .unwrap();

        let values = FormValues::new()
            .with("password", "Abc12345")
            .with("confirmPassword", "ab");
        assert_eq!(
            validate(&schema, &values).get("confirmPassword"),
            Some("too short")
        );
    }

    #[test]
    fn test_absent_and_blank_are_both_empty() {
        let schema = FieldSchema::builder()
            .field("email")
            .required("required")
            .email("format")
            .build()
            .unwrap();

        let absent = FormValues::new();
        let blank = FormValues::new().with("email", "   ");
        assert_eq!(validate(&schema, &absent).get("email"), Some("required"));
        assert_eq!(validate(&schema, &blank).get("email"), Some("required"));

        let optional = FieldSchema::builder()
            .field("email")
            .email("format")
            .build()
            .unwrap();
        assert!(validate(&optional, &absent).is_empty());
        assert!(validate(&optional, &blank).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let schema = password_schema();
        let values = FormValues::new()
            .with("password", "nope")
            .with("confirmPassword", FieldValue::text("x"));
        assert_eq!(validate(&schema, &values), validate(&schema, &values));
    }

    #[test]
    fn test_errors_follow_declaration_order() {
        let schema = FieldSchema::builder()
            .field("z")
            .required("z required")
            .field("a")
            .required("a required")
            .build()
            .unwrap();
        let errors = validate(&schema, &FormValues::new());
        let fields: Vec<_> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["z", "a"]);
    }

    #[test]
    fn test_validate_field() {
        let schema = password_schema();
        let values = FormValues::new().with("password", "short");
        assert_eq!(
            validate_field(&schema, &values, "password"),
            Some("Password must be at least 8 characters".to_string())
        );
        assert_eq!(validate_field(&schema, &values, "unknown"), None);
    }
}
