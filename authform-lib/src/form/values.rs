//! Field values

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// The value held by a single form field.
///
/// A field that has never been set is *absent* and has no `FieldValue` at
/// all. Text that is empty after trimming counts as empty too; rules treat
/// both the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a numeric value.
    pub fn number(value: impl Into<f64>) -> Self {
        Self::Number(value.into())
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` for blank text. Numbers and booleans are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Current values of a form, keyed by field name in insertion order.
///
/// Serializes as a flat JSON object, which is also the request body the
/// HTTP action posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, FieldValue>);

impl FormValues {
    /// Creates an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.insert(field.into(), value.into())
    }

    /// Removes a field, making it absent.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.shift_remove(field)
    }

    /// Gets a field value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Gets a field as text; absent and non-text fields read as `""`.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Checks if a field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if no field is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_empty() {
        assert!(FieldValue::text("").is_empty());
        assert!(FieldValue::text("   ").is_empty());
        assert!(!FieldValue::text("a").is_empty());
        assert!(!FieldValue::from(false).is_empty());
        assert!(!FieldValue::from(0).is_empty());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(FieldValue::from(18).to_string(), "18");
        assert_eq!(FieldValue::from(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let values = FormValues::new()
            .with("email", "test@example.com")
            .with("age", 30)
            .with("termsAccepted", true);

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"{"email":"test@example.com","age":30.0,"termsAccepted":true}"#
        );

        let back: FormValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_text_reads_absent_as_empty() {
        let values = FormValues::new().with("age", 20);
        assert_eq!(values.text("email"), "");
        assert_eq!(values.text("age"), "");
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut values: FormValues = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        values.remove("b");
        let names: Vec<_> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
