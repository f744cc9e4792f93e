use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// Validation messages keyed by field name.
///
/// Holds at most one message per field, in schema declaration order.
/// A field without an error is absent; empty messages are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no field has an error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with an error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the message for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Check if a field has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Set the message for a field. Empty messages remove the entry instead.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        if message.is_empty() {
            self.0.shift_remove(&field);
        } else {
            self.0.insert(field, message);
        }
    }

    /// Remove a field's message.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.shift_remove(field)
    }

    /// Remove all messages.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Merge another map into this one; entries from `other` win.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// Get the first invalid field and its message (for focusing).
    pub fn first(&self) -> Option<(&str, &str)> {
        self.0.first().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<IndexMap<String, String>> for FieldErrors {
    fn from(map: IndexMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<FieldErrors> for IndexMap<String, String> {
    fn from(errors: FieldErrors) -> Self {
        errors.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.insert(field, message);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messages_are_not_stored() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "");
        assert!(errors.is_empty());

        errors.insert("email", "bad");
        errors.insert("email", "");
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_merge_overrides_and_appends() {
        let mut errors: FieldErrors = [("email", "old"), ("password", "weak")].into_iter().collect();
        let incoming: FieldErrors = [("email", "taken"), ("firstName", "short")].into_iter().collect();

        errors.merge(incoming);

        assert_eq!(errors.get("email"), Some("taken"));
        assert_eq!(errors.get("password"), Some("weak"));
        assert_eq!(errors.get("firstName"), Some("short"));
        assert_eq!(errors.first(), Some(("email", "taken")));
    }

    #[test]
    fn test_deserialize_drops_empty_entries() {
        let errors: FieldErrors =
            serde_json::from_str(r#"{"email":"An account with this email already exists","password":""}"#)
                .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("email"),
            Some("An account with this email already exists")
        );
    }
}
