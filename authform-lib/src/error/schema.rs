//! Schema construction error types

/// Errors that can occur while building a [`FieldSchema`](crate::FieldSchema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A `pattern` rule was given an invalid regular expression.
    #[error("Invalid pattern '{pattern}' for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        source: regex::Error,
    },

    /// The same field was declared twice.
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A cross-field rule refers to a field the schema does not declare.
    #[error("Field '{field}' refers to undeclared field '{other}'")]
    UnknownField { field: String, other: String },
}
