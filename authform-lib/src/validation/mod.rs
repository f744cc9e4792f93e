//! Form validation system.
//!
//! A [`FieldSchema`] declares an ordered list of rules per field; the engine
//! runs it against [`FormValues`](crate::FormValues) and produces a
//! [`FieldErrors`] map with at most one message per field.
//!
//! # Example
//!
//! ```
//! use authform_lib::{FieldSchema, FormValues};
//!
//! let schema = FieldSchema::builder()
//!     .field("email")
//!         .required("Please enter a valid email address")
//!         .email("Please enter a valid email address")
//!     .field("password")
//!         .required("Password must be at least 8 characters")
//!         .min_length(8, "Password must be at least 8 characters")
//!     .build()
//!     .unwrap();
//!
//! let values = FormValues::new()
//!     .with("email", "valid@example.com")
//!     .with("password", "short");
//!
//! let errors = schema.validate(&values);
//! assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
//! assert_eq!(errors.get("email"), None);
//! ```

mod engine;
mod error_display;
mod result;
mod schema;

pub use engine::{validate, validate_field};
pub use error_display::ErrorDisplay;
pub use result::FieldErrors;
pub use schema::{CrossFieldRule, FieldBuilder, FieldRules, FieldSchema, Rule, SchemaBuilder};
