//! Authentication form library
//!
//! Client-side validation and submission flow for sign-in, sign-up and
//! registration forms: a declarative field schema, a pure validation engine,
//! a non-reentrant submission controller with pluggable async actions, and
//! social sign-in triggers.

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod forms;
pub mod http;
pub mod server;
pub mod simulated;
pub mod validation;
pub mod view;

pub use action::{Provider, SubmissionOutcome};
pub use config::AuthConfig;
pub use controller::{LoadingScope, SocialAuthTrigger, SubmissionController, SubmitStatus};
pub use form::{FieldValue, Form, FormState, FormValues, SubmitEvent};
pub use validation::{FieldErrors, FieldSchema};
