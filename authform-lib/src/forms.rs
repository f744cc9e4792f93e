//! Stock sign-in, sign-up, and registration forms
//!
//! Each form comes as a schema, a layout, and its initial values. Messages
//! are public so front ends and tests can match on them.

use std::fmt;
use std::str::FromStr;

use crate::action::Provider;
use crate::error::SchemaError;
use crate::form::FormValues;
use crate::validation::FieldSchema;
use crate::view::{FieldLayout, FormLayout};

pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_NEEDS_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub const PASSWORD_NEEDS_LOWERCASE: &str = "Password must contain at least one lowercase letter";
pub const PASSWORD_NEEDS_NUMBER: &str = "Password must contain at least one number";
pub const PASSWORDS_MISMATCH: &str = "Passwords don't match";
pub const FIRST_NAME_TOO_SHORT: &str = "First name must be at least 2 characters";
pub const LAST_NAME_TOO_SHORT: &str = "Last name must be at least 2 characters";

/// Failure message the sign-in endpoint answers with for bad credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";

/// Fallback banner when creating an account fails without a message.
pub const SIGN_UP_FAILED: &str = "Failed to create account. Please try again.";

pub const NAME_TOO_SHORT: &str = "Name should have at least 2 characters";
pub const REGISTRATION_EMAIL_INVALID: &str = "Invalid email";
pub const AGE_TOO_LOW: &str = "You must be at least 18";
pub const AGE_TOO_HIGH: &str = "Age cannot exceed 100";
pub const OCCUPATION_MISSING: &str = "Please select an occupation";
pub const REGISTRATION_PASSWORD_NEEDS_UPPERCASE: &str = "Password must include an uppercase letter";
pub const REGISTRATION_PASSWORD_NEEDS_NUMBER: &str = "Password must include a number";
pub const TERMS_NOT_ACCEPTED: &str = "You must accept the terms and conditions";

/// Options of the registration occupation select, as `(value, label)`.
pub const OCCUPATIONS: [(&str, &str); 5] = [
    ("developer", "Developer"),
    ("designer", "Designer"),
    ("manager", "Manager"),
    ("student", "Student"),
    ("other", "Other"),
];

/// Email and password, both required.
///
/// Empty fields fail with the same message as malformed ones.
pub fn sign_in_schema() -> Result<FieldSchema, SchemaError> {
    FieldSchema::builder()
        .field("email")
        .required(EMAIL_INVALID)
        .email(EMAIL_INVALID)
        .field("password")
        .required(PASSWORD_TOO_SHORT)
        .min_length(8, PASSWORD_TOO_SHORT)
        .build()
}

/// Names, email, and a strong password entered twice.
pub fn sign_up_schema() -> Result<FieldSchema, SchemaError> {
    FieldSchema::builder()
        .field("firstName")
        .required(FIRST_NAME_TOO_SHORT)
        .min_length(2, FIRST_NAME_TOO_SHORT)
        .field("lastName")
        .required(LAST_NAME_TOO_SHORT)
        .min_length(2, LAST_NAME_TOO_SHORT)
        .field("email")
        .required(EMAIL_INVALID)
        .email(EMAIL_INVALID)
        .field("password")
        .required(PASSWORD_TOO_SHORT)
        .min_length(8, PASSWORD_TOO_SHORT)
        .pattern("[A-Z]", PASSWORD_NEEDS_UPPERCASE)
        .pattern("[a-z]", PASSWORD_NEEDS_LOWERCASE)
        .pattern("[0-9]", PASSWORD_NEEDS_NUMBER)
        .field("confirmPassword")
        .equals_field("password", PASSWORDS_MISMATCH)
        .build()
}

/// The registration demo: profile, age range, occupation, password, terms.
pub fn registration_schema() -> Result<FieldSchema, SchemaError> {
    FieldSchema::builder()
        .field("name")
        .required(NAME_TOO_SHORT)
        .min_length(2, NAME_TOO_SHORT)
        .field("email")
        .required(REGISTRATION_EMAIL_INVALID)
        .email(REGISTRATION_EMAIL_INVALID)
        .field("age")
        .required(AGE_TOO_LOW)
        .min(18.0, AGE_TOO_LOW)
        .max(100.0, AGE_TOO_HIGH)
        .field("occupation")
        .required(OCCUPATION_MISSING)
        .field("password")
        .required(PASSWORD_TOO_SHORT)
        .min_length(8, PASSWORD_TOO_SHORT)
        .pattern("[A-Z]", REGISTRATION_PASSWORD_NEEDS_UPPERCASE)
        .pattern("[0-9]", REGISTRATION_PASSWORD_NEEDS_NUMBER)
        .field("confirmPassword")
        .equals_field("password", PASSWORDS_MISMATCH)
        .field("termsAccepted")
        .checked(TERMS_NOT_ACCEPTED)
        .build()
}

pub fn sign_in_layout() -> FormLayout {
    FormLayout::new("Welcome back")
        .subtitle("Enter your credentials to access your account")
        .field(FieldLayout::email("email", "Email").placeholder("name@example.com"))
        .field(FieldLayout::password("password", "Password").placeholder("Your password"))
        .submit("Sign in", "Signing in...")
        .provider(Provider::Google)
        .provider(Provider::GitHub)
}

pub fn sign_up_layout() -> FormLayout {
    FormLayout::new("Create an account")
        .subtitle("Enter your details to sign up")
        .field(FieldLayout::text("firstName", "First Name").placeholder("John"))
        .field(FieldLayout::text("lastName", "Last Name").placeholder("Doe"))
        .field(FieldLayout::email("email", "Email").placeholder("name@example.com"))
        .field(
            FieldLayout::password("password", "Password")
                .placeholder("Create a strong password")
                .hint("Password must be at least 8 characters and include uppercase, lowercase, and numbers"),
        )
        .field(FieldLayout::password("confirmPassword", "Confirm Password").placeholder("Confirm your password"))
        .submit("Create Account", "Creating account...")
        .provider(Provider::Google)
        .provider(Provider::GitHub)
}

pub fn registration_layout() -> FormLayout {
    FormLayout::new("Registration")
        .field(FieldLayout::text("name", "Full Name").placeholder("John Doe"))
        .field(FieldLayout::email("email", "Email").placeholder("your@email.com"))
        .field(FieldLayout::number("age", "Age").placeholder("Your age"))
        .field(FieldLayout::select("occupation", "Occupation", OCCUPATIONS).placeholder("Select your occupation"))
        .field(FieldLayout::password("password", "Password").placeholder("Password"))
        .field(FieldLayout::password("confirmPassword", "Confirm Password").placeholder("Confirm your password"))
        .field(FieldLayout::checkbox("termsAccepted", "I accept the terms and conditions"))
        .submit("Submit", "Submitting...")
}

/// One of the bundled forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockForm {
    SignIn,
    SignUp,
    Registration,
}

impl StockForm {
    pub fn schema(self) -> Result<FieldSchema, SchemaError> {
        match self {
            Self::SignIn => sign_in_schema(),
            Self::SignUp => sign_up_schema(),
            Self::Registration => registration_schema(),
        }
    }

    pub fn layout(self) -> FormLayout {
        match self {
            Self::SignIn => sign_in_layout(),
            Self::SignUp => sign_up_layout(),
            Self::Registration => registration_layout(),
        }
    }

    /// Values a freshly mounted form starts with.
    pub fn initial_values(self) -> FormValues {
        match self {
            Self::SignIn => FormValues::new().with("email", "").with("password", ""),
            Self::SignUp => FormValues::new()
                .with("firstName", "")
                .with("lastName", "")
                .with("email", "")
                .with("password", "")
                .with("confirmPassword", ""),
            Self::Registration => FormValues::new()
                .with("name", "")
                .with("email", "")
                .with("age", 18)
                .with("occupation", "")
                .with("password", "")
                .with("confirmPassword", "")
                .with("termsAccepted", false),
        }
    }

    /// Verb used in social sign-in failure messages.
    pub fn social_verb(self) -> &'static str {
        match self {
            Self::SignUp => "signup",
            Self::SignIn | Self::Registration => "sign in",
        }
    }

    /// Banner text for failures without a message, if the form has its own.
    pub fn fallback_message(self) -> Option<&'static str> {
        match self {
            Self::SignUp => Some(SIGN_UP_FAILED),
            Self::SignIn | Self::Registration => None,
        }
    }
}

impl fmt::Display for StockForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SignIn => "sign-in",
            Self::SignUp => "sign-up",
            Self::Registration => "registration",
        };
        f.write_str(name)
    }
}

impl FromStr for StockForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sign-in" | "signin" => Ok(Self::SignIn),
            "sign-up" | "signup" => Ok(Self::SignUp),
            "registration" | "register" => Ok(Self::Registration),
            other => Err(format!("unknown form '{}'", other)),
        }
    }
}
