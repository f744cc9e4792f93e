//! Configuration

use std::time::Duration;

use url::Url;

use crate::controller::{DEFAULT_FALLBACK_MESSAGE, LoadingScope};
use crate::error::ConfigError;

/// Default base URL of the authentication backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Default sign-in endpoint path, relative to the base URL.
pub const SIGN_IN_PATH: &str = "api/auth/sign-in";

/// Default sign-up endpoint path, relative to the base URL.
pub const SIGN_UP_PATH: &str = "api/auth/sign-up";

/// Configuration for actions and controllers.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use authform_lib::AuthConfig;
///
/// let config = AuthConfig::default()
///     .with_base_url("https://auth.example.com")
///     .with_request_timeout(Duration::from_secs(5));
///
/// assert_eq!(
///     config.sign_in_url().unwrap().as_str(),
///     "https://auth.example.com/api/auth/sign-in"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL endpoint paths are resolved against.
    ///
    /// Default: `http://localhost:3000/`
    pub base_url: String,

    /// Sign-in endpoint path.
    pub sign_in_path: String,

    /// Sign-up endpoint path.
    pub sign_up_path: String,

    /// Per-request timeout for HTTP actions.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Delay of simulated actions.
    ///
    /// Default: 1 second
    pub simulated_delay: Duration,

    /// Where to navigate after a successful submission.
    ///
    /// Default: `/`
    pub redirect_target: String,

    /// Banner text when an action fails without a message.
    pub fallback_message: String,

    /// Busy flag scope for social triggers.
    pub loading_scope: LoadingScope,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sign_in_path: SIGN_IN_PATH.to_string(),
            sign_up_path: SIGN_UP_PATH.to_string(),
            request_timeout: Duration::from_secs(10),
            simulated_delay: Duration::from_millis(1000),
            redirect_target: "/".to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            loading_scope: LoadingScope::Shared,
        }
    }
}

impl AuthConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads overrides from `AUTHFORM_*` environment variables.
    ///
    /// Recognized: `AUTHFORM_BASE_URL`, `AUTHFORM_TIMEOUT_MS`,
    /// `AUTHFORM_SIMULATED_DELAY_MS`, `AUTHFORM_REDIRECT`,
    /// `AUTHFORM_FALLBACK_MESSAGE`, `AUTHFORM_LOADING_SCOPE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads overrides from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("AUTHFORM_BASE_URL") {
            config.base_url = base_url;
            config.base()?;
        }
        if let Some(ms) = lookup("AUTHFORM_TIMEOUT_MS") {
            config.request_timeout = parse_millis("AUTHFORM_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("AUTHFORM_SIMULATED_DELAY_MS") {
            config.simulated_delay = parse_millis("AUTHFORM_SIMULATED_DELAY_MS", &ms)?;
        }
        if let Some(target) = lookup("AUTHFORM_REDIRECT") {
            config.redirect_target = target;
        }
        if let Some(message) = lookup("AUTHFORM_FALLBACK_MESSAGE") {
            config.fallback_message = message;
        }
        if let Some(scope) = lookup("AUTHFORM_LOADING_SCOPE") {
            config.loading_scope = scope
                .parse()
                .map_err(|_| ConfigError::invalid_value("AUTHFORM_LOADING_SCOPE", scope))?;
        }

        Ok(config)
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the simulated action delay.
    pub fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = delay;
        self
    }

    /// Sets the post-success redirect target.
    pub fn with_redirect_target(mut self, target: impl Into<String>) -> Self {
        self.redirect_target = target.into();
        self
    }

    /// Sets the fallback banner text.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Sets the social busy flag scope.
    pub fn with_loading_scope(mut self, scope: LoadingScope) -> Self {
        self.loading_scope = scope;
        self
    }

    /// Resolve `path` against the base URL.
    ///
    /// The base is treated as a directory, so `http://host/app` and
    /// `http://host/app/` resolve `api/x` to `http://host/app/api/x`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let base = self.base()?;
        base.join(path.trim_start_matches('/'))
            .map_err(|source| ConfigError::InvalidUrl {
                value: path.to_string(),
                source,
            })
    }

    /// The sign-in endpoint.
    pub fn sign_in_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(&self.sign_in_path)
    }

    /// The sign-up endpoint.
    pub fn sign_up_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(&self.sign_up_path)
    }

    fn base(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
            value: self.base_url.clone(),
            source,
        })
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::invalid_value(key, value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.redirect_target, "/");
        assert_eq!(config.simulated_delay, Duration::from_millis(1000));
        assert_eq!(config.loading_scope, LoadingScope::Shared);
        assert_eq!(
            config.sign_in_url().unwrap().as_str(),
            "http://localhost:3000/api/auth/sign-in"
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("AUTHFORM_BASE_URL", "https://example.com/app"),
            ("AUTHFORM_TIMEOUT_MS", "2500"),
            ("AUTHFORM_SIMULATED_DELAY_MS", "0"),
            ("AUTHFORM_REDIRECT", "/dashboard"),
            ("AUTHFORM_LOADING_SCOPE", "per-provider"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.simulated_delay, Duration::ZERO);
        assert_eq!(config.redirect_target, "/dashboard");
        assert_eq!(config.loading_scope, LoadingScope::PerProvider);
        assert_eq!(
            config.sign_up_url().unwrap().as_str(),
            "https://example.com/app/api/auth/sign-up"
        );
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = AuthConfig::from_lookup(lookup_from(&[("AUTHFORM_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "AUTHFORM_TIMEOUT_MS", .. }));

        let err = AuthConfig::from_lookup(lookup_from(&[("AUTHFORM_BASE_URL", "::nope")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err =
            AuthConfig::from_lookup(lookup_from(&[("AUTHFORM_LOADING_SCOPE", "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "AUTHFORM_LOADING_SCOPE", .. }));
    }
}
