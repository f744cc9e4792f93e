//! HTTP-backed submit action

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::action::{SubmissionOutcome, SubmitAction};
use crate::config::AuthConfig;
use crate::error::{ActionError, ConfigError};
use crate::form::FormValues;
use crate::validation::FieldErrors;

/// Posts form values as JSON to an authentication endpoint.
///
/// Status mapping:
/// - `2xx` → [`SubmissionOutcome::Success`] with the configured redirect
/// - `422` with an `errors` object → [`SubmissionOutcome::FieldErrors`]
/// - other `4xx` → [`SubmissionOutcome::Failure`] with the body's `message`
/// - `5xx` → [`ActionError::Http`]
///
/// # Example
///
/// ```no_run
/// use authform_lib::AuthConfig;
/// use authform_lib::http::HttpSubmitAction;
///
/// let config = AuthConfig::default().with_base_url("http://localhost:3000");
/// let action = HttpSubmitAction::sign_in(&config).unwrap();
/// assert_eq!(action.endpoint().path(), "/api/auth/sign-in");
/// ```
#[derive(Debug, Clone)]
pub struct HttpSubmitAction {
    client: reqwest::Client,
    endpoint: Url,
    redirect_target: String,
    timeout: Duration,
}

impl HttpSubmitAction {
    /// Creates an action posting to `endpoint` with default settings.
    pub fn new(endpoint: Url) -> Self {
        let defaults = AuthConfig::default();
        Self {
            client: reqwest::Client::new(),
            endpoint,
            redirect_target: defaults.redirect_target,
            timeout: defaults.request_timeout,
        }
    }

    /// Creates an action for the configured sign-in endpoint.
    pub fn sign_in(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_config(config, config.sign_in_url()?))
    }

    /// Creates an action for the configured sign-up endpoint.
    pub fn sign_up(config: &AuthConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_config(config, config.sign_up_url()?))
    }

    fn from_config(config: &AuthConfig, endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            redirect_target: config.redirect_target.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Sets where to navigate after a successful response.
    pub fn with_redirect_target(mut self, target: impl Into<String>) -> Self {
        self.redirect_target = target.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses an existing HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The endpoint values are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_transport(&self, err: reqwest::Error) -> ActionError {
        if err.is_timeout() {
            ActionError::Timeout(self.timeout)
        } else {
            ActionError::Network(err)
        }
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<SubmissionOutcome, ActionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(SubmissionOutcome::success(self.redirect_target.clone()));
        }

        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        log::debug!("POST {} answered {}", self.endpoint, status);

        if status == StatusCode::UNPROCESSABLE_ENTITY
            && let Some(errors) = parsed.errors.filter(|e| !e.is_empty())
        {
            return Ok(SubmissionOutcome::field_errors(errors));
        }

        let message = parsed.message.filter(|m| !m.trim().is_empty());

        if status.is_client_error() {
            let message = message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request rejected")
                    .to_string()
            });
            return Ok(SubmissionOutcome::failure(message));
        }

        Err(ActionError::http(status.as_u16(), message.unwrap_or_default()))
    }
}

#[async_trait]
impl SubmitAction for HttpSubmitAction {
    async fn submit(&self, values: &FormValues) -> Result<SubmissionOutcome, ActionError> {
        log::debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(values)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.handle_response(response).await
    }
}

/// Error body returned by the auth endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_config() {
        let config = AuthConfig::default().with_base_url("http://localhost:3000");
        let sign_in = HttpSubmitAction::sign_in(&config).unwrap();
        let sign_up = HttpSubmitAction::sign_up(&config).unwrap();
        assert_eq!(sign_in.endpoint().as_str(), "http://localhost:3000/api/auth/sign-in");
        assert_eq!(sign_up.endpoint().as_str(), "http://localhost:3000/api/auth/sign-up");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = AuthConfig::default().with_base_url("not a url");
        assert!(matches!(
            HttpSubmitAction::sign_in(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_error_body_tolerates_missing_fields() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
        assert!(body.errors.is_none());

        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Invalid email or password. Please try again."}"#).unwrap();
        assert_eq!(
            body.message.as_deref(),
            Some("Invalid email or password. Please try again.")
        );
    }
}
