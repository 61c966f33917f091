use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::TokenStore;
use crate::models::Credentials;

use super::event::SubmitEvent;

/// Name of the username input
pub const USERNAME_FIELD: &str = "username";

/// Name of the password input
pub const PASSWORD_FIELD: &str = "password";

/// Where a successful login navigates to
pub const DASHBOARD_TARGET: &str = "dashboard.html";

/// Error text shown when a rejection carries no message
pub const LOGIN_FAILED_FALLBACK: &str = "Login failed";

/// The page hosting the login form.
pub trait LoginView {
    /// Replace the text of the error element
    fn set_error_text(&mut self, text: &str);

    /// Leave the login page for `target`
    fn navigate(&mut self, target: &str);
}

/// Terminal result of a submission that got a parseable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token stored and navigation triggered
    LoggedIn { token: String },
    /// Error text written to the view
    Rejected { status: StatusCode, message: String },
}

/// Failures outside the status-based branch. None of these touch the view.
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Login form has no `{0}` field")]
    MissingField(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Login succeeded but the response carried no token")]
    MissingToken,

    #[error("Failed to store token: {0:#}")]
    Storage(anyhow::Error),
}

/// Handles submissions of the login form.
///
/// Each call is independent: no state is kept between submissions other
/// than what the token store holds, and overlapping calls are not guarded.
pub struct LoginSubmissionHandler<S> {
    api: ApiClient,
    store: S,
    dashboard: String,
}

impl<S: TokenStore> LoginSubmissionHandler<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            dashboard: DASHBOARD_TARGET.to_string(),
        }
    }

    /// Navigate somewhere other than `dashboard.html` on success
    pub fn with_dashboard(mut self, target: impl Into<String>) -> Self {
        self.dashboard = target.into();
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one submit event.
    ///
    /// On a 2xx reply the token is stored and the view navigates; on any
    /// other status the view's error text is set. Exactly one of those
    /// happens when `Ok` is returned, and neither when `Err` is.
    pub async fn handle_submit<V>(
        &self,
        event: &mut SubmitEvent<'_>,
        view: &mut V,
    ) -> Result<LoginOutcome, LoginError>
    where
        V: LoginView + ?Sized,
    {
        event.prevent_default();

        let form = event.form();
        let username = form
            .value(USERNAME_FIELD)
            .ok_or(LoginError::MissingField(USERNAME_FIELD))?;
        let password = form
            .value(PASSWORD_FIELD)
            .ok_or(LoginError::MissingField(PASSWORD_FIELD))?;

        let reply = {
            let credentials = Credentials::new(username, password);
            self.api.login(&credentials).await?
        };

        if reply.is_success() {
            let token = reply.body.token.ok_or(LoginError::MissingToken)?;
            self.store.set_token(&token).map_err(LoginError::Storage)?;
            info!(status = reply.status.as_u16(), target = %self.dashboard, "Login successful");
            view.navigate(&self.dashboard);
            Ok(LoginOutcome::LoggedIn { token })
        } else {
            let message = reply
                .body
                .error
                .unwrap_or_else(|| LOGIN_FAILED_FALLBACK.to_string());
            warn!(status = reply.status.as_u16(), error = %message, "Login rejected");
            view.set_error_text(&message);
            Ok(LoginOutcome::Rejected {
                status: reply.status,
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::MemoryTokenStore;

    #[derive(Default)]
    struct RecordingView {
        error: Option<String>,
        navigations: Vec<String>,
    }

    impl LoginView for RecordingView {
        fn set_error_text(&mut self, text: &str) {
            self.error = Some(text.to_string());
        }

        fn navigate(&mut self, target: &str) {
            self.navigations.push(target.to_string());
        }
    }

    #[tokio::test]
    async fn test_missing_field_prevents_default_and_touches_nothing() {
        // Port 9 (discard) is never contacted: the form check fails first
        let api = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let store = Arc::new(MemoryTokenStore::new());
        let handler = LoginSubmissionHandler::new(api, store.clone());

        let form = [("username", "alice")];
        let mut event = SubmitEvent::new(&form);
        let mut view = RecordingView::default();

        let result = handler.handle_submit(&mut event, &mut view).await;

        assert!(matches!(result, Err(LoginError::MissingField("password"))));
        assert!(event.default_prevented());
        assert!(view.error.is_none());
        assert!(view.navigations.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_with_dashboard_overrides_target() {
        let api = ApiClient::new().unwrap();
        let handler = LoginSubmissionHandler::new(api, MemoryTokenStore::new())
            .with_dashboard("surveys");
        assert_eq!(handler.dashboard, "surveys");
    }

    #[test]
    fn test_storage_error_message_includes_cause() {
        let err = LoginError::Storage(
            anyhow::anyhow!("disk full").context("Failed to write token file"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to store token: Failed to write token file: disk full"
        );
    }
}
