//! Login and signup orchestration

use std::sync::Arc;

use crate::client::{ApiClient, SignupForm, TokenResponse};
use crate::controller::{ControlError, Nav};
use crate::session::SessionStore;

/// Controls the sign-in screen: the landing guard, login submission, and
/// company signup. Signup differs from login only in how the front-end
/// presents a failure, so both paths share the same session handling.
pub struct LoginController {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl LoginController {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Landing guard: an existing token goes straight to the dashboard
    /// without contacting the server.
    pub fn initial_screen(&self) -> Nav {
        if self.session.token().is_some() {
            Nav::Dashboard
        } else {
            Nav::Login
        }
    }

    /// `identifier` is an email address or an employee ID; the server decides
    /// which. On failure nothing in the session changes.
    pub async fn submit_login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Nav, ControlError> {
        let granted = self.api.login(identifier, password).await?;
        self.store_session(&granted)?;
        tracing::info!(user_id = granted.user.user_id, "signed in");
        Ok(Nav::Dashboard)
    }

    pub async fn submit_signup(&self, form: &SignupForm) -> Result<Nav, ControlError> {
        let granted = self.api.signup(form).await?;
        self.store_session(&granted)?;
        tracing::info!(user_id = granted.user.user_id, "company registered, admin signed in");
        Ok(Nav::Dashboard)
    }

    pub fn logout(&self) -> Nav {
        self.session.clear();
        tracing::info!("signed out");
        Nav::Login
    }

    fn store_session(&self, granted: &TokenResponse) -> Result<(), ControlError> {
        self.session.set_token(&granted.access_token)?;
        self.session.set_profile(&granted.user)?;
        Ok(())
    }
}
