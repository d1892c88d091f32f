//! View controllers
//!
//! Controllers orchestrate user actions: they call the API client, update the
//! session store, and hand domain records to the renderer. They return view
//! models and navigation outcomes; they never print and never decide how an
//! error is presented.

mod dashboard;
mod login;

pub use dashboard::DashboardController;
pub use login::LoginController;

use thiserror::Error;

use crate::client::ClientError;
use crate::session::SessionError;

/// Where the front-end should take the user next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Login,
    Dashboard,
}

/// Failures crossing the controller boundary
#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ControlError {
    /// True when the session was rejected and the user must sign in again
    pub fn needs_login(&self) -> bool {
        matches!(self, ControlError::Client(ClientError::Unauthorized))
    }
}
