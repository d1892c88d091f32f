//! Error taxonomy for requests against the attendance service

use thiserror::Error;

/// Errors that can come out of an API call
///
/// `Unauthorized` is terminal for the current session: by the time a caller
/// sees it, the session store has already been cleared, and the only sensible
/// reaction is to send the user back to sign-in.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("session rejected by the server, sign in again")]
    Unauthorized,

    /// The request reached the server and the server said no
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    /// No response received
    #[error("service unreachable: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Parse(String),
}

impl ClientError {
    /// True for responses that mean "your role may not see this", which some
    /// views soft-fail on instead of reporting a fault.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ClientError::Api { status: 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_only_403() {
        let forbidden = ClientError::Api {
            status: 403,
            message: "Admin or HR access required".into(),
        };
        let server_fault = ClientError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert!(forbidden.is_permission_denied());
        assert!(!server_fault.is_permission_denied());
        assert!(!ClientError::Unauthorized.is_permission_denied());
        assert!(!ClientError::Network("refused".into()).is_permission_denied());
    }

    #[test]
    fn test_api_error_displays_server_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Already checked in today".into(),
        };
        assert_eq!(err.to_string(), "Already checked in today");
    }
}
