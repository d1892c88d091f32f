//! REST client for the attendance service
//!
//! One uniform dispatch path: JSON content type, bearer token injected from
//! the session store when present, server errors mapped into [`ClientError`].
//! A 401 clears the session before the error reaches the caller; deciding
//! where to navigate afterwards is the caller's job, not this layer's.
//!
//! The per-endpoint helpers at the bottom fix path, method and body shape
//! and nothing else.

mod error;

pub use error::ClientError;

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    AttendanceRecord, AttendanceStats, EmployeeSummary, LeaveRequest, LeaveType, Role,
    TodayAttendance, UserProfile,
};
use crate::session::SessionStore;

/// HTTP client for the attendance service
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for the service at `base_url`.
    ///
    /// No request timeout is configured; the transport's defaults apply.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Uniform dispatch: defaults to JSON content, bearer auth when a token
    /// exists. Every failure writes one diagnostic entry before propagating.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth: bool,
    ) -> Result<T, ClientError> {
        let request_id = Uuid::new_v4();
        match self.dispatch(method.clone(), path, body, auth).await {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                tracing::warn!(%request_id, %method, path, error = %err, "api request failed");
                Err(err)
            }
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth: bool,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let token = if auth { self.session.token() } else { None };

        let mut request = self
            .http
            .request(method, &url)
            .headers(base_headers(token.as_deref()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;

        check_status(status, &text, &self.session)?;

        serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
    }

    // ============================================
    // Auth
    // ============================================

    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<TokenResponse, ClientError> {
        let body = serde_json::json!({ "identifier": identifier, "password": password });
        self.request(Method::POST, "/auth/login", Some(&body), true)
            .await
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<TokenResponse, ClientError> {
        let body = to_body(form)?;
        self.request(Method::POST, "/auth/signup", Some(&body), true)
            .await
    }

    /// Fresh profile from the server, as opposed to the cached session copy
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.request(Method::GET, "/auth/me", None, true).await
    }

    // ============================================
    // Employees
    // ============================================

    pub async fn employees(&self) -> Result<Vec<EmployeeSummary>, ClientError> {
        self.request(Method::GET, "/employees", None, true).await
    }

    pub async fn create_employee(&self, form: &NewEmployee) -> Result<Ack, ClientError> {
        let body = to_body(form)?;
        self.request(Method::POST, "/employees", Some(&body), true)
            .await
    }

    pub async fn employee_status(&self, user_id: i64) -> Result<TodayAttendance, ClientError> {
        self.request(
            Method::GET,
            &format!("/employees/{user_id}/status"),
            None,
            true,
        )
        .await
    }

    // ============================================
    // Attendance
    // ============================================

    pub async fn attendance(&self) -> Result<Vec<AttendanceRecord>, ClientError> {
        self.request(Method::GET, "/attendance", None, true).await
    }

    pub async fn check_in(&self) -> Result<Ack, ClientError> {
        self.request(Method::POST, "/attendance/check-in", None, true)
            .await
    }

    pub async fn check_out(&self) -> Result<Ack, ClientError> {
        self.request(Method::POST, "/attendance/check-out", None, true)
            .await
    }

    pub async fn attendance_stats(
        &self,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<AttendanceStats, ClientError> {
        let mut query = Vec::new();
        if let Some(month) = month {
            query.push(format!("month={month}"));
        }
        if let Some(year) = year {
            query.push(format!("year={year}"));
        }
        let path = if query.is_empty() {
            "/attendance/stats".to_string()
        } else {
            format!("/attendance/stats?{}", query.join("&"))
        };
        self.request(Method::GET, &path, None, true).await
    }

    // ============================================
    // Leaves
    // ============================================

    pub async fn leaves(&self) -> Result<Vec<LeaveRequest>, ClientError> {
        self.request(Method::GET, "/leaves", None, true).await
    }

    pub async fn apply_leave(&self, form: &LeaveForm) -> Result<Ack, ClientError> {
        let body = to_body(form)?;
        self.request(Method::POST, "/leaves", Some(&body), true)
            .await
    }

    pub async fn pending_leaves(&self) -> Result<Vec<LeaveRequest>, ClientError> {
        self.request(Method::GET, "/leaves/pending", None, true)
            .await
    }

    pub async fn approve_leave(&self, leave_id: i64) -> Result<Ack, ClientError> {
        self.request(
            Method::PUT,
            &format!("/leaves/{leave_id}/approve"),
            None,
            true,
        )
        .await
    }

    pub async fn reject_leave(&self, leave_id: i64) -> Result<Ack, ClientError> {
        self.request(
            Method::PUT,
            &format!("/leaves/{leave_id}/reject"),
            None,
            true,
        )
        .await
    }
}

/// Content type plus bearer auth when a token is present.
/// The token goes out verbatim; nothing is derived from it client-side.
fn base_headers(token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            headers.insert(AUTHORIZATION, value);
        }
    }
    headers
}

/// Map response status onto the error taxonomy. A 401 clears the session
/// here, exactly once, before the caller sees `Unauthorized`.
fn check_status(status: u16, body: &str, session: &SessionStore) -> Result<(), ClientError> {
    if status == 401 {
        session.clear();
        return Err(ClientError::Unauthorized);
    }
    if !(200..300).contains(&status) {
        return Err(api_error(status, body));
    }
    Ok(())
}

fn api_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| "API request failed".to_string());
    ClientError::Api { status, message }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_decode() {
        ClientError::Parse(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}

fn to_body<T: Serialize>(form: &T) -> Result<Value, ClientError> {
    serde_json::to_value(form).map_err(|e| ClientError::Parse(e.to_string()))
}

// ============================================
// Request/Response DTOs
// ============================================

/// Error body shape of the service (`{"detail": "..."}`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Successful login/signup response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: UserProfile,
}

/// Generic acknowledgement (`{"message": "..."}` plus fields we don't need)
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Company registration form
#[derive(Debug, Clone, Serialize)]
pub struct SignupForm {
    pub company_name: String,
    pub company_prefix: String,
    pub admin_name: String,
    pub admin_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_phone: Option<String>,
    pub admin_password: String,
}

/// Leave submission form
#[derive(Debug, Clone, Serialize)]
pub struct LeaveForm {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Employee creation form (admin/HR)
#[derive(Debug, Clone, Serialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub join_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, Arc<SessionStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SessionStore::open(dir.path().join("session.json")));
        (dir, store)
    }

    #[test]
    fn test_headers_carry_exact_token() {
        let headers = base_headers(Some("t1"));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer t1");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_headers_without_token_have_no_auth() {
        let headers = base_headers(None);
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_unauthorized_clears_session() {
        let (_dir, store) = store();
        store.set_token("stale").unwrap();

        let result = check_status(401, r#"{"detail": "Invalid token"}"#, &store);
        assert!(matches!(result, Err(ClientError::Unauthorized)));
        assert!(store.token().is_none());
        assert!(store.profile().is_none());
    }

    #[test]
    fn test_server_message_survives_to_caller() {
        let (_dir, store) = store();
        let result = check_status(400, r#"{"detail": "Already checked in today"}"#, &store);
        match result {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Already checked in today");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        // Non-401 failures leave the session alone
        store.set_token("t1").unwrap();
        let _ = check_status(500, "", &store);
        assert_eq!(store.token().as_deref(), Some("t1"));
    }

    #[test]
    fn test_missing_detail_falls_back() {
        match api_error(502, "<html>bad gateway</html>") {
            ClientError::Api { message, .. } => assert_eq!(message, "API request failed"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_success_status_passes_through() {
        let (_dir, store) = store();
        assert!(check_status(200, "{}", &store).is_ok());
        assert!(check_status(201, "{}", &store).is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let (_dir, store) = store();
        let client = ApiClient::new("http://localhost:8000/", store);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_leave_form_serializes_without_empty_description() {
        let form = LeaveForm {
            leave_type: LeaveType::Sick,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            description: None,
        };
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["leave_type"], "sick");
        assert!(body.get("description").is_none());
    }
}
