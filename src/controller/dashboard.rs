//! Dashboard orchestration
//!
//! Each loader is independent and idempotent: status, roster, history, and
//! leaves can be fetched in any order and re-fetched after a write. There is
//! no optimistic local update anywhere; after a successful check-in,
//! check-out, or leave submission the front-end refreshes the affected views.

use std::sync::Arc;

use crate::client::{ApiClient, ClientError, LeaveForm, NewEmployee};
use crate::controller::{ControlError, Nav};
use crate::models::{AttendanceStats, UserProfile};
use crate::render::{self, AttendanceRow, LeaveRow, RosterView, StatusView};
use crate::session::SessionStore;

pub struct DashboardController {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl DashboardController {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Entry guard: a dashboard needs both a cached profile and a token.
    /// Convenience only; the server rejecting a request remains the
    /// authoritative check.
    pub fn guard(&self) -> Result<UserProfile, Nav> {
        match (self.session.profile(), self.session.token()) {
            (Some(profile), Some(_)) => Ok(profile),
            _ => Err(Nav::Login),
        }
    }

    /// Display-only gate for the employee-management affordances
    pub fn can_manage_employees(&self) -> bool {
        self.session
            .profile()
            .map(|p| p.role.can_manage_employees())
            .unwrap_or(false)
    }

    /// Today's check-in panel for the signed-in user
    pub async fn attendance_status(&self) -> Result<StatusView, ControlError> {
        let profile = self
            .guard()
            .map_err(|_| ControlError::Client(ClientError::Unauthorized))?;
        let today = self.api.employee_status(profile.user_id).await?;
        Ok(render::status_view(&today))
    }

    /// Record a check-in. The caller refreshes the status and history views
    /// on success; on failure the views stay as they were.
    pub async fn check_in(&self) -> Result<String, ControlError> {
        let ack = self.api.check_in().await?;
        Ok(ack.message_or("Checked in"))
    }

    pub async fn check_out(&self) -> Result<String, ControlError> {
        let ack = self.api.check_out().await?;
        Ok(ack.message_or("Checked out"))
    }

    /// Full roster with today's status. A permission refusal is not a fault:
    /// non-privileged roles get the restricted placeholder instead.
    pub async fn roster(&self) -> Result<RosterView, ControlError> {
        match self.api.employees().await {
            Ok(list) => Ok(RosterView::Staff(render::employee_rows(&list))),
            Err(err) if err.is_permission_denied() => {
                tracing::debug!("roster restricted for this role");
                Ok(RosterView::Restricted)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The signed-in user's attendance history, in server-returned order
    pub async fn attendance_history(&self) -> Result<Vec<AttendanceRow>, ControlError> {
        let records = self.api.attendance().await?;
        Ok(render::attendance_rows(&records))
    }

    pub async fn leaves(&self) -> Result<Vec<LeaveRow>, ControlError> {
        let leaves = self.api.leaves().await?;
        Ok(render::leave_rows(&leaves))
    }

    /// Submit a leave request. On success the front-end closes the form and
    /// refreshes the list; on failure the form stays open for correction.
    pub async fn submit_leave(&self, form: &LeaveForm) -> Result<String, ControlError> {
        let ack = self.api.apply_leave(form).await?;
        Ok(ack.message_or("Leave request submitted"))
    }

    /// Pending queue for reviewers (admin/HR)
    pub async fn pending_leaves(&self) -> Result<Vec<LeaveRow>, ControlError> {
        let leaves = self.api.pending_leaves().await?;
        Ok(render::leave_rows(&leaves))
    }

    pub async fn approve_leave(&self, leave_id: i64) -> Result<String, ControlError> {
        let ack = self.api.approve_leave(leave_id).await?;
        Ok(ack.message_or("Leave request approved"))
    }

    pub async fn reject_leave(&self, leave_id: i64) -> Result<String, ControlError> {
        let ack = self.api.reject_leave(leave_id).await?;
        Ok(ack.message_or("Leave request rejected"))
    }

    pub async fn add_employee(&self, form: &NewEmployee) -> Result<String, ControlError> {
        let ack = self.api.create_employee(form).await?;
        Ok(ack.message_or("Employee created"))
    }

    /// Fresh profile from the server; the cached session copy is untouched
    pub async fn whoami(&self) -> Result<UserProfile, ControlError> {
        Ok(self.api.me().await?)
    }

    pub async fn monthly_stats(
        &self,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<AttendanceStats, ControlError> {
        Ok(self.api.attendance_stats(month, year).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(dir: &tempfile::TempDir) -> (DashboardController, Arc<SessionStore>) {
        let session = Arc::new(SessionStore::open(dir.path().join("session.json")));
        let api = ApiClient::new("http://localhost:8000", session.clone());
        (DashboardController::new(api, session.clone()), session)
    }

    fn profile(role: &str) -> UserProfile {
        serde_json::from_str(&format!(
            r#"{{"user_id": 1, "email": "a@b.com", "role": "{role}"}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_guard_requires_profile_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let (dashboard, session) = controller(&dir);

        assert_eq!(dashboard.guard().unwrap_err(), Nav::Login);

        session.set_token("t1").unwrap();
        assert_eq!(dashboard.guard().unwrap_err(), Nav::Login);

        session.set_profile(&profile("employee")).unwrap();
        assert_eq!(dashboard.guard().unwrap().user_id, 1);
    }

    #[test]
    fn test_manage_gate_is_role_based() {
        let dir = tempfile::tempdir().unwrap();
        let (dashboard, session) = controller(&dir);

        assert!(!dashboard.can_manage_employees());

        session.set_token("t1").unwrap();
        session.set_profile(&profile("employee")).unwrap();
        assert!(!dashboard.can_manage_employees());

        session.set_profile(&profile("hr")).unwrap();
        assert!(dashboard.can_manage_employees());

        session.set_profile(&profile("admin")).unwrap();
        assert!(dashboard.can_manage_employees());
    }
}
