//! Domain records for the attendance service
//!
//! This module defines the types the remote service exchanges with the client:
//! - `UserProfile`: the signed-in account, cached in the session store
//! - `EmployeeSummary`: one roster entry with today's status
//! - `AttendanceRecord` / `TodayAttendance`: attendance history and today's state
//! - `LeaveRequest`: a time-off submission and its server-owned status
//!
//! Derived business values (work hours, day counts, approval status) are opaque
//! server data; the client only formats them for display.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account role, as issued by the server at login
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Hr,
    Employee,
    /// Any role this client version does not know about
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Roles that get the roster and the employee-management affordances.
    /// Display gate only; the server enforces the real boundary.
    pub fn can_manage_employees(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Hr => write!(f, "hr"),
            Role::Employee => write!(f, "employee"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "hr" => Ok(Role::Hr),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role '{other}', expected admin, hr or employee")),
        }
    }
}

/// Snapshot of the signed-in user, taken from the last login/signup response.
/// Never refreshed automatically; `/auth/me` returns a fresh copy on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

impl UserProfile {
    /// Name shown in the dashboard header, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref())
            .unwrap_or(&self.email)
    }
}

/// Today's attendance state of an employee as reported by the roster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TodayStatus {
    Present,
    Absent,
    Leave,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TodayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodayStatus::Present => write!(f, "present"),
            TodayStatus::Absent => write!(f, "absent"),
            TodayStatus::Leave => write!(f, "leave"),
            TodayStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One roster entry from `GET /employees`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeSummary {
    pub user_id: i64,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub today_status: Option<TodayStatus>,
}

/// One day of the caller's attendance history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceRecord {
    #[serde(default)]
    pub attendance_id: Option<i64>,
    pub attendance_date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    pub check_in: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    pub check_out: Option<NaiveDateTime>,
    /// Server-computed; absent until checked out
    #[serde(default)]
    pub work_hours: Option<f64>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Response of `GET /employees/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodayAttendance {
    pub status: TodayStatus,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    pub check_in: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    pub check_out: Option<NaiveDateTime>,
    #[serde(default)]
    pub leave_type: Option<LeaveType>,
}

/// Check-in lifecycle for the current day
///
/// Derived purely from the `(check_in, check_out)` pair; a conforming server
/// never sends a check-out without a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInState {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

/// The single attendance action the user may take next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

impl CheckInState {
    pub fn from_times(
        check_in: Option<NaiveDateTime>,
        check_out: Option<NaiveDateTime>,
    ) -> Self {
        match (check_in, check_out) {
            (None, _) => CheckInState::NotCheckedIn,
            (Some(_), None) => CheckInState::CheckedIn,
            (Some(_), Some(_)) => CheckInState::CheckedOut,
        }
    }

    /// At most one of check-in or check-out is available at any time.
    pub fn available_action(&self) -> Option<AttendanceAction> {
        match self {
            CheckInState::NotCheckedIn => Some(AttendanceAction::CheckIn),
            CheckInState::CheckedIn => Some(AttendanceAction::CheckOut),
            CheckInState::CheckedOut => None,
        }
    }
}

/// Kind of leave being requested
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Paid,
    Sick,
    Unpaid,
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Paid => write!(f, "paid"),
            LeaveType::Sick => write!(f, "sick"),
            LeaveType::Unpaid => write!(f, "unpaid"),
        }
    }
}

impl std::str::FromStr for LeaveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Ok(LeaveType::Paid),
            "sick" => Ok(LeaveType::Sick),
            "unpaid" => Ok(LeaveType::Unpaid),
            other => Err(format!("unknown leave type '{other}', expected paid, sick or unpaid")),
        }
    }
}

/// Approval state of a leave request, owned by the server
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A leave request as returned by `GET /leaves` and `GET /leaves/pending`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveRequest {
    pub leave_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_requested: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub status: LeaveStatus,
    /// Only populated on admin/HR review listings
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Server-computed monthly attendance statistics (`GET /attendance/stats`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceStats {
    pub days_present: u32,
    pub days_absent: u32,
    pub days_leave: u32,
    pub total_working_days: u32,
    pub extra_hours: f64,
}

/// Timestamp fields the service writes both with and without a UTC offset.
/// Accept either, keeping the wall-clock value as transmitted.
pub(crate) mod lenient_time {
    use super::*;
    use serde::Deserializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s).map(Some).map_err(serde::de::Error::custom),
        }
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| format!("unparseable timestamp '{raw}': {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        lenient_time::parse(s).unwrap()
    }

    #[test]
    fn test_check_in_state_derivation() {
        let t = ts("2026-03-02T09:00:00");
        assert_eq!(CheckInState::from_times(None, None), CheckInState::NotCheckedIn);
        assert_eq!(CheckInState::from_times(Some(t), None), CheckInState::CheckedIn);
        assert_eq!(
            CheckInState::from_times(Some(t), Some(t)),
            CheckInState::CheckedOut
        );
    }

    #[test]
    fn test_available_action_is_exclusive() {
        assert_eq!(
            CheckInState::NotCheckedIn.available_action(),
            Some(AttendanceAction::CheckIn)
        );
        assert_eq!(
            CheckInState::CheckedIn.available_action(),
            Some(AttendanceAction::CheckOut)
        );
        assert_eq!(CheckInState::CheckedOut.available_action(), None);
    }

    #[test]
    fn test_role_parsing_tolerates_unknown() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(role.can_manage_employees());

        let role: Role = serde_json::from_str("\"contractor\"").unwrap();
        assert_eq!(role, Role::Unknown);
        assert!(!role.can_manage_employees());
    }

    #[test]
    fn test_today_attendance_payload_shapes() {
        let absent: TodayAttendance = serde_json::from_str(r#"{"status": "absent"}"#).unwrap();
        assert_eq!(absent.status, TodayStatus::Absent);
        assert!(absent.check_in.is_none());

        let present: TodayAttendance = serde_json::from_str(
            r#"{"status": "present", "check_in": "2026-03-02T09:12:01.123456", "check_out": null}"#,
        )
        .unwrap();
        assert_eq!(present.status, TodayStatus::Present);
        assert!(present.check_in.is_some());
        assert!(present.check_out.is_none());

        let leave: TodayAttendance =
            serde_json::from_str(r#"{"status": "leave", "leave_type": "sick"}"#).unwrap();
        assert_eq!(leave.leave_type, Some(LeaveType::Sick));
    }

    #[test]
    fn test_lenient_time_accepts_both_forms() {
        let naive = ts("2026-03-02T09:12:01.123456");
        let offset = ts("2026-03-02T09:12:01+00:00");
        assert_eq!(naive.format("%H:%M:%S").to_string(), "09:12:01");
        assert_eq!(offset.format("%H:%M:%S").to_string(), "09:12:01");
    }

    #[test]
    fn test_leave_request_ignores_extra_row_fields() {
        let raw = r#"{
            "leave_id": 7,
            "user_id": 3,
            "leave_type": "paid",
            "start_date": "2026-03-09",
            "end_date": "2026-03-11",
            "days_requested": 3,
            "is_paid": true,
            "description": "family visit",
            "status": "pending",
            "approver_id": null,
            "created_at": "2026-03-01T08:00:00"
        }"#;
        let leave: LeaveRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(leave.leave_id, 7);
        assert_eq!(leave.days_requested, 3.0);
        assert_eq!(leave.status, LeaveStatus::Pending);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut profile: UserProfile = serde_json::from_str(
            r#"{"user_id": 1, "email": "a@b.com", "role": "employee"}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), "a@b.com");

        profile.first_name = Some("Asha".to_string());
        assert_eq!(profile.display_name(), "Asha");
    }
}
