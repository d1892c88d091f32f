//! Pure presentation mapping
//!
//! Functions from domain records to printable rows and lines. Nothing here
//! performs I/O or reads clocks; callers pass time in. That keeps every
//! mapping unit-testable with literal inputs and trivially idempotent.

use chrono::NaiveDateTime;

use crate::models::{
    AttendanceRecord, AttendanceStats, CheckInState, EmployeeSummary, LeaveRequest, Role,
    TodayAttendance, UserProfile,
};

/// Placeholder shown instead of the roster when the caller's role may not see it
pub const ROSTER_RESTRICTED: &str = "Employee list only visible to Admin/HR";

const EMPTY_CELL: &str = "-";

/// One printable roster line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub name: String,
    pub job_title: String,
    pub status: String,
}

/// One printable attendance-history line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub work_hours: String,
}

/// One printable leave line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRow {
    pub id: i64,
    pub kind: String,
    pub period: String,
    pub description: String,
    pub status: String,
    pub employee: String,
}

/// Today's check-in panel: the derived state plus its status line.
/// The one available action (if any) comes from the state itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub state: CheckInState,
    pub message: String,
}

/// Roster outcome: either rows, or the privilege-restricted placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterView {
    Staff(Vec<EmployeeRow>),
    Restricted,
}

pub fn employee_rows(employees: &[EmployeeSummary]) -> Vec<EmployeeRow> {
    employees
        .iter()
        .map(|e| EmployeeRow {
            name: format!("{} {}", e.first_name, e.last_name),
            job_title: e
                .job_title
                .clone()
                .unwrap_or_else(|| "Employee".to_string()),
            status: e
                .today_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
        .collect()
}

/// History rows in server order; no client-side sorting or filtering
pub fn attendance_rows(records: &[AttendanceRecord]) -> Vec<AttendanceRow> {
    records
        .iter()
        .map(|r| AttendanceRow {
            date: r.attendance_date.to_string(),
            check_in: time_cell(r.check_in),
            check_out: time_cell(r.check_out),
            work_hours: r
                .work_hours
                .map(|h| format!("{h:.2} hrs"))
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
        })
        .collect()
}

pub fn leave_rows(leaves: &[LeaveRequest]) -> Vec<LeaveRow> {
    leaves
        .iter()
        .map(|l| LeaveRow {
            id: l.leave_id,
            kind: l.leave_type.to_string().to_uppercase(),
            period: format!(
                "{} to {} ({} days)",
                l.start_date,
                l.end_date,
                days_label(l.days_requested)
            ),
            description: l.description.clone().unwrap_or_default(),
            status: l.status.to_string().to_uppercase(),
            employee: l.employee_name.clone().unwrap_or_default(),
        })
        .collect()
}

/// Status panel for today, derived purely from the `(check_in, check_out)` pair
pub fn status_view(today: &TodayAttendance) -> StatusView {
    let state = CheckInState::from_times(today.check_in, today.check_out);
    let message = match state {
        CheckInState::NotCheckedIn => "Not checked in yet".to_string(),
        CheckInState::CheckedIn => match today.check_in {
            Some(at) => format!("Checked in at {}", at.format("%H:%M:%S")),
            None => "Checked in".to_string(),
        },
        CheckInState::CheckedOut => "Checked out for today".to_string(),
    };
    StatusView { state, message }
}

/// Dashboard header line; admins get an explicit prefix
pub fn header_line(profile: &UserProfile) -> String {
    match profile.role {
        Role::Admin => format!("Admin: {}", profile.display_name()),
        _ => profile.display_name().to_string(),
    }
}

/// Wall-clock line; the caller owns the ticking
pub fn clock_line(now: NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Label/value pairs for the monthly stats panel, values verbatim from server
pub fn stats_rows(stats: &AttendanceStats) -> Vec<(String, String)> {
    vec![
        ("Days present".to_string(), stats.days_present.to_string()),
        ("Days absent".to_string(), stats.days_absent.to_string()),
        ("Days on leave".to_string(), stats.days_leave.to_string()),
        (
            "Working days".to_string(),
            stats.total_working_days.to_string(),
        ),
        ("Extra hours".to_string(), format!("{:.2}", stats.extra_hours)),
    ]
}

fn time_cell(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// "3" for whole day counts, "2.5" otherwise; the count itself is server data
fn days_label(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{}", days as i64)
    } else {
        format!("{days}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceAction, LeaveStatus, LeaveType, Role, TodayStatus};
    use chrono::NaiveDate;

    fn employee(status: Option<TodayStatus>) -> EmployeeSummary {
        EmployeeSummary {
            user_id: 2,
            employee_id: Some("AC-RD01".to_string()),
            email: "rina@acme.test".to_string(),
            role: Role::Employee,
            first_name: "Rina".to_string(),
            last_name: "Das".to_string(),
            department: None,
            job_title: None,
            today_status: status,
        }
    }

    fn leave() -> LeaveRequest {
        LeaveRequest {
            leave_id: 7,
            user_id: Some(2),
            leave_type: LeaveType::Sick,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            days_requested: 3.0,
            description: Some("flu".to_string()),
            status: LeaveStatus::Pending,
            employee_name: None,
            employee_id: None,
        }
    }

    #[test]
    fn test_employee_rows_fall_back_on_missing_fields() {
        let rows = employee_rows(&[employee(None)]);
        assert_eq!(rows[0].name, "Rina Das");
        assert_eq!(rows[0].job_title, "Employee");
        assert_eq!(rows[0].status, "unknown");

        let rows = employee_rows(&[employee(Some(TodayStatus::Present))]);
        assert_eq!(rows[0].status, "present");
    }

    #[test]
    fn test_attendance_rows_use_placeholder_cells() {
        let record = AttendanceRecord {
            attendance_id: Some(1),
            attendance_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            check_in: None,
            check_out: None,
            work_hours: None,
            remarks: None,
        };
        let rows = attendance_rows(&[record]);
        assert_eq!(rows[0].date, "2026-03-02");
        assert_eq!(rows[0].check_in, "-");
        assert_eq!(rows[0].check_out, "-");
        assert_eq!(rows[0].work_hours, "-");
    }

    #[test]
    fn test_leave_rows_are_idempotent() {
        let leaves = vec![leave()];
        let first = leave_rows(&leaves);
        let second = leave_rows(&leaves);
        assert_eq!(first, second);
        assert_eq!(first[0].kind, "SICK");
        assert_eq!(first[0].period, "2026-03-09 to 2026-03-11 (3 days)");
        assert_eq!(first[0].status, "PENDING");
    }

    #[test]
    fn test_status_view_messages() {
        let not_in: TodayAttendance =
            serde_json::from_str(r#"{"status": "absent"}"#).unwrap();
        let view = status_view(&not_in);
        assert_eq!(view.state, CheckInState::NotCheckedIn);
        assert_eq!(view.message, "Not checked in yet");
        assert_eq!(view.state.available_action(), Some(AttendanceAction::CheckIn));

        let checked_in: TodayAttendance = serde_json::from_str(
            r#"{"status": "present", "check_in": "2026-03-02T09:12:01"}"#,
        )
        .unwrap();
        let view = status_view(&checked_in);
        assert_eq!(view.message, "Checked in at 09:12:01");
        assert_eq!(view.state.available_action(), Some(AttendanceAction::CheckOut));

        let done: TodayAttendance = serde_json::from_str(
            r#"{"status": "present", "check_in": "2026-03-02T09:12:01", "check_out": "2026-03-02T17:30:00"}"#,
        )
        .unwrap();
        let view = status_view(&done);
        assert_eq!(view.message, "Checked out for today");
        assert_eq!(view.state.available_action(), None);
    }

    #[test]
    fn test_header_line_prefixes_privileged_roles() {
        let admin: UserProfile = serde_json::from_str(
            r#"{"user_id": 1, "email": "boss@acme.test", "role": "admin", "first_name": "Maya"}"#,
        )
        .unwrap();
        assert_eq!(header_line(&admin), "Admin: Maya");

        let worker: UserProfile = serde_json::from_str(
            r#"{"user_id": 2, "email": "rina@acme.test", "role": "employee"}"#,
        )
        .unwrap();
        assert_eq!(header_line(&worker), "rina@acme.test");
    }

    #[test]
    fn test_clock_line_formats_wall_time() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(clock_line(now), "14:05:09");
    }

    #[test]
    fn test_days_label_trims_whole_numbers() {
        assert_eq!(days_label(3.0), "3");
        assert_eq!(days_label(2.5), "2.5");
    }
}
