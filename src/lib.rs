//! # Punchcard
//!
//! Attendance and leave tracking client for a remote HR service.
//!
//! ## Layers
//!
//! - [`session`]: Persisted session state (token + cached profile)
//! - [`client`]: Authenticated REST dispatch and per-endpoint helpers
//! - [`controller`]: Login and dashboard orchestration, navigation outcomes
//! - [`render`]: Pure mapping from domain records to printable rows
//! - [`config`]: TOML config with environment overrides
//!
//! The controllers never print and the renderer never touches the network,
//! so any front-end can sit on top of the same contract; the bundled CLI is
//! one such front-end.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use punchcard::{ApiClient, LoginController, Nav, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(SessionStore::open(SessionStore::default_path()));
//!     let api = ApiClient::new("http://localhost:8000", session.clone());
//!
//!     let login = LoginController::new(api.clone(), session);
//!     if login.initial_screen() == Nav::Login {
//!         login.submit_login("a@b.com", "secret").await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod models;
pub mod render;
pub mod session;

// Re-export top-level types for convenience
pub use client::{Ack, ApiClient, ClientError, LeaveForm, NewEmployee, SignupForm, TokenResponse};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use controller::{ControlError, DashboardController, LoginController, Nav};

pub use models::{
    AttendanceAction, AttendanceRecord, AttendanceStats, CheckInState, EmployeeSummary,
    LeaveRequest, LeaveStatus, LeaveType, Role, TodayAttendance, TodayStatus, UserProfile,
};

pub use render::{
    AttendanceRow, EmployeeRow, LeaveRow, RosterView, StatusView, ROSTER_RESTRICTED,
};

pub use session::{SessionError, SessionStore};
