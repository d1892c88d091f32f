//! Punchcard CLI
//!
//! Command-line front-end for the attendance service:
//! - Sign in / sign up / sign out
//! - Check in and check out for the day
//! - Roster, attendance history, monthly stats
//! - Leave requests and (for admin/HR) leave review
//!
//! The CLI owns all printing and process exits; everything it shows comes
//! from the controllers and the pure renderer.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use punchcard::{
    config, ApiClient, AttendanceAction, AttendanceRow, Config, ControlError,
    DashboardController, LeaveForm, LeaveRow, LeaveType, LoginController, Nav, NewEmployee, Role,
    RosterView, SessionStore, SignupForm, StatusView, UserProfile, ROSTER_RESTRICTED,
};

#[derive(Parser)]
#[command(name = "punchcard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Attendance and leave tracking from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Attendance service base URL (overrides config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to an alternate config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with an email address or employee ID
    Login {
        identifier: String,
        #[arg(short, long)]
        password: String,
    },

    /// Register a new company with its first admin account
    Signup {
        #[arg(long)]
        company_name: String,
        /// Short prefix used to build employee IDs (2-5 chars)
        #[arg(long)]
        company_prefix: String,
        #[arg(long)]
        admin_name: String,
        #[arg(long)]
        admin_email: String,
        #[arg(long)]
        admin_password: String,
        #[arg(long)]
        admin_phone: Option<String>,
    },

    /// Sign out and forget the local session
    Logout,

    /// Show today's check-in status
    Status,

    /// Check in for today
    CheckIn,

    /// Check out for today
    CheckOut,

    /// Show the employee roster with today's status (admin/HR)
    Employees,

    /// Add an employee (admin/HR)
    AddEmployee {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// admin, hr or employee
        #[arg(long, default_value = "employee")]
        role: Role,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
        /// Defaults to today
        #[arg(long)]
        join_date: Option<NaiveDate>,
    },

    /// Show your attendance history
    Attendance,

    /// Monthly attendance statistics
    Stats {
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List your leave requests
    Leaves,

    /// Apply for leave
    Apply {
        /// paid, sick or unpaid
        #[arg(long)]
        leave_type: LeaveType,
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long)]
        end_date: NaiveDate,
        #[arg(long)]
        description: Option<String>,
    },

    /// Review pending leave requests (admin/HR)
    Pending,

    /// Approve a pending leave request (admin/HR)
    Approve { leave_id: i64 },

    /// Reject a pending leave request (admin/HR)
    Reject { leave_id: i64 },

    /// Show the signed-in profile as the server sees it
    Whoami,

    /// Full dashboard; --watch keeps it refreshing with a live clock
    Dashboard {
        #[arg(long)]
        watch: bool,
    },

    /// Generate a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    let base_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| config.api.base_url.clone());

    let session = Arc::new(SessionStore::open(&config.session.file));
    let api = ApiClient::new(&base_url, session.clone());
    let login = LoginController::new(api.clone(), session.clone());
    let dashboard = DashboardController::new(api, session.clone());

    match cli.command {
        Commands::Login {
            identifier,
            password,
        } => {
            if login.initial_screen() == Nav::Dashboard {
                let who = session
                    .profile()
                    .map(|p| p.display_name().to_string())
                    .unwrap_or_else(|| "a signed-in user".to_string());
                println!("Already signed in as {who}. Run `punchcard logout` to switch accounts.");
                return Ok(());
            }
            match login.submit_login(&identifier, &password).await {
                Ok(_) => println!("Signed in. Run `punchcard dashboard` to get started."),
                Err(err) => fail(err),
            }
        }

        Commands::Signup {
            company_name,
            company_prefix,
            admin_name,
            admin_email,
            admin_password,
            admin_phone,
        } => {
            if login.initial_screen() == Nav::Dashboard {
                println!("Already signed in. Run `punchcard logout` before registering a company.");
                return Ok(());
            }
            let form = SignupForm {
                company_name,
                company_prefix,
                admin_name,
                admin_email,
                admin_phone,
                admin_password,
            };
            match login.submit_signup(&form).await {
                Ok(_) => println!("Company registered. You are signed in as its admin."),
                Err(err) => fail(err),
            }
        }

        Commands::Logout => {
            login.logout();
            println!("Signed out.");
        }

        Commands::Status => {
            require_signed_in(&dashboard);
            let view = unwrap_or_fail(dashboard.attendance_status().await);
            print_status(&view);
        }

        Commands::CheckIn => {
            require_signed_in(&dashboard);
            let message = unwrap_or_fail(dashboard.check_in().await);
            println!("{message}");
            refresh_after_attendance_write(&dashboard).await;
        }

        Commands::CheckOut => {
            require_signed_in(&dashboard);
            let message = unwrap_or_fail(dashboard.check_out().await);
            println!("{message}");
            refresh_after_attendance_write(&dashboard).await;
        }

        Commands::Employees => {
            require_signed_in(&dashboard);
            let roster = unwrap_or_fail(dashboard.roster().await);
            print_roster(&roster);
        }

        Commands::AddEmployee {
            first_name,
            last_name,
            email,
            phone,
            role,
            department,
            job_title,
            join_date,
        } => {
            require_signed_in(&dashboard);
            if !dashboard.can_manage_employees() {
                eprintln!("Note: adding employees is an Admin/HR action; the server may refuse.");
            }
            let form = NewEmployee {
                first_name,
                last_name,
                email,
                phone,
                role,
                department,
                job_title,
                join_date: join_date.unwrap_or_else(|| Local::now().date_naive()),
            };
            let message = unwrap_or_fail(dashboard.add_employee(&form).await);
            println!("{message}");
        }

        Commands::Attendance => {
            require_signed_in(&dashboard);
            let rows = unwrap_or_fail(dashboard.attendance_history().await);
            print_attendance(&rows);
        }

        Commands::Stats { month, year } => {
            require_signed_in(&dashboard);
            let stats = unwrap_or_fail(dashboard.monthly_stats(month, year).await);
            for (label, value) in punchcard::render::stats_rows(&stats) {
                println!("{label:<15} {value}");
            }
        }

        Commands::Leaves => {
            require_signed_in(&dashboard);
            let rows = unwrap_or_fail(dashboard.leaves().await);
            print_leaves(&rows, false);
        }

        Commands::Apply {
            leave_type,
            start_date,
            end_date,
            description,
        } => {
            require_signed_in(&dashboard);
            let form = LeaveForm {
                leave_type,
                start_date,
                end_date,
                description,
            };
            let message = unwrap_or_fail(dashboard.submit_leave(&form).await);
            println!("{message}");
            // Read-after-write: show the list the server now has
            let rows = unwrap_or_fail(dashboard.leaves().await);
            print_leaves(&rows, false);
        }

        Commands::Pending => {
            require_signed_in(&dashboard);
            let rows = unwrap_or_fail(dashboard.pending_leaves().await);
            if rows.is_empty() {
                println!("No pending leave requests.");
            } else {
                print_leaves(&rows, true);
            }
        }

        Commands::Approve { leave_id } => {
            require_signed_in(&dashboard);
            let message = unwrap_or_fail(dashboard.approve_leave(leave_id).await);
            println!("{message}");
        }

        Commands::Reject { leave_id } => {
            require_signed_in(&dashboard);
            let message = unwrap_or_fail(dashboard.reject_leave(leave_id).await);
            println!("{message}");
        }

        Commands::Whoami => {
            require_signed_in(&dashboard);
            let profile = unwrap_or_fail(dashboard.whoami().await);
            print_profile(&profile);
        }

        Commands::Dashboard { watch } => {
            let profile = require_signed_in(&dashboard);
            if watch {
                run_watch(&dashboard, &profile).await;
            } else {
                let snapshot = load_snapshot(&dashboard).await;
                print_dashboard(&dashboard, &profile, &snapshot);
            }
        }

        Commands::Config { output } => {
            let content = config::generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{content}");
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &punchcard::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("punchcard={}", config.level)),
    );

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Client-side convenience check; the server stays authoritative.
fn require_signed_in(dashboard: &DashboardController) -> UserProfile {
    match dashboard.guard() {
        Ok(profile) => profile,
        Err(_) => {
            eprintln!(
                "Not signed in. Run `punchcard login <email-or-employee-id> --password <password>` first."
            );
            std::process::exit(1);
        }
    }
}

fn unwrap_or_fail<T>(result: Result<T, ControlError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fail(err),
    }
}

/// One user-visible message per failure; an expired session gets the
/// sign-in hint (the session store is already cleared by then).
fn fail(err: ControlError) -> ! {
    if err.needs_login() {
        eprintln!(
            "Session expired. Sign in again with `punchcard login <email-or-employee-id> --password <password>`."
        );
    } else {
        eprintln!("{err}");
    }
    std::process::exit(1);
}

/// No optimistic updates: after a successful check-in/out, re-fetch what the
/// server now believes and show that.
async fn refresh_after_attendance_write(dashboard: &DashboardController) {
    let view = unwrap_or_fail(dashboard.attendance_status().await);
    print_status(&view);
    let rows = unwrap_or_fail(dashboard.attendance_history().await);
    print_attendance(&rows);
}

fn print_status(view: &StatusView) {
    println!("{}", view.message);
    match view.state.available_action() {
        Some(AttendanceAction::CheckIn) => println!("Next: punchcard check-in"),
        Some(AttendanceAction::CheckOut) => println!("Next: punchcard check-out"),
        None => {}
    }
}

fn print_roster(roster: &RosterView) {
    match roster {
        RosterView::Restricted => println!("{ROSTER_RESTRICTED}"),
        RosterView::Staff(rows) => {
            if rows.is_empty() {
                println!("No employees yet.");
                return;
            }
            println!("{:<25} {:<20} {}", "Name", "Job title", "Today");
            println!("{}", "-".repeat(55));
            for row in rows {
                println!("{:<25} {:<20} {}", row.name, row.job_title, row.status);
            }
        }
    }
}

fn print_attendance(rows: &[AttendanceRow]) {
    if rows.is_empty() {
        println!("No attendance records yet.");
        return;
    }
    println!(
        "{:<12} {:<10} {:<10} {}",
        "Date", "Check-in", "Check-out", "Hours"
    );
    println!("{}", "-".repeat(45));
    for row in rows {
        println!(
            "{:<12} {:<10} {:<10} {}",
            row.date, row.check_in, row.check_out, row.work_hours
        );
    }
}

fn print_leaves(rows: &[LeaveRow], with_employee: bool) {
    if rows.is_empty() {
        println!("No leave requests yet.");
        return;
    }
    for row in rows {
        if with_employee && !row.employee.is_empty() {
            println!("#{} {} [{}] {} - {}", row.id, row.kind, row.status, row.employee, row.period);
        } else {
            println!("#{} {} [{}] {}", row.id, row.kind, row.status, row.period);
        }
        if !row.description.is_empty() {
            println!("    {}", row.description);
        }
    }
}

fn print_profile(profile: &UserProfile) {
    println!("{}", punchcard::render::header_line(profile));
    println!("  user id:     {}", profile.user_id);
    println!("  email:       {}", profile.email);
    println!("  role:        {}", profile.role);
    if let Some(employee_id) = &profile.employee_id {
        println!("  employee id: {employee_id}");
    }
    if let Some(department) = &profile.department {
        println!("  department:  {department}");
    }
    if let Some(job_title) = &profile.job_title {
        println!("  job title:   {job_title}");
    }
}

struct DashboardSnapshot {
    status: Result<StatusView, ControlError>,
    roster: Result<RosterView, ControlError>,
    history: Result<Vec<AttendanceRow>, ControlError>,
    leaves: Result<Vec<LeaveRow>, ControlError>,
}

/// Each section loads independently; one failing section must not blank the
/// others. An expired session is the exception and aborts the command.
async fn load_snapshot(dashboard: &DashboardController) -> DashboardSnapshot {
    let snapshot = DashboardSnapshot {
        status: dashboard.attendance_status().await,
        roster: dashboard.roster().await,
        history: dashboard.attendance_history().await,
        leaves: dashboard.leaves().await,
    };
    for err in [
        snapshot.status.as_ref().err(),
        snapshot.roster.as_ref().err(),
        snapshot.history.as_ref().err(),
        snapshot.leaves.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        if err.needs_login() {
            eprintln!(
                "Session expired. Sign in again with `punchcard login <email-or-employee-id> --password <password>`."
            );
            std::process::exit(1);
        }
    }
    snapshot
}

fn print_dashboard(
    dashboard: &DashboardController,
    profile: &UserProfile,
    snapshot: &DashboardSnapshot,
) {
    println!(
        "{}  {}",
        punchcard::render::header_line(profile),
        punchcard::render::clock_line(Local::now().naive_local())
    );
    println!();

    println!("Today");
    match &snapshot.status {
        Ok(view) => print_status(view),
        Err(err) => println!("({err})"),
    }
    println!();

    println!("Employees");
    match &snapshot.roster {
        Ok(roster) => print_roster(roster),
        Err(err) => println!("({err})"),
    }
    if dashboard.can_manage_employees() {
        println!("Add staff with `punchcard add-employee`.");
    }
    println!();

    println!("Attendance");
    match &snapshot.history {
        Ok(rows) => print_attendance(rows),
        Err(err) => println!("({err})"),
    }
    println!();

    println!("Leaves");
    match &snapshot.leaves {
        Ok(rows) => print_leaves(rows, false),
        Err(err) => println!("({err})"),
    }
}

/// Live mode: the clock ticks every second regardless of network state;
/// the data sections refresh every thirty seconds.
async fn run_watch(dashboard: &DashboardController, profile: &UserProfile) {
    const REFRESH_EVERY_SECS: u64 = 30;

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    let mut snapshot = load_snapshot(dashboard).await;
    let mut seconds = 0u64;

    loop {
        ticker.tick().await;
        if seconds > 0 && seconds % REFRESH_EVERY_SECS == 0 {
            snapshot = load_snapshot(dashboard).await;
        }
        print!("\x1b[2J\x1b[H");
        print_dashboard(dashboard, profile, &snapshot);
        println!();
        println!("(refreshes every {REFRESH_EVERY_SECS}s, Ctrl-C to quit)");
        seconds += 1;
    }
}
