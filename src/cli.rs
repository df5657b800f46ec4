use clap::{Parser, Subcommand, ValueEnum};

use crate::models::ReportKind;

/// Terminal client for the Club & Event Management System
#[derive(Parser)]
#[command(name = "cems", version, about)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "CEMS_BASE_URL")]
    pub base_url: Option<String>,

    /// User to act as
    #[arg(long, env = "CEMS_USER_ID")]
    pub user_id: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow the live notification feed, printing updates as they land
    Watch,

    /// Print the current notification list
    List {
        /// Only show unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification read
    MarkRead {
        #[arg(long)]
        id: i64,
    },

    /// Mark every notification read
    MarkAllRead,

    /// List activities
    Activities,

    /// List clubs
    Clubs,

    /// Manage reports
    Reports {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Print admin dashboard counters
    Dashboard,

    /// Show the acting user's profile
    Whoami,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// List generated reports
    List,
    /// Request a new report
    Request {
        #[arg(long, value_enum)]
        kind: ReportKindArg,
    },
    /// Delete a report
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKindArg {
    ActivitySummary,
    Attendance,
    VolunteerHours,
    Membership,
}

impl From<ReportKindArg> for ReportKind {
    fn from(arg: ReportKindArg) -> Self {
        match arg {
            ReportKindArg::ActivitySummary => ReportKind::ActivitySummary,
            ReportKindArg::Attendance => ReportKind::Attendance,
            ReportKindArg::VolunteerHours => ReportKind::VolunteerHours,
            ReportKindArg::Membership => ReportKind::Membership,
        }
    }
}
