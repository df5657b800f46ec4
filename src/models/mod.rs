pub mod activity;
pub mod club;
pub mod dashboard;
pub mod notification;
pub mod report;
pub mod timestamp;
pub mod user;

pub use activity::{Activity, ActivityStatus};
pub use club::Club;
pub use dashboard::DashboardStats;
pub use notification::{Notification, NotificationKind};
pub use report::{Report, ReportKind};
pub use user::{Role, User};
