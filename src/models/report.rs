use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A generated report. Rendering happens server-side; the client only
/// lists, requests, and deletes report records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type", default)]
    pub kind: ReportKind,
    #[serde(rename = "Ready", default)]
    pub ready: bool,
    #[serde(rename = "CreatedAt", with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    ActivitySummary,
    Attendance,
    VolunteerHours,
    Membership,
    #[serde(other)]
    Other,
}
