use serde::{Deserialize, Serialize};

/// Aggregate counters backing the admin dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    #[serde(rename = "TotalUsers", default)]
    pub total_users: u64,
    #[serde(rename = "TotalClubs", default)]
    pub total_clubs: u64,
    #[serde(rename = "TotalActivities", default)]
    pub total_activities: u64,
    #[serde(rename = "ActiveActivities", default)]
    pub active_activities: u64,
    #[serde(rename = "RegistrationsThisMonth", default)]
    pub registrations_this_month: u64,
}
