use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A club activity users can register for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "ClubID")]
    pub club_id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "EndTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "Capacity", default)]
    pub capacity: u32,
    #[serde(rename = "Registered", default)]
    pub registered: u32,
    #[serde(rename = "Status", default)]
    pub status: ActivityStatus,
}

impl Activity {
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.registered >= self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}
