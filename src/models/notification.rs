use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// One user-facing notification as delivered by the backend (full fetch
/// or push stream). The client never constructs these itself; it only
/// receives them and flips `is_read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Type", default)]
    pub kind: NotificationKind,
    #[serde(rename = "IsRead", default)]
    pub is_read: bool,
    #[serde(rename = "CreatedAt", with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Fixed tag vocabulary for notifications. Unrecognized tags fall back
/// to [`NotificationKind::Other`] instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Registration,
    Reminder,
    HourApproved,
    NewActivity,
    AttendanceReminder,
    Announcement,
    Activity,
    Success,
    Warning,
    Info,
    System,
    #[serde(other)]
    #[default]
    Other,
}

impl NotificationKind {
    /// Short label for terminal rendering.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Registration => "registration",
            NotificationKind::Reminder => "reminder",
            NotificationKind::HourApproved => "hour_approved",
            NotificationKind::NewActivity => "new_activity",
            NotificationKind::AttendanceReminder => "attendance_reminder",
            NotificationKind::Announcement => "announcement",
            NotificationKind::Activity => "activity",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
            NotificationKind::System => "system",
            NotificationKind::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_shape() {
        let n: Notification = serde_json::from_str(
            r#"{"ID":42,"UserID":7,"Message":"Welcome","Type":"announcement","IsRead":false,"CreatedAt":"2024-03-01T09:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(n.id, 42);
        assert_eq!(n.user_id, 7);
        assert_eq!(n.kind, NotificationKind::Announcement);
        assert!(!n.is_read);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let n: Notification = serde_json::from_str(
            r#"{"ID":1,"UserID":1,"Message":"x","Type":"brand_new_tag","IsRead":true,"CreatedAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Other);
    }

    #[test]
    fn test_missing_kind_and_flags_default() {
        let n: Notification =
            serde_json::from_str(r#"{"ID":1,"UserID":1,"Message":"x"}"#).unwrap();
        assert_eq!(n.kind, NotificationKind::Other);
        assert!(!n.is_read);
    }

    #[test]
    fn test_malformed_created_at_does_not_fail() {
        let n: Notification = serde_json::from_str(
            r#"{"ID":1,"UserID":1,"Message":"x","Type":"info","IsRead":false,"CreatedAt":"not-a-date"}"#,
        )
        .unwrap();
        assert!(n.created_at <= Utc::now());
    }

    #[test]
    fn test_kind_roundtrip() {
        let json = serde_json::to_string(&NotificationKind::HourApproved).unwrap();
        assert_eq!(json, "\"hour_approved\"");
        let back: NotificationKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NotificationKind::HourApproved);
    }
}
