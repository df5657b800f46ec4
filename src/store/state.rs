//! Pure notification list state. No IO here; the session layer decides
//! when each transition runs.

use crate::models::Notification;

/// Immutable view of the feed handed to subscribers. The unread count
/// is derived at snapshot time so it can never drift from the list.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub degraded: bool,
}

#[derive(Debug, Default)]
pub struct NotificationState {
    notifications: Vec<Notification>,
    loading: bool,
    error: Option<String>,
    degraded: bool,
}

impl NotificationState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Full-fetch result: replaces the list wholesale, newest first.
    pub fn replace(&mut self, mut notifications: Vec<Notification>) {
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.notifications = notifications;
        self.loading = false;
        self.error = None;
    }

    pub fn fail_load(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Merge one pushed record. An unseen ID is prepended; a known ID
    /// is updated in place, so redelivery across reconnects cannot
    /// duplicate entries. Returns true when the record was new.
    pub fn upsert(&mut self, notification: Notification) -> bool {
        match self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification.id)
        {
            Some(existing) => {
                *existing = notification;
                false
            }
            None => {
                self.notifications.insert(0, notification);
                true
            }
        }
    }

    /// Flip one record to read. Idempotent; returns false when the ID
    /// is unknown or already read.
    pub fn mark_read(&mut self, notification_id: i64) -> bool {
        match self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            Some(n) if !n.is_read => {
                n.is_read = true;
                true
            }
            _ => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.is_read = true;
        }
    }

    pub fn set_degraded(&mut self, degraded: bool) {
        self.degraded = degraded;
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            notifications: self.notifications.clone(),
            unread_count: self.unread_count(),
            loading: self.loading,
            error: self.error.clone(),
            degraded: self.degraded,
        }
    }
}
