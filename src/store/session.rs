//! One live notification session per user.
//!
//! A session owns the state, the push transport, and the background
//! tasks that apply pushed events. Subscribers hold [`NotificationFeed`]
//! handles; the session stays alive as long as any handle does, and
//! tears its stream and tasks down when the last one drops. Background
//! tasks hold only a `Weak` back-reference so they never keep the
//! session alive on their own.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::CemsApi;
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::Notification;
use crate::push::PushTransport;

use super::state::{FeedSnapshot, NotificationState};

const EVENT_BUFFER: usize = 64;

pub struct NotificationSession {
    user_id: i64,
    api: Arc<CemsApi>,
    state: Mutex<NotificationState>,
    snapshot_tx: watch::Sender<FeedSnapshot>,
    transport: Mutex<PushTransport>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NotificationSession {
    /// Build a session: open the push stream, spawn the apply loops,
    /// then run the initial full fetch. A failed initial fetch leaves
    /// the session live with an error snapshot; the stream keeps
    /// retrying and [`refresh`](Self::refresh) can be called again.
    pub async fn connect(api: Arc<CemsApi>, config: &Config, user_id: i64) -> Arc<Self> {
        let (snapshot_tx, _) = watch::channel(NotificationState::new().snapshot());
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let mut transport = PushTransport::new(Arc::clone(&api), config);
        let degraded_rx = transport.degraded();
        transport.start(user_id, event_tx);

        let session = Arc::new(Self {
            user_id,
            api,
            state: Mutex::new(NotificationState::new()),
            snapshot_tx,
            transport: Mutex::new(transport),
            tasks: Mutex::new(Vec::new()),
        });

        let apply = tokio::spawn(apply_events(Arc::downgrade(&session), event_rx));
        let degrade = tokio::spawn(forward_degraded(Arc::downgrade(&session), degraded_rx));
        {
            let mut tasks = session
                .tasks
                .lock()
                .expect("session task list lock poisoned");
            tasks.push(apply);
            tasks.push(degrade);
        }

        if let Err(err) = session.refresh().await {
            warn!(user_id, error = %err, "initial notification fetch failed");
        }

        info!(user_id, "notification session connected");
        session
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Subscribe to snapshot updates. Each handle keeps the session
    /// alive and observes every state change.
    pub fn subscribe(self: &Arc<Self>) -> NotificationFeed {
        NotificationFeed {
            session: Arc::clone(self),
            rx: self.snapshot_tx.subscribe(),
        }
    }

    /// Re-run the full fetch and replace the list wholesale.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.apply(|state| state.begin_load());

        match self.api.fetch_notifications(self.user_id).await {
            Ok(notifications) => {
                debug!(
                    user_id = self.user_id,
                    count = notifications.len(),
                    "notification list loaded"
                );
                self.apply(|state| state.replace(notifications));
                Ok(())
            }
            Err(err) => {
                self.apply(|state| state.fail_load(err.to_string()));
                Err(err)
            }
        }
    }

    /// Mark one notification read: backend first, local flip only
    /// after the server confirms. Returns whether local state changed.
    pub async fn mark_read(&self, notification_id: i64) -> Result<bool, ClientError> {
        self.api.mark_read(notification_id).await?;
        let mut changed = false;
        self.apply(|state| changed = state.mark_read(notification_id));
        Ok(changed)
    }

    pub async fn mark_all_read(&self) -> Result<(), ClientError> {
        self.api.mark_all_read(self.user_id).await?;
        self.apply(|state| state.mark_all_read());
        Ok(())
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    fn apply(&self, f: impl FnOnce(&mut NotificationState)) {
        let mut state = self.state.lock().expect("notification state lock poisoned");
        f(&mut state);
        self.snapshot_tx.send_replace(state.snapshot());
    }
}

impl Drop for NotificationSession {
    fn drop(&mut self) {
        if let Ok(mut transport) = self.transport.lock() {
            transport.stop();
        }
        if let Ok(tasks) = self.tasks.lock() {
            for task in tasks.iter() {
                task.abort();
            }
        }
        debug!(user_id = self.user_id, "notification session torn down");
    }
}

async fn apply_events(session: Weak<NotificationSession>, mut events: mpsc::Receiver<Notification>) {
    while let Some(notification) = events.recv().await {
        let Some(session) = session.upgrade() else {
            return;
        };
        debug!(
            user_id = session.user_id,
            notification_id = notification.id,
            "applying pushed notification"
        );
        session.apply(|state| {
            state.upsert(notification);
        });
    }
}

async fn forward_degraded(session: Weak<NotificationSession>, mut degraded: watch::Receiver<bool>) {
    loop {
        let flag = *degraded.borrow_and_update();
        let Some(session) = session.upgrade() else {
            return;
        };
        session.apply(|state| state.set_degraded(flag));
        drop(session);

        if degraded.changed().await.is_err() {
            return;
        }
    }
}

/// Subscriber handle: a cloneable view over one session's snapshots
/// plus passthroughs for the mutations a consumer needs.
#[derive(Clone)]
pub struct NotificationFeed {
    session: Arc<NotificationSession>,
    rx: watch::Receiver<FeedSnapshot>,
}

impl NotificationFeed {
    pub fn snapshot(&self) -> FeedSnapshot {
        self.rx.borrow().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.rx.borrow().unread_count
    }

    /// Wait for the next snapshot change. Errors only if the session
    /// is gone, which cannot happen while this handle exists.
    pub async fn changed(&mut self) -> FeedSnapshot {
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Block until a snapshot satisfies `pred`, returning it.
    pub async fn wait_for(
        &mut self,
        pred: impl FnMut(&FeedSnapshot) -> bool,
    ) -> FeedSnapshot {
        self.rx
            .wait_for(pred)
            .await
            .map(|snap| snap.clone())
            .expect("session dropped while feed handle still held")
    }

    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.session.refresh().await
    }

    pub async fn mark_read(&self, notification_id: i64) -> Result<bool, ClientError> {
        self.session.mark_read(notification_id).await
    }

    pub async fn mark_all_read(&self) -> Result<(), ClientError> {
        self.session.mark_all_read().await
    }

    pub fn session(&self) -> &Arc<NotificationSession> {
        &self.session
    }
}
