//! Process-wide session sharing.
//!
//! Multiple consumers asking for the same user's feed must land on the
//! same [`NotificationSession`] so the server sees one stream and every
//! view agrees on state. The registry holds weak references only; a
//! session dies when its last subscriber drops, and the next request
//! builds a fresh one.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::CemsApi;
use crate::config::Config;

use super::session::NotificationSession;

static GLOBAL: Lazy<SessionRegistry> = Lazy::new(SessionRegistry::new);

pub struct SessionRegistry {
    sessions: DashMap<i64, Weak<NotificationSession>>,
    /// Serializes session construction so two concurrent requests for
    /// the same user cannot race into two streams.
    create_lock: Mutex<()>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            create_lock: Mutex::new(()),
        }
    }

    pub fn global() -> &'static SessionRegistry {
        &GLOBAL
    }

    /// Get the live session for `user_id`, or connect one.
    pub async fn session_for(
        &self,
        api: Arc<CemsApi>,
        config: &Config,
        user_id: i64,
    ) -> Arc<NotificationSession> {
        if let Some(session) = self.live(user_id) {
            return session;
        }

        let _guard = self.create_lock.lock().await;
        if let Some(session) = self.live(user_id) {
            return session;
        }

        debug!(user_id, "connecting new notification session");
        let session = NotificationSession::connect(api, config, user_id).await;
        self.sessions.insert(user_id, Arc::downgrade(&session));
        self.prune();
        session
    }

    fn live(&self, user_id: i64) -> Option<Arc<NotificationSession>> {
        self.sessions.get(&user_id).and_then(|entry| entry.upgrade())
    }

    fn prune(&self) {
        self.sessions.retain(|_, weak| weak.strong_count() > 0);
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::StaticCredentialStore;

    fn offline_setup() -> (Arc<CemsApi>, Config) {
        // Nothing listens on port 9; connects fail fast and the
        // sessions come up in the error state, which is all these
        // tests need.
        let config = Config {
            base_url: "http://127.0.0.1:9".into(),
            token: Some("tok".into()),
            user_id: Some(7),
            ..Config::default()
        };
        let creds = Arc::new(StaticCredentialStore::new("tok", 7));
        let api = Arc::new(CemsApi::new(&config, creds).expect("client build"));
        (api, config)
    }

    #[tokio::test]
    async fn test_same_user_shares_one_session() {
        let registry = SessionRegistry::new();
        let (api, config) = offline_setup();

        let a = registry.session_for(Arc::clone(&api), &config, 7).await;
        let b = registry.session_for(Arc::clone(&api), &config, 7).await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.live_sessions(), 1);

        let c = registry.session_for(api, &config, 8).await;
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.live_sessions(), 2);
    }

    #[tokio::test]
    async fn test_dropped_session_is_rebuilt() {
        let registry = SessionRegistry::new();
        let (api, config) = offline_setup();

        let first = registry.session_for(Arc::clone(&api), &config, 7).await;
        let first_ptr = Arc::as_ptr(&first);
        drop(first);
        assert_eq!(registry.live_sessions(), 0);

        let second = registry.session_for(api, &config, 7).await;
        assert_ne!(first_ptr, Arc::as_ptr(&second));
    }
}
