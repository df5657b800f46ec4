//! Reconnecting stream loop.
//!
//! One transport owns one background task that keeps the notification
//! stream for a user open, decodes incoming events, and pushes them
//! into an mpsc channel. Connection loss is recovered silently with
//! exponentially backed-off retries; a watch flag flips to degraded
//! after enough consecutive failures so subscribers can surface a
//! "reconnecting" hint without ever seeing an error.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::CemsApi;
use crate::config::Config;
use crate::models::Notification;

use super::SseDecoder;

pub struct PushTransport {
    api: Arc<CemsApi>,
    reconnect_base: Duration,
    reconnect_max: Duration,
    degraded_after: u32,
    degraded_tx: Arc<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl PushTransport {
    pub fn new(api: Arc<CemsApi>, config: &Config) -> Self {
        let (degraded_tx, _) = watch::channel(false);
        Self {
            api,
            reconnect_base: config.reconnect_base,
            reconnect_max: config.reconnect_max,
            degraded_after: config.degraded_after,
            degraded_tx: Arc::new(degraded_tx),
            task: None,
        }
    }

    /// Observe the degraded flag. True once consecutive connection
    /// failures pass the configured threshold, false again after the
    /// next successful connect.
    pub fn degraded(&self) -> watch::Receiver<bool> {
        self.degraded_tx.subscribe()
    }

    /// Start streaming for `user_id`, delivering decoded notifications
    /// to `events`. A transport runs at most one stream; starting again
    /// replaces the previous one.
    pub fn start(&mut self, user_id: i64, events: mpsc::Sender<Notification>) {
        self.stop();

        let api = Arc::clone(&self.api);
        let degraded_tx = Arc::clone(&self.degraded_tx);
        let base = self.reconnect_base;
        let max = self.reconnect_max;
        let threshold = self.degraded_after;

        self.task = Some(tokio::spawn(async move {
            run_stream_loop(api, user_id, events, degraded_tx, base, max, threshold).await;
        }));
    }

    /// Stop the stream. Safe to call repeatedly or when never started.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for PushTransport {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_stream_loop(
    api: Arc<CemsApi>,
    user_id: i64,
    events: mpsc::Sender<Notification>,
    degraded_tx: Arc<watch::Sender<bool>>,
    base: Duration,
    max: Duration,
    threshold: u32,
) {
    let mut failures: u32 = 0;

    loop {
        match api.stream_notifications(user_id).await {
            Ok(resp) => {
                if failures > 0 {
                    info!(user_id, "notification stream reconnected");
                }
                failures = 0;
                degraded_tx.send_replace(false);

                let mut decoder = SseDecoder::new();
                let mut body = resp.bytes_stream();
                while let Some(chunk) = body.next().await {
                    match chunk {
                        Ok(bytes) => {
                            for notification in decoder.push_chunk(&bytes) {
                                if events.send(notification).await.is_err() {
                                    debug!(user_id, "event channel closed, stream loop exiting");
                                    return;
                                }
                            }
                        }
                        Err(err) => {
                            warn!(user_id, error = %err, "notification stream broke mid-read");
                            break;
                        }
                    }
                }
                // Server closed the stream or the read errored; either
                // way we fall through to reconnect.
            }
            Err(err) => {
                warn!(user_id, error = %err, "notification stream connect failed");
            }
        }

        if events.is_closed() {
            return;
        }

        failures = failures.saturating_add(1);
        if failures == threshold {
            warn!(
                user_id,
                failures, "push connection degraded, continuing to retry"
            );
            degraded_tx.send_replace(true);
        }

        let delay = backoff_delay(base, max, failures);
        debug!(user_id, failures, delay_ms = delay.as_millis() as u64, "stream retry scheduled");
        tokio::time::sleep(delay).await;
    }
}

/// Exponential backoff with 50% jitter, capped at `max`.
fn backoff_delay(base: Duration, max: Duration, failures: u32) -> Duration {
    let exp = failures.saturating_sub(1).min(16);
    let raw = base.saturating_mul(1u32 << exp).min(max);
    let jitter = 0.5 + rand::random::<f64>();
    raw.mul_f64(jitter).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let base = Duration::from_secs(5);
        let max = Duration::from_secs(300);

        for failures in 1..20 {
            let d = backoff_delay(base, max, failures);
            assert!(d <= max, "failure {failures} exceeded cap: {d:?}");
            assert!(
                d >= Duration::from_millis(2_500),
                "failure {failures} below jittered floor: {d:?}"
            );
        }
    }

    #[test]
    fn test_backoff_first_retry_near_base() {
        let base = Duration::from_secs(5);
        let max = Duration::from_secs(300);
        let d = backoff_delay(base, max, 1);
        assert!(d >= base.mul_f64(0.5));
        assert!(d <= base.mul_f64(1.5));
    }

    #[test]
    fn test_backoff_high_failure_count_does_not_overflow() {
        let base = Duration::from_secs(5);
        let max = Duration::from_secs(300);
        let d = backoff_delay(base, max, u32::MAX);
        assert!(d <= max);
    }
}
