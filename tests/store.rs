//! End-to-end feed behavior against a mocked backend: initial load,
//! confirmed read-state mutations, push delivery, and reload semantics.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cems_client::api::CemsApi;
use cems_client::auth::StaticCredentialStore;
use cems_client::config::Config;
use cems_client::store::NotificationSession;

const USER_ID: i64 = 7;
const TOKEN: &str = "test-token";

fn record(id: i64, is_read: bool, minute: u32) -> serde_json::Value {
    json!({
        "ID": id,
        "UserID": USER_ID,
        "Message": format!("notification {id}"),
        "Type": "reminder",
        "IsRead": is_read,
        "CreatedAt": format!("2025-03-01T10:{minute:02}:00Z"),
    })
}

fn test_config(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        token: Some(TOKEN.into()),
        user_id: Some(USER_ID),
        // Long enough that no reconnect fires mid-test.
        reconnect_base: Duration::from_secs(60),
        reconnect_max: Duration::from_secs(300),
        degraded_after: 5,
        http_timeout: Duration::from_secs(5),
    }
}

fn api_for(server: &MockServer) -> Arc<CemsApi> {
    let cfg = test_config(server);
    let creds = Arc::new(StaticCredentialStore::new(TOKEN, USER_ID));
    Arc::new(CemsApi::new(&cfg, creds).expect("client build"))
}

fn sse_body(records: &[serde_json::Value]) -> String {
    let mut body = String::from("data: {\"type\":\"heartbeat\"}\n\n");
    for r in records {
        body.push_str(&format!("data: {r}\n\n"));
    }
    body.push_str("data: {\"type\":\"heartbeat\"}\n\n");
    body
}

async fn mount_stream(server: &MockServer, records: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}/stream")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(records), "text/event-stream")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_feed_end_to_end() {
    let server = MockServer::start().await;

    let initial = vec![
        record(1, false, 0),
        record(2, true, 1),
        record(3, false, 2),
        record(4, true, 3),
        record(5, false, 4),
    ];
    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .and(header("authorization", format!("Bearer {TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&initial))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notifications/read/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/notifications/read-all/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    mount_stream(&server, &[record(6, false, 10)]).await;

    let cfg = test_config(&server);
    let session = NotificationSession::connect(api_for(&server), &cfg, USER_ID).await;
    let mut feed = session.subscribe();

    let snap = feed.wait_for(|s| !s.loading).await;
    assert_eq!(snap.notifications.len(), 5);
    assert_eq!(snap.unread_count, 3);
    assert!(snap.error.is_none());
    // Newest first.
    assert_eq!(snap.notifications[0].id, 5);

    // Pushed record lands on top once the stream delivers.
    let snap = feed.wait_for(|s| s.notifications.len() == 6).await;
    assert_eq!(snap.notifications[0].id, 6);
    assert_eq!(snap.unread_count, 4);

    // Read-state flips only after the server confirms.
    let changed = feed.mark_read(1).await.expect("mark read");
    assert!(changed);
    assert_eq!(feed.unread_count(), 3);

    feed.mark_all_read().await.expect("mark all read");
    assert_eq!(feed.unread_count(), 0);
}

#[tokio::test]
async fn test_full_reload_replaces_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            record(1, false, 0),
            record(2, false, 1),
            record(3, false, 2),
        ]))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // Second fetch: record 2 is gone server-side, 1 now read.
    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![record(1, true, 0), record(3, false, 2)]),
        )
        .mount(&server)
        .await;
    mount_stream(&server, &[]).await;

    let cfg = test_config(&server);
    let session = NotificationSession::connect(api_for(&server), &cfg, USER_ID).await;
    let mut feed = session.subscribe();

    let snap = feed.wait_for(|s| !s.loading).await;
    assert_eq!(snap.notifications.len(), 3);

    feed.refresh().await.expect("refresh");
    let snap = feed.wait_for(|s| !s.loading).await;
    assert_eq!(snap.notifications.len(), 2);
    assert!(snap.notifications.iter().all(|n| n.id != 2));
    assert_eq!(snap.unread_count, 1);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![record(1, false, 0)]))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notifications/read/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    mount_stream(&server, &[]).await;

    let cfg = test_config(&server);
    let session = NotificationSession::connect(api_for(&server), &cfg, USER_ID).await;
    let mut feed = session.subscribe();
    feed.wait_for(|s| !s.loading).await;

    assert!(feed.mark_read(1).await.expect("first mark"));
    // Second call succeeds against the backend but changes nothing.
    assert!(!feed.mark_read(1).await.expect("second mark"));
    assert_eq!(feed.unread_count(), 0);
}

#[tokio::test]
async fn test_failed_load_sets_error_and_keeps_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![record(1, false, 0)]))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;
    mount_stream(&server, &[]).await;

    let cfg = test_config(&server);
    let session = NotificationSession::connect(api_for(&server), &cfg, USER_ID).await;
    let mut feed = session.subscribe();

    let snap = feed.wait_for(|s| !s.loading).await;
    assert_eq!(snap.notifications.len(), 1);

    feed.refresh().await.expect_err("second load fails");
    let snap = feed.snapshot();
    assert!(snap.error.is_some());
    assert!(!snap.loading);
    // Stale list stays visible alongside the error.
    assert_eq!(snap.notifications.len(), 1);
}

#[tokio::test]
async fn test_failed_initial_load_leaves_session_usable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boot failure"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/notifications/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![record(1, false, 0)]))
        .mount(&server)
        .await;
    mount_stream(&server, &[]).await;

    let cfg = test_config(&server);
    let session = NotificationSession::connect(api_for(&server), &cfg, USER_ID).await;
    let mut feed = session.subscribe();

    let snap = feed.snapshot();
    assert!(snap.error.is_some());
    assert!(snap.notifications.is_empty());

    feed.refresh().await.expect("retry succeeds");
    let snap = feed.wait_for(|s| !s.loading && s.error.is_none()).await;
    assert_eq!(snap.notifications.len(), 1);
}
