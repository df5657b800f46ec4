//! Notification endpoints: full fetch, read-state mutations, and the
//! live SSE stream consumed by the push transport.

use reqwest::header::ACCEPT;

use crate::errors::ClientError;
use crate::models::Notification;

use super::CemsApi;

impl CemsApi {
    /// Full fetch of a user's notifications, newest first.
    pub async fn fetch_notifications(
        &self,
        user_id: i64,
    ) -> Result<Vec<Notification>, ClientError> {
        self.get_json(&format!("/notifications/{user_id}")).await
    }

    /// Mark one notification read. Success is any 2xx; the caller flips
    /// local state only after this resolves.
    pub async fn mark_read(&self, notification_id: i64) -> Result<(), ClientError> {
        self.put_unit(&format!("/notifications/read/{notification_id}"))
            .await
    }

    /// Mark all of a user's notifications read in one bulk call.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<(), ClientError> {
        self.put_unit(&format!("/notifications/read-all/{user_id}"))
            .await
    }

    /// Open the server-push notification stream for `user_id`.
    ///
    /// Returns the raw streaming response; decoding is the push
    /// transport's job. The token rides both the query string (the
    /// stream endpoint's contract) and the bearer header.
    pub async fn stream_notifications(
        &self,
        user_id: i64,
    ) -> Result<reqwest::Response, ClientError> {
        let creds = self.creds().await?;
        let resp = self
            .stream_client()
            .get(self.url(&format!("/notifications/{user_id}/stream")))
            .query(&[("token", creds.token.as_str())])
            .bearer_auth(&creds.token)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }
        Ok(resp)
    }
}
