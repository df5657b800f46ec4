use serde_json::json;

use crate::errors::ClientError;
use crate::models::Activity;

use super::CemsApi;

impl CemsApi {
    pub async fn list_activities(&self) -> Result<Vec<Activity>, ClientError> {
        self.get_json("/activities").await
    }

    pub async fn get_activity(&self, activity_id: i64) -> Result<Activity, ClientError> {
        self.get_json(&format!("/activities/{activity_id}")).await
    }

    /// Register a user for an activity. The backend answers with the
    /// updated record so callers can refresh capacity counters.
    pub async fn register_for_activity(
        &self,
        activity_id: i64,
        user_id: i64,
    ) -> Result<Activity, ClientError> {
        self.post_json(
            &format!("/activities/{activity_id}/register"),
            &json!({ "UserID": user_id }),
        )
        .await
    }

    pub async fn cancel_registration(
        &self,
        activity_id: i64,
        user_id: i64,
    ) -> Result<(), ClientError> {
        self.delete_unit(&format!("/activities/{activity_id}/register/{user_id}"))
            .await
    }
}
