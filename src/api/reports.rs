use serde_json::json;

use crate::errors::ClientError;
use crate::models::{Report, ReportKind};

use super::CemsApi;

impl CemsApi {
    pub async fn list_reports(&self, user_id: i64) -> Result<Vec<Report>, ClientError> {
        self.get_json(&format!("/reports/{user_id}")).await
    }

    /// Queue a report for generation. The record comes back with
    /// `ready: false` until the server finishes rendering it.
    pub async fn request_report(
        &self,
        user_id: i64,
        kind: ReportKind,
    ) -> Result<Report, ClientError> {
        self.post_json("/reports", &json!({ "UserID": user_id, "Type": kind }))
            .await
    }

    pub async fn delete_report(&self, report_id: i64) -> Result<(), ClientError> {
        self.delete_unit(&format!("/reports/{report_id}")).await
    }
}
