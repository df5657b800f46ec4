use crate::errors::ClientError;
use crate::models::DashboardStats;

use super::CemsApi;

impl CemsApi {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get_json("/dashboard/stats").await
    }
}
