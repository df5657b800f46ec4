use crate::errors::ClientError;
use crate::models::Club;

use super::CemsApi;

impl CemsApi {
    pub async fn list_clubs(&self) -> Result<Vec<Club>, ClientError> {
        self.get_json("/clubs").await
    }

    pub async fn get_club(&self, club_id: i64) -> Result<Club, ClientError> {
        self.get_json(&format!("/clubs/{club_id}")).await
    }
}
