use crate::errors::ClientError;
use crate::models::User;

use super::CemsApi;

impl CemsApi {
    pub async fn get_user(&self, user_id: i64) -> Result<User, ClientError> {
        self.get_json(&format!("/users/{user_id}")).await
    }

    /// Admin-only listing; non-admin tokens get `Unauthorized`.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("/users").await
    }
}
