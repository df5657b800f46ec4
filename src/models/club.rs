use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "MemberCount", default)]
    pub member_count: u32,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
}
