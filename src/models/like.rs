use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'post_likes' table. One row per (user, post) pair.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLike {
    #[serde(rename = "likeId")]
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
}
