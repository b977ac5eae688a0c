use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "commentId")]
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    #[serde(rename = "commentContent")]
    pub content: String,
    #[serde(rename = "commentWriteTime")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A comment ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentAddRequest {
    pub post_id: i64,

    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub comment_content: String,
}
