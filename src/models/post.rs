use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'posts' table in the database.
///
/// `tag` splits the feed in two: `true` for running-spot posts, `false` for
/// running-certification posts.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub tag: bool,

    /// Denormalized counters, kept in step with the `post_likes` and
    /// `comments` rows that reference this post.
    pub like_count: i64,
    pub comment_count: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Attached images in upload order. Loaded separately from `post_images`.
    #[sqlx(skip)]
    #[serde(default)]
    pub images: Vec<PostImage>,
}

/// Represents the 'post_images' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PostImage {
    pub id: i64,
    pub post_id: i64,
    pub url: String,
    /// Zero-based index within the upload batch.
    pub position: i32,
}

/// A post ready to be persisted together with its image URLs.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub tag: bool,
    pub image_urls: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for uploading a new post (the `request` part of the multipart form).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostUploadRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub post_title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content length must be between 1 and 10000 chars"
    ))]
    pub post_content: String,

    pub post_tag: bool,
}
