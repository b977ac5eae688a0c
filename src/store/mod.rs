// src/store/mod.rs

//! Storage gateways the services talk to.
//!
//! `CommunityStore` owns users, posts, comments and likes. Operations that
//! touch a denormalized counter (`insert_comment`, `insert_like`) are a single
//! unit of work: the child row and the counter bump either both land or
//! neither does.

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        comment::{Comment, NewComment},
        like::PostLike,
        post::{NewPost, Post},
        user::{NewUser, User},
    },
};

pub mod images;
pub mod memory;
pub mod postgres;

pub use images::{ImageStore, ImageUpload, LocalImageStore, StoredImage};
pub use memory::MemoryCommunityStore;
pub use postgres::PgCommunityStore;

#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Fails with `Conflict` when the email or nickname is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Unknown ids are skipped. Result order is unspecified.
    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>, AppError>;

    /// Persists the post and its images (in `image_urls` order) together.
    async fn insert_post(&self, post: NewPost) -> Result<Post, AppError>;

    async fn find_post(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Newest first, ties broken by id descending.
    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, AppError>;

    /// Posts with the given tag ordered by ascending like count (ties by id).
    /// Images are not loaded.
    async fn highlight_candidates(&self, tag: bool, limit: i64) -> Result<Vec<Post>, AppError>;

    /// Inserts the comment and increments the parent's comment count.
    /// Fails with `NotFound` when the post does not exist.
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, AppError>;

    /// Comments of one post in insertion order.
    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, AppError>;

    async fn like_exists(&self, user_id: i64, post_id: i64) -> Result<bool, AppError>;

    /// Inserts the like and increments the post's like count.
    /// Fails with `Conflict` if the pair already exists and `NotFound` when the
    /// post does not exist.
    async fn insert_like(&self, user_id: i64, post_id: i64) -> Result<PostLike, AppError>;
}

pub(crate) fn already_liked() -> AppError {
    AppError::Conflict("Post already liked".to_string())
}

pub(crate) fn duplicate_account() -> AppError {
    AppError::Conflict("Email or nickname already exists".to_string())
}
