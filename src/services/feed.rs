// src/services/feed.rs

//! Community feed operations: posts, comments and likes.

use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::{
        comment::{Comment, CommentAddRequest, NewComment},
        like::PostLike,
        post::{NewPost, Post, PostUploadRequest},
        user::User,
    },
    presenter::{self, CommentViewResponse, MainPagePostResponse, PostViewResponse},
    store::{CommunityStore, ImageStore, ImageUpload},
};

/// Size of the recent-posts feed.
pub const RECENT_POSTS_LIMIT: i64 = 15;

/// Highlights shown per tag on the main page.
pub const HIGHLIGHTS_PER_TAG: i64 = 2;

#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn CommunityStore>,
    images: Arc<dyn ImageStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn CommunityStore>, images: Arc<dyn ImageStore>) -> Self {
        Self { store, images }
    }

    /// Uploads the images, then persists the post with zeroed counters.
    pub async fn create_post(
        &self,
        request: PostUploadRequest,
        images: Vec<ImageUpload>,
        caller: Option<&User>,
    ) -> Result<Post, AppError> {
        let user = caller.ok_or_else(AppError::login_required)?;
        request.validate()?;

        let stored = self.images.upload(images).await?;

        let new_post = NewPost {
            user_id: user.id,
            title: request.post_title,
            content: request.post_content,
            tag: request.post_tag,
            image_urls: stored.iter().map(|image| image.url.clone()).collect(),
            created_at: chrono::Utc::now(),
        };

        let post = match self.store.insert_post(new_post).await {
            Ok(post) => post,
            Err(e) => {
                if let Err(cleanup) = self.images.remove(&stored).await {
                    tracing::warn!("Failed to remove orphaned images: {}", cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!(
            post_id = post.id,
            user_id = user.id,
            images = post.images.len(),
            "post created"
        );
        Ok(post)
    }

    /// The newest posts, newest first.
    pub async fn list_recent_posts(&self) -> Result<Vec<PostViewResponse>, AppError> {
        let posts = self.store.recent_posts(RECENT_POSTS_LIMIT).await?;
        let authors = self.authors_of(posts.iter().map(|p| p.user_id)).await?;

        posts
            .iter()
            .map(|post| -> Result<_, AppError> {
                Ok(presenter::post_view(post, author(&authors, post.user_id)?))
            })
            .collect()
    }

    /// Up to two running-spot posts followed by up to two certification posts,
    /// each group ordered by ascending like count.
    pub async fn main_page_highlights(&self) -> Result<Vec<MainPagePostResponse>, AppError> {
        let mut posts = self
            .store
            .highlight_candidates(true, HIGHLIGHTS_PER_TAG)
            .await?;
        posts.extend(
            self.store
                .highlight_candidates(false, HIGHLIGHTS_PER_TAG)
                .await?,
        );

        let authors = self.authors_of(posts.iter().map(|p| p.user_id)).await?;

        posts
            .iter()
            .map(|post| -> Result<_, AppError> {
                Ok(presenter::main_page_post(post, author(&authors, post.user_id)?))
            })
            .collect()
    }

    pub async fn add_comment(
        &self,
        request: CommentAddRequest,
        caller: Option<&User>,
    ) -> Result<Comment, AppError> {
        let user = caller.ok_or_else(AppError::login_required)?;
        request.validate()?;

        if self.store.find_post(request.post_id).await?.is_none() {
            return Err(AppError::post_not_found(request.post_id));
        }

        let comment = self
            .store
            .insert_comment(NewComment {
                post_id: request.post_id,
                user_id: user.id,
                content: request.comment_content,
                created_at: chrono::Utc::now(),
            })
            .await?;

        tracing::info!(
            comment_id = comment.id,
            post_id = comment.post_id,
            user_id = user.id,
            "comment added"
        );
        Ok(comment)
    }

    /// Comments of a post in storage order.
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentViewResponse>, AppError> {
        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::post_not_found(post_id));
        }

        let comments = self.store.comments_for_post(post_id).await?;
        let authors = self.authors_of(comments.iter().map(|c| c.user_id)).await?;

        comments
            .iter()
            .map(|comment| -> Result<_, AppError> {
                Ok(presenter::comment_view(comment, author(&authors, comment.user_id)?))
            })
            .collect()
    }

    pub async fn add_like(&self, post_id: i64, caller: Option<&User>) -> Result<PostLike, AppError> {
        let user = caller.ok_or_else(AppError::login_required)?;

        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::post_not_found(post_id));
        }

        if self.store.like_exists(user.id, post_id).await? {
            return Err(AppError::Conflict("Post already liked".to_string()));
        }

        let like = self.store.insert_like(user.id, post_id).await?;

        tracing::info!(post_id, user_id = user.id, "post liked");
        Ok(like)
    }

    async fn authors_of(
        &self,
        ids: impl Iterator<Item = i64>,
    ) -> Result<HashMap<i64, User>, AppError> {
        let mut ids: Vec<i64> = ids.collect();
        ids.sort_unstable();
        ids.dedup();

        let users = self.store.find_users(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

fn author(authors: &HashMap<i64, User>, user_id: i64) -> Result<&User, AppError> {
    authors
        .get(&user_id)
        .ok_or_else(|| AppError::InternalServerError(format!("author {} is missing", user_id)))
}
