// src/store/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CommunityStore, already_liked, duplicate_account};
use crate::{
    error::AppError,
    models::{
        comment::{Comment, NewComment},
        like::PostLike,
        post::{NewPost, Post, PostImage},
        user::{NewUser, User},
    },
};

const POST_COLUMNS: &str =
    "id, user_id, title, content, tag, like_count, comment_count, created_at";

const USER_COLUMNS: &str = "id, email, nickname, password, height, weight, created_at";

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgCommunityStore {
    pool: PgPool,
}

impl PgCommunityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads images for all `posts` in one query and attaches them in upload order.
    async fn attach_images(&self, posts: &mut [Post]) -> Result<(), AppError> {
        if posts.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let images = sqlx::query_as::<_, PostImage>(
            r#"
            SELECT id, post_id, url, position
            FROM post_images
            WHERE post_id = ANY($1)
            ORDER BY post_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_post: HashMap<i64, Vec<PostImage>> = HashMap::new();
        for image in images {
            by_post.entry(image.post_id).or_default().push(image);
        }
        for post in posts.iter_mut() {
            post.images = by_post.remove(&post.id).unwrap_or_default();
        }
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}

#[async_trait]
impl CommunityStore for PgCommunityStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, nickname, password, height, weight)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.nickname)
        .bind(&user.password_hash)
        .bind(user.height)
        .bind(user.weight)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_account()
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (user_id, title, content, tag, like_count, comment_count, created_at)
            VALUES ($1, $2, $3, $4, 0, 0, $5)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(new_post.user_id)
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(new_post.tag)
        .bind(new_post.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create post: {:?}", e);
            AppError::from(e)
        })?;

        for (position, url) in new_post.image_urls.iter().enumerate() {
            let image = sqlx::query_as::<_, PostImage>(
                r#"
                INSERT INTO post_images (post_id, url, position)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, url, position
                "#,
            )
            .bind(post.id)
            .bind(url)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;
            post.images.push(image);
        }

        tx.commit().await?;

        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match post {
            Some(post) => {
                let mut posts = [post];
                self.attach_images(&mut posts).await?;
                let [post] = posts;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, AppError> {
        let mut posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list posts: {:?}", e);
            AppError::from(e)
        })?;

        self.attach_images(&mut posts).await?;
        Ok(posts)
    }

    async fn highlight_candidates(&self, tag: bool, limit: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE tag = $1
            ORDER BY like_count ASC, id ASC
            LIMIT $2
            "#
        ))
        .bind(tag)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment, AppError> {
        let mut tx = self.pool.begin().await?;

        // Bump first: the row lock on the post serializes concurrent writers
        // and tells us whether the post still exists.
        let bumped = sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(new_comment.post_id)
            .execute(&mut *tx)
            .await?;
        if bumped.rows_affected() == 0 {
            return Err(AppError::post_not_found(new_comment.post_id));
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(new_comment.post_id)
        .bind(new_comment.user_id)
        .bind(&new_comment.content)
        .bind(new_comment.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(comment)
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, content, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn like_exists(&self, user_id: i64, post_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM post_likes WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_like(&self, user_id: i64, post_id: i64) -> Result<PostLike, AppError> {
        let mut tx = self.pool.begin().await?;

        let like = sqlx::query_as::<_, PostLike>(
            r#"
            INSERT INTO post_likes (user_id, post_id)
            VALUES ($1, $2)
            RETURNING id, post_id, user_id
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // Lost the race against a concurrent like for the same pair.
                already_liked()
            } else if is_foreign_key_violation(&e) {
                AppError::post_not_found(post_id)
            } else {
                AppError::from(e)
            }
        })?;

        sqlx::query("UPDATE posts SET like_count = like_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(like)
    }
}
