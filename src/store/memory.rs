// src/store/memory.rs

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

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

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: Vec<Comment>,
    likes: Vec<PostLike>,
    next_user_id: i64,
    next_post_id: i64,
    next_image_id: i64,
    next_comment_id: i64,
    next_like_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Process-local store. Every unit of work runs under one write lock, so the
/// counters can never drift from the child rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryCommunityStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryCommunityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommunityStore for MemoryCommunityStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .users
            .values()
            .any(|u| u.email == new_user.email || u.nickname == new_user.nickname);
        if taken {
            return Err(duplicate_account());
        }

        let user = User {
            id: next_id(&mut tables.next_user_id),
            email: new_user.email,
            nickname: new_user.nickname,
            password: new_user.password_hash,
            height: new_user.height,
            weight: new_user.weight,
            created_at: chrono::Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_users(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tables.users.get(&id).cloned())
            .collect())
    }

    async fn insert_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_post.user_id) {
            return Err(AppError::InternalServerError(format!(
                "user {} does not exist",
                new_post.user_id
            )));
        }

        let post_id = next_id(&mut tables.next_post_id);
        let mut images = Vec::with_capacity(new_post.image_urls.len());
        for (position, url) in new_post.image_urls.into_iter().enumerate() {
            images.push(PostImage {
                id: next_id(&mut tables.next_image_id),
                post_id,
                url,
                position: position as i32,
            });
        }

        let post = Post {
            id: post_id,
            user_id: new_post.user_id,
            title: new_post.title,
            content: new_post.content,
            tag: new_post.tag,
            like_count: 0,
            comment_count: 0,
            created_at: new_post.created_at,
            images,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, AppError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    async fn highlight_candidates(&self, tag: bool, limit: i64) -> Result<Vec<Post>, AppError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.tag == tag)
            .map(|p| Post {
                images: Vec::new(),
                ..p.clone()
            })
            .collect();
        posts.sort_by(|a, b| a.like_count.cmp(&b.like_count).then(a.id.cmp(&b.id)));
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment, AppError> {
        let mut tables = self.tables.write().await;

        let comment_id = next_id(&mut tables.next_comment_id);
        let post = tables
            .posts
            .get_mut(&new_comment.post_id)
            .ok_or_else(|| AppError::post_not_found(new_comment.post_id))?;
        post.comment_count += 1;

        let comment = Comment {
            id: comment_id,
            post_id: new_comment.post_id,
            user_id: new_comment.user_id,
            content: new_comment.content,
            created_at: new_comment.created_at,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn like_exists(&self, user_id: i64, post_id: i64) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id))
    }

    async fn insert_like(&self, user_id: i64, post_id: i64) -> Result<PostLike, AppError> {
        let mut tables = self.tables.write().await;

        if tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id)
        {
            return Err(already_liked());
        }

        let like_id = next_id(&mut tables.next_like_id);
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| AppError::post_not_found(post_id))?;
        post.like_count += 1;

        let like = PostLike {
            id: like_id,
            post_id,
            user_id,
        };
        tables.likes.push(like.clone());
        Ok(like)
    }
}
