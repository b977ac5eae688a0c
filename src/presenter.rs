// src/presenter.rs

//! Response shapes sent to the mobile client and the pure functions that build
//! them from stored entities. Field names are part of the client contract.

use serde::{Deserialize, Serialize};

use crate::models::{comment::Comment, post::Post, user::User};

/// Detailed post view used by the community feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostViewResponse {
    pub post_id: i64,
    pub user_nickname: String,
    pub user_id: i64,
    pub comment_count: i64,
    pub like_count: i64,
    pub post_title: String,
    pub post_content: String,
    pub post_tag: bool,
    pub post_images: Vec<String>,
    pub post_date: chrono::DateTime<chrono::Utc>,
}

/// Lightweight view for the landing page. No body, no images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MainPagePostResponse {
    pub post_id: i64,
    pub user_nickname: String,
    pub like_count: i64,
    pub post_title: String,
    pub post_tag: bool,
    pub post_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentViewResponse {
    pub comment_id: i64,
    pub user_nickname: String,
    pub comment_content: String,
    pub comment_write_time: chrono::DateTime<chrono::Utc>,
}

/// Image URLs of `post`, in upload order.
pub fn image_urls(post: &Post) -> Vec<String> {
    let mut images: Vec<_> = post.images.iter().collect();
    images.sort_by_key(|image| image.position);
    images.into_iter().map(|image| image.url.clone()).collect()
}

pub fn post_view(post: &Post, author: &User) -> PostViewResponse {
    PostViewResponse {
        post_id: post.id,
        user_nickname: author.nickname.clone(),
        user_id: author.id,
        comment_count: post.comment_count,
        like_count: post.like_count,
        post_title: post.title.clone(),
        post_content: post.content.clone(),
        post_tag: post.tag,
        post_images: image_urls(post),
        post_date: post.created_at,
    }
}

pub fn main_page_post(post: &Post, author: &User) -> MainPagePostResponse {
    MainPagePostResponse {
        post_id: post.id,
        user_nickname: author.nickname.clone(),
        like_count: post.like_count,
        post_title: post.title.clone(),
        post_tag: post.tag,
        post_date: post.created_at,
    }
}

pub fn comment_view(comment: &Comment, author: &User) -> CommentViewResponse {
    CommentViewResponse {
        comment_id: comment.id,
        user_nickname: author.nickname.clone(),
        comment_content: comment.content.clone(),
        comment_write_time: comment.created_at,
    }
}
