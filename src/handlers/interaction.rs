use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::comment::CommentAddRequest,
    services::{AccountService, FeedService},
    utils::jwt::Caller,
};

/// Like a post. A second like from the same user is rejected with 409.
pub async fn add_like(
    State(feed): State<FeedService>,
    State(accounts): State<AccountService>,
    Caller(claims): Caller,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts.resolve(claims.as_ref()).await?;
    let like = feed.add_like(post_id, user.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(like)))
}

/// Create a new comment.
pub async fn add_comment(
    State(feed): State<FeedService>,
    State(accounts): State<AccountService>,
    Caller(claims): Caller,
    Json(payload): Json<CommentAddRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts.resolve(claims.as_ref()).await?;
    let comment = feed.add_comment(payload, user.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List all comments for a post.
pub async fn list_comments(
    State(feed): State<FeedService>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let comments = feed.list_comments(post_id).await?;
    Ok(Json(comments))
}
