use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::post::PostUploadRequest,
    presenter,
    services::{AccountService, FeedService},
    store::ImageUpload,
    utils::jwt::Caller,
};

/// Images accepted per post.
pub const MAX_IMAGES_PER_POST: usize = 10;

/// Upload a new post.
/// Multipart form: `request` (JSON) and zero or more `images` file parts.
pub async fn upload_post(
    State(feed): State<FeedService>,
    State(accounts): State<AccountService>,
    Caller(claims): Caller,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    // Reject anonymous callers before reading the upload body.
    let Some(user) = accounts.resolve(claims.as_ref()).await? else {
        return Err(AppError::login_required());
    };

    let mut request: Option<PostUploadRequest> = None;
    let mut images: Vec<ImageUpload> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("request") => {
                let data = field.bytes().await?;
                request = Some(serde_json::from_slice(&data)?);
            }
            Some("images") => {
                if images.len() >= MAX_IMAGES_PER_POST {
                    return Err(AppError::BadRequest(format!(
                        "At most {} images per post",
                        MAX_IMAGES_PER_POST
                    )));
                }

                let content_type = field.content_type().map(str::to_string);
                if !content_type
                    .as_deref()
                    .is_some_and(|ct| ct.starts_with("image/"))
                {
                    return Err(AppError::BadRequest(
                        "Only image uploads are accepted".to_string(),
                    ));
                }

                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }
                images.push(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {
                tracing::debug!("Ignoring multipart field {:?}", name);
            }
        }
    }

    let request =
        request.ok_or_else(|| AppError::BadRequest("Missing 'request' part".to_string()))?;

    let post = feed.create_post(request, images, Some(&user)).await?;

    Ok((StatusCode::CREATED, Json(presenter::post_view(&post, &user))))
}

/// List the most recent posts.
pub async fn list_posts(State(feed): State<FeedService>) -> Result<impl IntoResponse, AppError> {
    let posts = feed.list_recent_posts().await?;
    Ok(Json(posts))
}

/// Main page highlights.
pub async fn main_page_posts(
    State(feed): State<FeedService>,
) -> Result<impl IntoResponse, AppError> {
    let posts = feed.main_page_highlights().await?;
    Ok(Json(posts))
}
