// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    models::user::{LoginRequest, SignUpRequest},
    services::AccountService,
};

/// Registers a new user.
///
/// Returns 201 Created and the user object (excluding password).
/// Duplicate email or nickname yields 409.
pub async fn sign_up(
    State(accounts): State<AccountService>,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts.sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(accounts): State<AccountService>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = accounts.login(payload).await?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
    })))
}
