// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userId")]
    pub id: i64,

    #[serde(rename = "userEmail")]
    pub email: String,

    /// Display name shown next to posts and comments.
    #[serde(rename = "userNickname")]
    pub nickname: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// Body height in cm.
    #[serde(rename = "userHeight")]
    pub height: i32,

    /// Body weight in kg.
    #[serde(rename = "userWeight")]
    pub weight: i32,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload handed to the store once the password is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub height: i32,
    pub weight: i32,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format."))]
    pub user_email: String,

    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub user_password: String,

    #[validate(length(
        min = 1,
        max = 30,
        message = "Nickname length must be between 1 and 30 characters."
    ))]
    pub user_nickname: String,

    #[validate(range(min = 1, max = 299, message = "Weight must be between 1 and 299."))]
    pub user_weight: i32,

    #[validate(range(min = 1, max = 299, message = "Height must be between 1 and 299."))]
    pub user_height: i32,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub user_email: String,
    #[validate(length(min = 1, max = 128))]
    pub user_password: String,
}
