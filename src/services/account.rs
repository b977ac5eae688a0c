// src/services/account.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, NewUser, SignUpRequest, User},
    store::CommunityStore,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registration, login and resolution of token claims to users.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CommunityStore>,
    jwt_secret: String,
    jwt_expiration: u64,
}

impl AccountService {
    pub fn new(store: Arc<dyn CommunityStore>, jwt_secret: String, jwt_expiration: u64) -> Self {
        Self {
            store,
            jwt_secret,
            jwt_expiration,
        }
    }

    pub async fn sign_up(&self, mut request: SignUpRequest) -> Result<User, AppError> {
        request.user_email = request.user_email.trim().to_lowercase();
        request.user_nickname = request.user_nickname.trim().to_string();
        request.validate()?;

        let password_hash = hash_password(&request.user_password)?;

        let user = self
            .store
            .insert_user(NewUser {
                email: request.user_email,
                nickname: request.user_nickname,
                password_hash,
                height: request.user_height,
                weight: request.user_weight,
            })
            .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Returns a signed bearer token.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        request.validate()?;

        let email = request.user_email.trim().to_lowercase();
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.user_password, &user.password)? {
            return Err(AppError::AuthError(
                "Invalid email or password".to_string(),
            ));
        }

        sign_jwt(user.id, &self.jwt_secret, self.jwt_expiration)
    }

    /// Maps verified claims to the stored user. Claims for a user that no
    /// longer exists resolve to `None`, same as no claims at all.
    pub async fn resolve(&self, claims: Option<&Claims>) -> Result<Option<User>, AppError> {
        match claims.and_then(Claims::user_id) {
            Some(id) => self.store.find_user(id).await,
            None => Ok(None),
        }
    }
}
