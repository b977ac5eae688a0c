// tests/account_service_tests.rs

mod common;

use common::{memory_services, sign_up_request};
use community::{error::AppError, models::user::LoginRequest};

#[tokio::test]
async fn blank_nickname_is_rejected() {
    let svc = memory_services();

    let mut request = sign_up_request("blank");
    request.user_nickname = "   ".to_string();

    let result = svc.accounts.sign_up(request).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn sign_up_stores_trimmed_identity() {
    let svc = memory_services();

    let mut request = sign_up_request("pacer");
    request.user_nickname = "  pacer  ".to_string();
    request.user_email = "  Pacer@Runner.Test ".to_string();

    let user = svc.accounts.sign_up(request).await.unwrap();
    assert_eq!(user.nickname, "pacer");
    assert_eq!(user.email, "pacer@runner.test");

    let token = svc
        .accounts
        .login(LoginRequest {
            user_email: "pacer@runner.test".to_string(),
            user_password: "password123".to_string(),
        })
        .await
        .unwrap();
    assert!(!token.is_empty());
}

#[tokio::test]
async fn padded_nickname_counts_only_visible_length() {
    let svc = memory_services();

    // 30 visible characters fit even with surrounding spaces.
    let mut request = sign_up_request("long");
    request.user_nickname = format!("  {}  ", "n".repeat(30));

    let user = svc.accounts.sign_up(request).await.unwrap();
    assert_eq!(user.nickname.len(), 30);
}
