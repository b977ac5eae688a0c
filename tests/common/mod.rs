// tests/common/mod.rs

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use community::{
    config::Config,
    models::user::{SignUpRequest, User},
    routes,
    services::{AccountService, FeedService},
    state::AppState,
    store::{CommunityStore, ImageUpload, LocalImageStore, MemoryCommunityStore},
};
use url::Url;

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("community-test-{}", uuid::Uuid::new_v4()))
}

pub fn test_config(upload_dir: PathBuf, public_base_url: Url) -> Config {
    Config {
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        upload_dir,
        public_base_url,
        max_upload_bytes: 5 * 1024 * 1024,
        cors_origins: vec!["http://localhost:8081".to_string()],
        warnings: Vec::new(),
    }
}

/// Services over a fresh in-memory store and a temp upload directory.
pub struct TestServices {
    pub feed: FeedService,
    pub accounts: AccountService,
    pub upload_dir: PathBuf,
}

pub fn memory_services() -> TestServices {
    let upload_dir = temp_upload_dir();
    let base = Url::parse("http://cdn.test/").unwrap();
    let config = test_config(upload_dir.clone(), base.clone());

    let store: Arc<dyn CommunityStore> = Arc::new(MemoryCommunityStore::new());
    let images = Arc::new(LocalImageStore::new(upload_dir.clone(), base));
    let state = AppState::new(store, images, config);

    TestServices {
        feed: state.feed,
        accounts: state.accounts,
        upload_dir,
    }
}

pub fn sign_up_request(nickname: &str) -> SignUpRequest {
    SignUpRequest {
        user_email: format!("{}@runner.test", nickname),
        user_password: "password123".to_string(),
        user_nickname: nickname.to_string(),
        user_weight: 65,
        user_height: 175,
    }
}

pub async fn register(accounts: &AccountService, nickname: &str) -> User {
    accounts
        .sign_up(sign_up_request(nickname))
        .await
        .expect("sign up failed")
}

pub fn unique_nickname(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

pub fn png(name: &str, payload: &'static [u8]) -> ImageUpload {
    ImageUpload {
        file_name: Some(name.to_string()),
        content_type: Some("image/png".to_string()),
        bytes: Bytes::from_static(payload),
    }
}

/// Spawns the app on a random port with an in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let public_base_url = Url::parse(&format!("{}/", address)).unwrap();
    let upload_dir = temp_upload_dir();
    let config = test_config(upload_dir.clone(), public_base_url.clone());

    let store: Arc<dyn CommunityStore> = Arc::new(MemoryCommunityStore::new());
    let images = Arc::new(LocalImageStore::new(upload_dir, public_base_url));
    let state = AppState::new(store, images, config);

    let app = routes::create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}
