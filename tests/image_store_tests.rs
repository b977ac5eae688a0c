// tests/image_store_tests.rs

mod common;

use std::path::Path;

use axum::body::Bytes;
use common::{png, temp_upload_dir};
use community::{
    error::AppError,
    store::{ImageStore, ImageUpload, LocalImageStore},
};
use url::Url;

fn cdn() -> Url {
    Url::parse("http://cdn.test/").unwrap()
}

fn files_in(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[tokio::test]
async fn extension_follows_content_type_when_name_has_none() {
    let dir = temp_upload_dir();
    let store = LocalImageStore::new(dir.clone(), cdn());

    let stored = store
        .upload(vec![
            ImageUpload {
                file_name: None,
                content_type: Some("image/jpeg".to_string()),
                bytes: Bytes::from_static(b"jpeg"),
            },
            ImageUpload {
                file_name: Some("photo".to_string()),
                content_type: Some("image/webp".to_string()),
                bytes: Bytes::from_static(b"webp"),
            },
            ImageUpload {
                file_name: Some("track.PNG".to_string()),
                content_type: Some("image/jpeg".to_string()),
                bytes: Bytes::from_static(b"png"),
            },
            ImageUpload {
                file_name: None,
                content_type: Some("application/octet-stream".to_string()),
                bytes: Bytes::from_static(b"raw"),
            },
        ])
        .await
        .unwrap();

    assert!(stored[0].url.starts_with("http://cdn.test/uploads/"));
    assert!(stored[0].url.ends_with(".jpg"));
    assert!(stored[1].url.ends_with(".webp"));
    // The client's own extension wins over the declared type.
    assert!(stored[2].url.ends_with(".png"));
    assert!(!stored[3].key.contains('.'));
    assert_eq!(files_in(&dir), 4);
}

#[tokio::test]
async fn failed_write_mid_batch_removes_earlier_files() {
    let dir = temp_upload_dir();
    let store = LocalImageStore::new(dir.clone(), cdn());

    // An extension this long pushes the stored name past the file system limit.
    let oversized = format!("route.{}", "x".repeat(300));

    let result = store
        .upload(vec![
            png("first.png", b"one"),
            png("second.png", b"two"),
            ImageUpload {
                file_name: Some(oversized),
                content_type: Some("image/png".to_string()),
                bytes: Bytes::from_static(b"three"),
            },
        ])
        .await;

    assert!(result.is_err());
    assert!(dir.is_dir());
    assert_eq!(files_in(&dir), 0);
}

#[tokio::test]
async fn upload_dir_that_is_a_file_fails_without_leftovers() {
    let dir = temp_upload_dir();
    std::fs::write(&dir, b"not a directory").unwrap();
    let store = LocalImageStore::new(dir.join("images"), cdn());

    let result = store.upload(vec![png("first.png", b"one")]).await;

    assert!(matches!(result, Err(AppError::InternalServerError(_))));
    assert_eq!(std::fs::read(&dir).unwrap(), b"not a directory");
}

#[tokio::test]
async fn unusable_base_url_writes_nothing() {
    let dir = temp_upload_dir();
    // `data:` URLs cannot be a base, so joining the upload path fails.
    let base = Url::parse("data:text/plain,cdn").unwrap();
    let store = LocalImageStore::new(dir.clone(), base);

    let result = store
        .upload(vec![png("first.png", b"one"), png("second.png", b"two")])
        .await;

    assert!(matches!(result, Err(AppError::InternalServerError(_))));
    assert_eq!(files_in(&dir), 0);
}

#[tokio::test]
async fn remove_ignores_missing_files() {
    let dir = temp_upload_dir();
    let store = LocalImageStore::new(dir.clone(), cdn());

    let stored = store.upload(vec![png("first.png", b"one")]).await.unwrap();
    store.remove(&stored).await.unwrap();
    store.remove(&stored).await.unwrap();

    assert_eq!(files_in(&dir), 0);
}
