// src/store/images.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::fs;
use url::Url;
use uuid::Uuid;

use crate::error::AppError;

/// Prefix under which uploaded files are served.
pub const UPLOAD_ROUTE: &str = "uploads";

/// A raw image payload as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// An image the object store has accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Store-specific handle, used for removal.
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores every payload and returns the records in the same order.
    async fn upload(&self, files: Vec<ImageUpload>) -> Result<Vec<StoredImage>, AppError>;

    /// Removes previously uploaded images. Missing files are ignored.
    async fn remove(&self, images: &[StoredImage]) -> Result<(), AppError>;
}

/// Writes images to a local directory that the router serves under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    upload_dir: PathBuf,
    base_url: Url,
}

impl LocalImageStore {
    pub fn new(upload_dir: impl Into<PathBuf>, base_url: Url) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            base_url,
        }
    }

    /// A fresh uuid name. The extension comes from the client file name, or from
    /// the content type when the name has none.
    fn file_name_for(upload: &ImageUpload) -> String {
        let extension = upload
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .or_else(|| {
                upload
                    .content_type
                    .as_deref()
                    .and_then(extension_for_content_type)
                    .map(str::to_string)
            })
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        format!("{}{}", Uuid::new_v4(), extension)
    }

    fn url_for(&self, file_name: &str) -> Result<String, AppError> {
        self.base_url
            .join(&format!("{}/{}", UPLOAD_ROUTE, file_name))
            .map(String::from)
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, files: Vec<ImageUpload>) -> Result<Vec<StoredImage>, AppError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.upload_dir).await?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let key = Self::file_name_for(&file);
            let path = self.upload_dir.join(&key);

            let written = match self.url_for(&key) {
                Ok(url) => fs::write(&path, &file.bytes)
                    .await
                    .map(|()| url)
                    .map_err(|e| {
                        tracing::error!("Failed to write image {:?}: {}", path, e);
                        AppError::from(e)
                    }),
                Err(e) => Err(e),
            };

            match written {
                Ok(url) => stored.push(StoredImage { key, url }),
                Err(e) => {
                    // Roll back the part of the batch that already landed.
                    if let Err(cleanup) = self.remove(&stored).await {
                        tracing::warn!("Cleanup after failed upload incomplete: {}", cleanup);
                    }
                    return Err(e);
                }
            }
        }

        tracing::debug!(count = stored.len(), "images stored");
        Ok(stored)
    }

    async fn remove(&self, images: &[StoredImage]) -> Result<(), AppError> {
        for image in images {
            match fs::remove_file(self.upload_dir.join(&image.key)).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
