//! Storage backend abstraction for uploaded media.
//!
//! Supports multiple backends:
//! - `local`: Local filesystem storage
//! - `s3`: S3-compatible object storage (MinIO, AWS S3, etc.)
//!
//! Objects are addressed by their relative path, e.g. `video/2024/01/31/intro.mp4`,
//! which is exactly what the entity file fields hold.

pub mod local;
pub mod s3;

use crate::app_config::StorageConfig;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Storage operation errors.
#[derive(Debug)]
pub enum StorageError {
    /// File not found
    NotFound(String),
    /// I/O error
    Io(std::io::Error),
    /// S3 error
    S3(String),
    /// Path is empty, absolute, or escapes the storage root
    InvalidPath(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::Io(e) => write!(f, "I/O error: {}", e),
            StorageError::S3(msg) => write!(f, "S3 error: {}", msg),
            StorageError::InvalidPath(msg) => write!(f, "Invalid path: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

/// Trait for storage backends.
///
/// All storage backends must implement this trait to provide
/// a unified interface for media file operations.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a file at `path`, replacing anything already there.
    async fn put_object(&self, data: Vec<u8>, path: &str) -> Result<(), StorageError>;

    /// Delete the file at `path`.
    async fn delete_object(&self, path: &str) -> Result<(), StorageError>;

    /// Check if a file exists.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Public URL under which the file at `path` is served.
    fn url_for(&self, path: &str) -> String;
}

/// Build a dated upload path: `{dir}/{YYYY}/{MM}/{DD}/{file_name}`.
///
/// Only the final component of `file_name` is kept so client supplied names
/// cannot place files outside `dir`.
pub fn upload_path(dir: &str, file_name: &str, date: NaiveDate) -> Result<String, StorageError> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(StorageError::InvalidPath(file_name.to_string()));
    }

    let dir = dir.trim_matches('/');
    Ok(format!("{}/{}/{}", dir, date.format("%Y/%m/%d"), name))
}

/// `path` with `_{n}` inserted before the file extension.
pub fn numbered_path(path: &str, n: u32) -> String {
    let (dir, name) = match path.rfind('/') {
        Some(slash) => path.split_at(slash + 1),
        None => ("", path),
    };
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{}_{}{}", dir, &name[..dot], n, &name[dot..]),
        _ => format!("{}{}_{}", dir, name, n),
    }
}

/// Reject paths that are empty, absolute, or contain parent references.
pub(crate) fn check_relative_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty()
        || path.starts_with('/')
        || path.starts_with('\\')
        || path.split(['/', '\\']).any(|part| part == "..")
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Join a public base URL and a relative object path.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Construct the storage backend selected in configuration.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>, StorageError> {
    match config.backend.as_str() {
        "s3" => {
            let region = rusoto_core::Region::Custom {
                name: config.s3_region.clone(),
                endpoint: config.s3_endpoint.clone(),
            };
            let storage = if config.s3_access_key.is_empty() {
                s3::S3Storage::new(
                    region,
                    config.s3_bucket.clone(),
                    config.s3_public_url.clone(),
                )
            } else {
                s3::S3Storage::with_credentials(
                    region,
                    config.s3_bucket.clone(),
                    config.s3_public_url.clone(),
                    config.s3_access_key.clone(),
                    config.s3_secret_key.clone(),
                )?
            };
            Ok(Arc::new(storage))
        }
        "local" => Ok(Arc::new(local::LocalStorage::new(
            config.local_path.clone().into(),
            config.media_url.clone(),
        )?)),
        other => Err(StorageError::InvalidPath(format!(
            "unknown storage backend: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_upload_path_is_dated() {
        let path = upload_path("video", "intro.mp4", day()).unwrap();
        assert_eq!(path, "video/2024/01/31/intro.mp4");
    }

    #[test]
    fn test_upload_path_strips_directories_from_name() {
        let path = upload_path("background_image/", "../../etc/passwd", day()).unwrap();
        assert_eq!(path, "background_image/2024/01/31/passwd");

        let path = upload_path("video", "C:\\Users\\me\\clip.webm", day()).unwrap();
        assert_eq!(path, "video/2024/01/31/clip.webm");
    }

    #[test]
    fn test_upload_path_rejects_empty_name() {
        assert!(upload_path("video", "", day()).is_err());
        assert!(upload_path("video", "uploads/", day()).is_err());
        assert!(upload_path("video", "..", day()).is_err());
    }

    #[test]
    fn test_numbered_path() {
        assert_eq!(
            numbered_path("video/2024/01/31/intro.mp4", 1),
            "video/2024/01/31/intro_1.mp4"
        );
        assert_eq!(
            numbered_path("video/2024/01/31/archive.tar.gz", 2),
            "video/2024/01/31/archive.tar_2.gz"
        );
        assert_eq!(numbered_path("video/2024/01/31/README", 3), "video/2024/01/31/README_3");
        assert_eq!(numbered_path("video/2024/01/31/.hidden", 1), "video/2024/01/31/.hidden_1");
    }

    #[test]
    fn test_check_relative_path() {
        assert!(check_relative_path("video/2024/01/31/a.mp4").is_ok());
        assert!(check_relative_path("").is_err());
        assert!(check_relative_path("/etc/passwd").is_err());
        assert!(check_relative_path("video/../../secret").is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/media/", "video/a.mp4"), "/media/video/a.mp4");
        assert_eq!(
            join_url("http://localhost:9000/vod", "/video/a.mp4"),
            "http://localhost:9000/vod/video/a.mp4"
        );
    }
}
