//! S3-compatible storage backend.

use super::{check_relative_path, join_url, StorageBackend, StorageError};
use async_trait::async_trait;
use rusoto_core::credential::StaticProvider;
use rusoto_core::{HttpClient, Region};
use rusoto_s3::{DeleteObjectRequest, ListObjectsV2Request, PutObjectRequest, S3Client, S3};

/// S3-compatible storage backend.
pub struct S3Storage {
    s3: S3Client,
    bucket_name: String,
    pub pub_url: String,
}

impl S3Storage {
    /// Create a new S3 storage backend using the default credential chain.
    pub fn new(region: Region, bucket_name: String, pub_url: String) -> S3Storage {
        log::info!("S3Storage initialized for bucket: {}", bucket_name);

        S3Storage {
            s3: S3Client::new(region),
            bucket_name,
            pub_url,
        }
    }

    /// Create a new S3 storage backend with a static access key pair.
    pub fn with_credentials(
        region: Region,
        bucket_name: String,
        pub_url: String,
        access_key: String,
        secret_key: String,
    ) -> Result<S3Storage, StorageError> {
        let http = HttpClient::new().map_err(|e| StorageError::S3(e.to_string()))?;
        let credentials = StaticProvider::new_minimal(access_key, secret_key);
        log::info!("S3Storage initialized for bucket: {}", bucket_name);

        Ok(S3Storage {
            s3: S3Client::new_with(http, credentials, region),
            bucket_name,
            pub_url,
        })
    }
}

#[async_trait]
impl StorageBackend for S3Storage {
    async fn put_object(&self, data: Vec<u8>, path: &str) -> Result<(), StorageError> {
        check_relative_path(path)?;
        log::info!("S3Storage: put_object: {}", path);

        let put_request = PutObjectRequest {
            bucket: self.bucket_name.clone(),
            key: path.to_owned(),
            body: Some(data.into()),
            ..Default::default()
        };

        self.s3
            .put_object(put_request)
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        Ok(())
    }

    async fn delete_object(&self, path: &str) -> Result<(), StorageError> {
        check_relative_path(path)?;
        log::debug!("S3Storage: delete_object: {}", path);

        let request = DeleteObjectRequest {
            bucket: self.bucket_name.clone(),
            key: path.to_owned(),
            ..Default::default()
        };

        self.s3
            .delete_object(request)
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        check_relative_path(path)?;
        log::debug!("S3Storage: exists: {}", path);

        // Using list_objects_v2 is reportedly faster than head_object
        // https://www.peterbe.com/plog/fastest-way-to-find-out-if-a-file-exists-in-s3
        let list_request = ListObjectsV2Request {
            bucket: self.bucket_name.clone(),
            prefix: Some(path.to_owned()),
            ..Default::default()
        };

        let result = self
            .s3
            .list_objects_v2(list_request)
            .await
            .map_err(|e| StorageError::S3(e.to_string()))?;

        // A prefix listing also matches longer keys, so require an exact hit.
        let found = result
            .contents
            .unwrap_or_default()
            .iter()
            .any(|object| object.key.as_deref() == Some(path));
        Ok(found)
    }

    fn url_for(&self, path: &str) -> String {
        join_url(&self.pub_url, path)
    }
}
