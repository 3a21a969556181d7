//! Storage backend double that records every call
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use vod::storage::{StorageBackend, StorageError};

pub const TEST_MEDIA_URL: &str = "https://cdn.test/media";

/// In-memory storage that remembers deletes and can be told to fail them.
#[derive(Default)]
pub struct RecordingStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
}

impl RecordingStorage {
    /// Paths passed to `delete_object`, in call order, failed calls included.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }
}

#[async_trait]
impl StorageBackend for RecordingStorage {
    async fn put_object(&self, data: Vec<u8>, path: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    async fn delete_object(&self, path: &str) -> Result<(), StorageError> {
        self.deleted.lock().unwrap().push(path.to_string());
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::S3("backend unreachable".to_string()));
        }
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.contains(path))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", TEST_MEDIA_URL, path)
    }
}
