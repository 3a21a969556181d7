//! Data layer for a small video-on-demand site: channels, videos, comments,
//! and cleanup of uploaded media when their records are deleted.

pub mod app_config;
pub mod cleanup;
pub mod db;
pub mod error;
pub mod orm;
pub mod storage;
pub mod store;

pub use cleanup::{CleanupFailure, CleanupHandler, StorageCleanup};
pub use error::{VodError, VodResult};
pub use store::{DeletionSummary, VodStore};
