//! Error type for entity store operations.

use crate::storage::StorageError;
use sea_orm::DbErr;
use validator::ValidationErrors;

/// Result type for entity store operations.
pub type VodResult<T> = Result<T, VodError>;

/// Entity store errors.
#[derive(Debug)]
pub enum VodError {
    /// A field is missing, out of bounds, or references a record that does not exist
    Validation(String),
    /// The record targeted by an update or delete does not exist
    NotFound { entity: &'static str, id: i32 },
    /// Database error
    Database(DbErr),
    /// Storage error while storing an uploaded file
    Storage(StorageError),
}

impl VodError {
    pub fn validation(msg: impl Into<String>) -> Self {
        VodError::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        VodError::NotFound { entity, id }
    }
}

impl std::fmt::Display for VodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VodError::Validation(msg) => write!(f, "Validation error: {}", msg),
            VodError::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            VodError::Database(e) => write!(f, "Database error: {}", e),
            VodError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for VodError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VodError::Database(e) => Some(e),
            VodError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbErr> for VodError {
    fn from(e: DbErr) -> Self {
        VodError::Database(e)
    }
}

impl From<StorageError> for VodError {
    fn from(e: StorageError) -> Self {
        VodError::Storage(e)
    }
}

impl From<ValidationErrors> for VodError {
    fn from(e: ValidationErrors) -> Self {
        // Sorted so the message is stable across runs.
        let mut fields: Vec<&str> = e.field_errors().keys().copied().collect();
        fields.sort_unstable();
        VodError::Validation(format!("invalid field(s): {}", fields.join(", ")))
    }
}
