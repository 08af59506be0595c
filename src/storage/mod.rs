// Local file system storage for uploaded documents
mod local;

pub use local::LocalStorage;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::io::AsyncRead;

// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String), // Returned when a stored file is missing

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error), // Wraps standard I/O errors

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// A file written to storage under its resolved name.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Collision-free name actually written to disk.
    pub filename: String,
    /// Absolute path of the written file.
    pub path: String,
}

/// An opened stored file ready to be streamed.
pub struct StoredObject {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub len: u64,
}

// Async Storage trait
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `content` under `filename`, or under the first free numbered
    /// variant (`name(1).ext`, `name(2).ext`, ...) when the name is taken.
    async fn store(&self, filename: &str, content: Bytes) -> Result<StoredFile, StorageError>;

    /// Open a stored file for reading.
    /// Returns `StorageError::NotFound` when the file is gone.
    async fn open(&self, file_path: &str) -> Result<StoredObject, StorageError>;

    /// Delete a stored file. Missing files are not an error.
    async fn delete(&self, file_path: &str) -> Result<(), StorageError>;
}
