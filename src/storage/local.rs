use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use bytes::Bytes;
use super::{Storage, StorageError, StoredFile, StoredObject};
use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::utils::numbered_filename;

// Local filesystem storage
#[derive(Clone)]
pub struct LocalStorage{
    base_path: PathBuf, // Absolute directory where documents are stored
}

impl LocalStorage {
    /// Creates the upload directory if needed and resolves it to an absolute path.
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.as_ref()).await?;
        let base_path = fs::canonicalize(base_path.as_ref()).await?;
        tracing::info!("Using upload directory {:?}", base_path);
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    async fn write_new(path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        let written = match file.write_all(content).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // Leave no partially written file behind
            let _ = fs::remove_file(path).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {

    /// Reserves a free name with an atomic create-if-absent open, then writes the content.
    async fn store(&self, filename: &str, content: Bytes)
    -> Result<StoredFile, StorageError> {
        if filename.is_empty() || filename.contains(|c: char| c == '/' || c == '\\') || filename == "." || filename == ".." {
            return Err(StorageError::InvalidName(filename.to_string()));
        }

        let mut counter = 0;
        loop {
            let candidate = numbered_filename(filename, counter);
            let full_path = self.base_path.join(&candidate);

            match Self::write_new(&full_path, &content).await {
                Ok(()) => {
                    tracing::info!("Saved file at {:?}", full_path);
                    return Ok(StoredFile {
                        filename: candidate,
                        path: full_path.to_string_lossy().into_owned(),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn open(&self, file_path: &str) -> Result<StoredObject, StorageError> {
        let file = match fs::File::open(file_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(file_path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();

        Ok(StoredObject {
            reader: Box::new(file),
            len,
        })
    }

    async fn delete(&self, file_path: &str) -> Result<(), StorageError> {
        match fs::remove_file(file_path).await {
            Ok(()) => {
                tracing::info!("Removed file at {:?}", file_path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
