use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("audio file not found")]
    NotFound,
    #[error("invalid audio file name")]
    InvalidFileName,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    fn from_io(e: std::io::Error) -> Self {
        if e.kind() == ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Filesystem store for recorded takes. Files land under `<data_dir>/uploads`
/// and are written through a temp file so readers never observe partial audio.
pub struct AudioStore {
    base_path: PathBuf,
}

impl AudioStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_path: data_dir.join("uploads"),
        }
    }

    fn audio_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(file_name)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join("tmp").join(Uuid::new_v4().to_string())
    }

    pub async fn exists(&self, file_name: &str) -> Result<bool, MediaError> {
        validate_file_name(file_name)?;
        Ok(self.audio_path(file_name).exists())
    }

    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, MediaError> {
        validate_file_name(file_name)?;
        let path = self.audio_path(file_name);
        fs::read(&path).await.map_err(MediaError::from_io)
    }

    pub async fn write(&self, file_name: &str, data: &[u8]) -> Result<(), MediaError> {
        validate_file_name(file_name)?;

        let temp_path = self.temp_path();
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut temp_file = File::create(&temp_path).await?;
        temp_file.write_all(data).await?;
        temp_file.sync_all().await?;

        let final_path = self.audio_path(file_name);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::rename(&temp_path, &final_path).await?;

        Ok(())
    }

    pub async fn delete(&self, file_name: &str) -> Result<bool, MediaError> {
        validate_file_name(file_name)?;
        let path = self.audio_path(file_name);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MediaError::Io(e)),
        }
    }
}

fn validate_file_name(file_name: &str) -> Result<(), MediaError> {
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(MediaError::InvalidFileName);
    }

    if file_name.contains(['/', '\\', '\0']) {
        return Err(MediaError::InvalidFileName);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = AudioStore::new(temp_dir.path());

        let data = b"RIFF fake wav bytes".to_vec();
        store.write("take_1_1700000000.wav", &data).await.unwrap();

        assert!(store.exists("take_1_1700000000.wav").await.unwrap());
        let content = store.read("take_1_1700000000.wav").await.unwrap();
        assert_eq!(content, data);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = AudioStore::new(temp_dir.path());

        store.write("take.wav", b"first").await.unwrap();
        store.write("take.wav", b"second").await.unwrap();

        assert_eq!(store.read("take.wav").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = AudioStore::new(temp_dir.path());

        assert!(!store.exists("missing.wav").await.unwrap());
        assert!(matches!(
            store.read("missing.wav").await,
            Err(MediaError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = AudioStore::new(temp_dir.path());

        store.write("take.wav", b"bytes").await.unwrap();
        assert!(store.delete("take.wav").await.unwrap());
        assert!(!store.exists("take.wav").await.unwrap());
        assert!(!store.delete("take.wav").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_traversal_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = AudioStore::new(temp_dir.path());

        for name in ["", ".", "..", "../escape.wav", "a/b.wav", "a\\b.wav"] {
            assert!(
                matches!(store.read(name).await, Err(MediaError::InvalidFileName)),
                "name {name:?} should be rejected"
            );
        }
    }
}
