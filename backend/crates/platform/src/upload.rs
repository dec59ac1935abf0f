//! Uploaded File Storage
//!
//! Files land in a single directory under a timestamp name that keeps the
//! original extension. The returned path is the public URL path the static
//! file service exposes, e.g. `/uploads/1718000000000.png`. Uploads in the
//! same millisecond get a counter suffix (`1718000000000-1.png`); an
//! existing file is never overwritten.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Suffixes tried before giving up on a timestamp
const MAX_NAME_ATTEMPTS: u32 = 64;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload directory unavailable: {0}")]
    Directory(#[source] std::io::Error),

    #[error("Failed to write upload: {0}")]
    Write(#[source] std::io::Error),

    #[error("Uploaded file is empty")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_prefix: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Write `bytes` and return the public path of the stored file
    pub async fn save(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(UploadError::Directory)?;

        self.save_at(chrono::Utc::now().timestamp_millis(), original_name, bytes)
            .await
    }

    async fn save_at(
        &self,
        timestamp_ms: i64,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = stored_file_name(timestamp_ms, attempt, original_name);
            let path = self.dir.join(&file_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(UploadError::Write(e)),
            };

            file.write_all(bytes).await.map_err(UploadError::Write)?;
            file.flush().await.map_err(UploadError::Write)?;

            tracing::debug!(file = %file_name, size = bytes.len(), "Upload stored");

            return Ok(format!("{}/{}", self.public_prefix, file_name));
        }

        Err(UploadError::Write(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free upload file name",
        )))
    }
}

/// `<millis><.ext>`, or `<millis>-<attempt><.ext>` after a collision. The
/// extension is only kept when it is plain ASCII alphanumerics so client
/// names can never escape the directory.
pub fn stored_file_name(timestamp_ms: i64, attempt: u32, original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    if attempt == 0 {
        format!("{timestamp_ms}{extension}")
    } else {
        format!("{timestamp_ms}-{attempt}{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_keeps_extension() {
        assert_eq!(stored_file_name(42, 0, Some("me.PNG")), "42.png");
        assert_eq!(stored_file_name(42, 0, Some("archive.tar.gz")), "42.gz");
        assert_eq!(stored_file_name(42, 3, Some("me.png")), "42-3.png");
    }

    #[test]
    fn test_stored_file_name_drops_odd_extensions() {
        assert_eq!(stored_file_name(7, 0, None), "7");
        assert_eq!(stored_file_name(7, 0, Some("noext")), "7");
        assert_eq!(stored_file_name(7, 0, Some("x.p/ng")), "7");
        assert_eq!(stored_file_name(7, 0, Some("x.sh;rm")), "7");
    }

    #[tokio::test]
    async fn test_save_writes_file_under_prefix() {
        let dir = std::env::temp_dir().join(format!("upload-test-{}", std::process::id()));
        let store = UploadStore::new(&dir, "/uploads/");

        let public = store.save(Some("avatar.jpg"), b"jpegbytes").await.unwrap();
        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with(".jpg"));

        let file_name = public.trim_start_matches("/uploads/");
        let written = tokio::fs::read(dir.join(file_name)).await.unwrap();
        assert_eq!(written, b"jpegbytes");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_back_to_back_saves_get_distinct_files() {
        let dir = std::env::temp_dir().join(format!("upload-distinct-{}", std::process::id()));
        let store = UploadStore::new(&dir, "/uploads");

        let first = store.save(Some("a.png"), b"alice").await.unwrap();
        let second = store.save(Some("b.png"), b"bob").await.unwrap();
        assert_ne!(first, second);

        let read = |public: &str| dir.join(public.trim_start_matches("/uploads/"));
        assert_eq!(tokio::fs::read(read(&first)).await.unwrap(), b"alice");
        assert_eq!(tokio::fs::read(read(&second)).await.unwrap(), b"bob");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_save_skips_taken_name() {
        let dir = std::env::temp_dir().join(format!("upload-taken-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("42.png"), b"old").await.unwrap();
        tokio::fs::write(dir.join("42-1.png"), b"old").await.unwrap();
        let store = UploadStore::new(&dir, "/uploads");

        let public = store.save_at(42, Some("a.png"), b"new").await.unwrap();
        assert_eq!(public, "/uploads/42-2.png");
        assert_eq!(tokio::fs::read(dir.join("42.png")).await.unwrap(), b"old");
        assert_eq!(tokio::fs::read(dir.join("42-2.png")).await.unwrap(), b"new");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_save_rejects_empty() {
        let store = UploadStore::new(std::env::temp_dir(), "/uploads");
        assert!(matches!(
            store.save(Some("a.png"), b"").await,
            Err(UploadError::Empty)
        ));
    }
}
