//! Application Configuration

use std::path::PathBuf;

/// Catalog application configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Directory uploaded profile images are written to
    pub upload_dir: PathBuf,
    /// URL path the upload directory is served under
    pub public_prefix: String,
    /// Image recorded for profiles without an upload
    pub default_profile_image: String,
    /// Name given to lazily created profiles
    pub default_profile_name: String,
    /// Request body limit for multipart profile forms
    pub max_upload_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            public_prefix: "/uploads".to_string(),
            default_profile_image: "default-profile.png".to_string(),
            default_profile_name: "Default Name".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl CatalogConfig {
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    pub fn upload_store(&self) -> platform::upload::UploadStore {
        platform::upload::UploadStore::new(&self.upload_dir, &self.public_prefix)
    }
}
