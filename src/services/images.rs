use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::{
    config::UploadConfig,
    error::{Error, Result},
};

/// Image extensions accepted for movie posters.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Content types matching [`ALLOWED_EXTENSIONS`].
const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// An image received in a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Persists uploaded images and hands back the URL they are served from.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, image: UploadedImage) -> Result<String>;
}

/// Stores images on the local filesystem, content-addressed by SHA-256.
pub struct LocalImageStore {
    dir: PathBuf,
    public_url: String,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.dir, &config.public_url)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if it is missing
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Internal(format!("Failed to create upload directory {:?}: {}", self.dir, e))
        })
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, image: UploadedImage) -> Result<String> {
        let extension = image_extension(&image)?;

        let mut hasher = Sha256::new();
        hasher.update(&image.bytes);
        let hash = hex::encode(hasher.finalize());

        let file_name = format!("{}.{}", hash, extension);
        let path = self.dir.join(&file_name);

        // Identical content maps to the same file
        if fs::try_exists(&path).await? {
            tracing::debug!(file = %file_name, "Image already stored");
        } else {
            fs::write(&path, &image.bytes).await.map_err(|e| {
                Error::Internal(format!("Failed to write image {:?}: {}", path, e))
            })?;
            tracing::info!(file = %file_name, bytes = image.bytes.len(), "Stored image");
        }

        Ok(format!("{}/{}", self.public_url, file_name))
    }
}

/// Returns the normalized extension of an acceptable image, or `BadRequest`.
fn image_extension(image: &UploadedImage) -> Result<String> {
    if image.bytes.is_empty() {
        return Err(Error::BadRequest("Image file is empty".to_string()));
    }

    let extension = Path::new(&image.filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    let content_type_ok = image
        .content_type
        .as_deref()
        .is_none_or(|content_type| ALLOWED_CONTENT_TYPES.contains(&content_type));

    match extension {
        Some(extension) if content_type_ok => Ok(extension),
        _ => Err(Error::BadRequest(
            "Only image files are allowed (jpg, jpeg, png, webp)".to_string(),
        )),
    }
}
