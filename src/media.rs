use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::PathBuf;

use crate::constants::RECIPE_IMAGE_DIR;
use crate::error::{AppError, Result};
use crate::security::content_digest;

/// Formats accepted for recipe images, keyed by MIME subtype
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "png"),
    ("jpeg", "jpg"),
    ("jpg", "jpg"),
    ("gif", "gif"),
    ("webp", "webp"),
];

/// Filesystem image store under MEDIA_ROOT, served at MEDIA_URL
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url: String,
}

/// A decoded `data:image/<ext>;base64,...` payload
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, url: &str) -> Self {
        let mut url = url.to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        Self {
            root: root.into(),
            url,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Decode and store an image, returning the reference saved on the recipe
    pub async fn save_image(&self, payload: &str) -> Result<String> {
        let image = decode_data_uri(payload)?;
        let file_name = format!("{}.{}", &content_digest(&image.bytes)[..32], image.extension);

        let dir = self.root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        tracing::debug!("Stored image {} ({} bytes)", file_name, image.bytes.len());

        Ok(format!("{}{}/{}", self.url, RECIPE_IMAGE_DIR, file_name))
    }
}

/// Parse a base64 image data URI
pub fn decode_data_uri(payload: &str) -> Result<DecodedImage> {
    let invalid = || AppError::InvalidInput("Image must be a base64 encoded data URI".to_string());

    let rest = payload.trim().strip_prefix("data:").ok_or_else(invalid)?;
    let (mime, data) = rest.split_once(";base64,").ok_or_else(invalid)?;
    let subtype = mime
        .strip_prefix("image/")
        .ok_or_else(invalid)?
        .to_ascii_lowercase();

    let extension = IMAGE_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == subtype)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| AppError::InvalidInput(format!("Unsupported image type: {subtype}")))?;

    let bytes = STANDARD.decode(data.trim()).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }

    Ok(DecodedImage { extension, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_uri() {
        let image = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes, b"hello");

        let jpeg = decode_data_uri("data:image/JPEG;base64,aGVsbG8=").unwrap();
        assert_eq!(jpeg.extension, "jpg");
    }

    #[test]
    fn test_decode_data_uri_rejects_malformed() {
        assert!(decode_data_uri("aGVsbG8=").is_err());
        assert!(decode_data_uri("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(decode_data_uri("data:image/tiff;base64,aGVsbG8=").is_err());
        assert!(decode_data_uri("data:image/png;base64,not base64!").is_err());
        assert!(decode_data_uri("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_save_image_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "/media");

        let first = tokio_test::block_on(storage.save_image("data:image/png;base64,aGVsbG8="))
            .unwrap();
        let second = tokio_test::block_on(storage.save_image("data:image/png;base64,aGVsbG8="))
            .unwrap();

        assert!(first.starts_with("/media/recipes/"));
        assert!(first.ends_with(".png"));
        assert_eq!(first, second);

        let file_name = first.rsplit('/').next().unwrap();
        let stored = std::fs::read(dir.path().join("recipes").join(file_name)).unwrap();
        assert_eq!(stored, b"hello");
    }
}
