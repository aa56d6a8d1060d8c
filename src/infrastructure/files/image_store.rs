//! Local-disk storage for uploaded service images.
//!
//! Images arrive base64 encoded (optionally as a `data:` URI). They are
//! content-addressed by SHA-256 so re-uploading the same picture reuses the
//! same file, and a JPEG thumbnail is written next to each original.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::application::ports::{ImageStore, ImageStoreError};

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;
const THUMBNAIL_QUALITY: u8 = 80;
const THUMBNAIL_SUFFIX: &str = "_thumb.jpg";

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    /// Directory files are written to
    root: PathBuf,
    /// Prefix of the returned references, matching the static file route
    public_prefix: String,
    max_bytes: usize,
    thumbnail_width: u32,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
        }
    }

    pub fn with_limits(mut self, max_bytes: usize, thumbnail_width: u32) -> Self {
        self.max_bytes = max_bytes;
        self.thumbnail_width = thumbnail_width.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Only the final path component of a reference is trusted.
    fn file_path(&self, reference: &str) -> Option<PathBuf> {
        Path::new(reference)
            .file_name()
            .map(|name| self.root.join(name))
    }
}

/// Strip an optional `data:<mime>;base64,` prefix and decode, padded first.
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, ImageStoreError> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(ImageStoreError::Invalid("empty image string".into()));
    }
    let payload = match encoded.split_once(',') {
        Some((header, body)) if header.to_ascii_lowercase().contains("base64") => body,
        _ => encoded,
    };

    STANDARD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| ImageStoreError::Invalid(format!("failed to decode base64: {}", e)))
}

/// File extension from magic bytes; `.bin` when unrecognised.
pub fn detect_extension(data: &[u8]) -> &'static str {
    if data.len() < 12 {
        return ".bin";
    }
    match data {
        [0xFF, 0xD8, ..] => ".jpg",
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => ".png",
        [b'G', b'I', b'F', b'8', ..] => ".gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ".webp",
        _ => ".bin",
    }
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn thumbnail_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    format!("{}{}", stem, THUMBNAIL_SUFFIX)
}

/// Scale down to `max_width` (never up) and encode as JPEG.
fn render_thumbnail(data: &[u8], max_width: u32) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Triangle)
    } else {
        img
    };

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), THUMBNAIL_QUALITY);
    img.to_rgb8().write_with_encoder(encoder)?;
    Ok(buffer)
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save_base64(&self, encoded: &str) -> Result<String, ImageStoreError> {
        let data = decode_base64_image(encoded)?;
        if data.len() > self.max_bytes {
            return Err(ImageStoreError::Invalid(format!(
                "image exceeds max size of {} bytes",
                self.max_bytes
            )));
        }

        let ext = detect_extension(&data);
        let name = format!("{}{}", content_hash(&data), ext);

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&name), &data).await?;

        // Thumbnails are best effort; `.bin` payloads simply have none.
        let width = self.thumbnail_width;
        match tokio::task::spawn_blocking(move || render_thumbnail(&data, width)).await {
            Ok(Ok(thumb)) => {
                if let Err(e) = tokio::fs::write(self.root.join(thumbnail_name(&name)), thumb).await
                {
                    warn!(file = %name, error = %e, "Failed to write thumbnail");
                }
            }
            Ok(Err(e)) => debug!(file = %name, error = %e, "No thumbnail generated"),
            Err(e) => warn!(file = %name, error = %e, "Thumbnail task failed"),
        }

        Ok(format!("{}/{}", self.public_prefix, name))
    }

    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError> {
        let Some(path) = self.file_path(reference) else {
            return Ok(());
        };
        let thumb = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| self.root.join(thumbnail_name(n)));

        for target in std::iter::once(path).chain(thumb) {
            match tokio::fs::remove_file(&target).await {
                Ok(()) => debug!(path = %target.display(), "Removed image file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "salon-images-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 4, image::Rgb([200, 10, 10]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn detects_magic_numbers() {
        assert_eq!(detect_extension(&tiny_png()), ".png");
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend([0u8; 10]);
        assert_eq!(detect_extension(&jpeg), ".jpg");
        assert_eq!(detect_extension(b"RIFF\0\0\0\0WEBPVP8 "), ".webp");
        assert_eq!(detect_extension(b"GIF89a......"), ".gif");
        assert_eq!(detect_extension(b"short"), ".bin");
    }

    #[test]
    fn decodes_data_uri_and_unpadded_input() {
        let bytes = b"hello image";
        let padded = STANDARD.encode(bytes);
        let uri = format!("data:image/png;base64,{}", padded);
        assert_eq!(decode_base64_image(&uri).unwrap(), bytes);

        let unpadded = STANDARD_NO_PAD.encode(bytes);
        assert_eq!(decode_base64_image(&unpadded).unwrap(), bytes);

        assert!(matches!(
            decode_base64_image("%%%"),
            Err(ImageStoreError::Invalid(_))
        ));
        assert!(decode_base64_image("  ").is_err());
    }

    #[test]
    fn thumbnail_name_replaces_extension() {
        assert_eq!(thumbnail_name("abc.png"), "abc_thumb.jpg");
        assert_eq!(thumbnail_name("abc"), "abc_thumb.jpg");
    }

    #[tokio::test]
    async fn save_and_delete_round_trip() {
        let dir = scratch_dir("roundtrip");
        let store = LocalImageStore::new(&dir, "uploads");
        let png = tiny_png();

        let reference = store.save_base64(&STANDARD.encode(&png)).await.unwrap();
        let expected = format!("uploads/{}.png", content_hash(&png));
        assert_eq!(reference, expected);

        let file = dir.join(format!("{}.png", content_hash(&png)));
        let thumb = dir.join(format!("{}_thumb.jpg", content_hash(&png)));
        assert!(file.exists());
        assert!(thumb.exists());

        store.delete(&reference).await.unwrap();
        assert!(!file.exists());
        assert!(!thumb.exists());

        // Deleting again is fine.
        store.delete(&reference).await.unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected() {
        let dir = scratch_dir("oversized");
        let store = LocalImageStore::new(&dir, "uploads").with_limits(16, 400);
        let err = store
            .save_base64(&STANDARD.encode([0u8; 64]))
            .await
            .unwrap_err();
        assert!(matches!(err, ImageStoreError::Invalid(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn delete_ignores_directory_components() {
        let dir = scratch_dir("traversal");
        let store = LocalImageStore::new(&dir, "uploads");
        store.delete("../../etc/passwd").await.unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }
}
