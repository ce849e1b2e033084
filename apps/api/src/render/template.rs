//! Background template loading.
//!
//! The template is the letterhead image drawn under every page. It is fetched
//! once per generation call, before any layout work starts; a failed fetch
//! aborts the call. Retrying is the caller's decision.

use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tracing::debug;

use crate::layout::constraints::{LayoutConfig, LayoutConstraints};
use crate::render::error::RenderError;

const JPEG_QUALITY: u8 = 90;

/// A decoded template, re-encoded as baseline RGB JPEG for a `DCTDecode` image XObject.
#[derive(Debug, Clone)]
pub struct BackgroundTemplate {
    pub width_px: u32,
    pub height_px: u32,
    pub jpeg: Vec<u8>,
}

impl BackgroundTemplate {
    /// Decodes PNG or JPEG bytes. Corrupt or empty images are fatal.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let image = image::load_from_memory(bytes)?;
        let rgb = image.to_rgb8();
        let (width_px, height_px) = rgb.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(RenderError::TemplateDecode(
                "template has zero width or height".to_string(),
            ));
        }

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
            rgb.as_raw(),
            width_px,
            height_px,
            ExtendedColorType::Rgb8,
        )?;

        debug!(width_px, height_px, jpeg_bytes = jpeg.len(), "Background template decoded");
        Ok(Self {
            width_px,
            height_px,
            jpeg,
        })
    }
}

impl BackgroundTemplate {
    /// Page geometry for documents drawn over this template.
    pub fn constraints(&self, config: &LayoutConfig) -> LayoutConstraints {
        LayoutConstraints::from_template_size(config, self.width_px, self.height_px)
    }
}

/// Source of the background template.
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn fetch(&self) -> Result<BackgroundTemplate, RenderError>;
}

/// Reads the template from an S3 (or MinIO) bucket.
pub struct S3TemplateProvider {
    client: S3Client,
    bucket: String,
    key: String,
}

impl S3TemplateProvider {
    pub fn new(client: S3Client, bucket: String, key: String) -> Self {
        Self { client, bucket, key }
    }
}

#[async_trait]
impl TemplateProvider for S3TemplateProvider {
    async fn fetch(&self) -> Result<BackgroundTemplate, RenderError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| {
                RenderError::TemplateUnavailable(format!("s3://{}/{}: {e}", self.bucket, self.key))
            })?;

        let body = object.body.collect().await.map_err(|e| {
            RenderError::TemplateUnavailable(format!("s3://{}/{}: {e}", self.bucket, self.key))
        })?;

        BackgroundTemplate::decode(&body.into_bytes())
    }
}

/// Reads the template from the local filesystem.
pub struct FileTemplateProvider {
    path: PathBuf,
}

impl FileTemplateProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TemplateProvider for FileTemplateProvider {
    async fn fetch(&self) -> Result<BackgroundTemplate, RenderError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            RenderError::TemplateUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        BackgroundTemplate::decode(&bytes)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::{Cursor, Write};

    /// PNG bytes for a small off-white letterhead with a dark footer band.
    pub(crate) fn sample_png() -> Vec<u8> {
        let mut img = RgbImage::from_pixel(42, 60, Rgb([250, 248, 240]));
        for y in 52..60 {
            for x in 0..42 {
                img.put_pixel(x, y, Rgb([30, 40, 90]));
            }
        }
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .expect("encode sample png");
        out.into_inner()
    }

    pub(crate) fn sample_template() -> BackgroundTemplate {
        BackgroundTemplate::decode(&sample_png()).expect("decode sample template")
    }

    #[test]
    fn test_decode_png_reencodes_as_jpeg() {
        let template = sample_template();
        assert_eq!((template.width_px, template.height_px), (42, 60));
        // JPEG SOI marker
        assert_eq!(&template.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = BackgroundTemplate::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RenderError::TemplateDecode(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_template_unavailable() {
        let provider = FileTemplateProvider::new("/nonexistent/letterhead.png");
        let err = provider.fetch().await.unwrap_err();
        assert!(matches!(err, RenderError::TemplateUnavailable(_)));
    }

    #[tokio::test]
    async fn test_file_provider_reads_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&sample_png()).unwrap();
        let template = FileTemplateProvider::new(file.path()).fetch().await.unwrap();
        assert_eq!(template.width_px, 42);
    }
}
