use base64::Engine;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::gemini::{GeminiError, ImageModel, InlineData, Part};
use crate::models::EnhancedImageResult;
use crate::uploads::Uploads;

pub const ENHANCE_INSTRUCTION: &str =
    "Make this image look professional for an e-commerce website selling artisan products.";

#[derive(Debug, Error)]
enum EnhanceError {
    #[error("IO error: {0}")] Io(#[from] std::io::Error),
    #[error("model error: {0}")] Model(#[from] GeminiError),
    #[error("bad base64 payload: {0}")] Base64(#[from] base64::DecodeError),
    #[error("image error: {0}")] Image(#[from] image::ImageError),
}

/// Asks the image model for a studio-quality version of a product photo.
#[derive(Clone)]
pub struct ImageEnhancer {
    model: Arc<dyn ImageModel>,
    uploads: Uploads,
}

impl ImageEnhancer {
    pub fn new(model: Arc<dyn ImageModel>, uploads: Uploads) -> Self {
        Self { model, uploads }
    }

    /// Always yields a usable path: the enhanced copy, or `original` when
    /// anything along the way goes wrong.
    pub async fn enhance(&self, original: &Path) -> EnhancedImageResult {
        info!("[Gemini] Enhancing image: {}", original.display());
        match self.try_enhance(original).await {
            Ok(path) => {
                info!("[Gemini] Enhancement successful. Saved: {}", path.display());
                EnhancedImageResult { success: true, path }
            }
            Err(e) => {
                warn!("⚠️ Image enhancement failed, keeping original {}: {}", original.display(), e);
                EnhancedImageResult { success: false, path: original.to_path_buf() }
            }
        }
    }

    async fn try_enhance(&self, original: &Path) -> Result<PathBuf, EnhanceError> {
        let bytes = tokio::fs::read(original).await?;
        let image = InlineData::from_bytes(detect_image_mime(&bytes), &bytes);

        let parts = self.model.generate_parts(ENHANCE_INSTRUCTION, image).await?;
        let payload = parts
            .into_iter()
            .find_map(|p| match p {
                Part::Inline { inline_data } => Some(inline_data),
                _ => None,
            })
            .ok_or(GeminiError::NoContent("image"))?;
        info!("🎯 Found image data with mime type: {}", payload.mime_type);

        let raw = base64::engine::general_purpose::STANDARD.decode(payload.data.trim())?;
        let decoded = image::load_from_memory(&raw)?;
        let mut png = Cursor::new(Vec::new());
        decoded.write_to(&mut png, image::ImageFormat::Png)?;

        Ok(self.uploads.save_enhanced(png.get_ref()).await?)
    }
}

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => "image/png",
    }
}
