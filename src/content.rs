use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::gemini::{GeminiError, Part, TextModel};
use crate::location::ensure_location;
use crate::models::{first_non_empty, ProductContentRequest, ProductContentResult};
use crate::normalize::normalize_description;
use crate::parse::parse_model_output;
use crate::prompt::build_content_prompt;

/// Turns raw artisan input into listing copy. Never fails: any model problem
/// degrades to the artisan's own words.
#[derive(Clone)]
pub struct ContentGenerator {
    model: Arc<dyn TextModel>,
}

impl ContentGenerator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub async fn generate(&self, req: &ProductContentRequest) -> ProductContentResult {
        match self.try_generate(req).await {
            Ok(result) => {
                info!("✅ Generated content for '{}' -> '{}'", req.title, result.title);
                result
            }
            Err(e) => {
                warn!("⚠️ Content generation failed for '{}', keeping original text: {}", req.title, e);
                ProductContentResult::fallback(req)
            }
        }
    }

    async fn try_generate(&self, req: &ProductContentRequest) -> Result<ProductContentResult, GeminiError> {
        let mut parts = vec![Part::text(build_content_prompt(req))];
        if let Some(path) = &req.voice_note_path {
            let audio = tokio::fs::read(path).await?;
            parts.push(Part::inline(voice_note_mime(path), &audio));
        }

        let text = self.model.generate_text(parts).await?;
        let parsed = parse_model_output(text.trim());

        let description = normalize_description(first_non_empty(
            &parsed.description,
            first_non_empty(&req.description, &req.story),
        ));
        let backstory = ensure_location(first_non_empty(&parsed.backstory, &req.story), &req.artisan_location);

        Ok(ProductContentResult {
            title: first_non_empty(&parsed.title, &req.title).to_string(),
            description,
            backstory,
        })
    }
}

pub fn voice_note_mime(path: &Path) -> &'static str {
    let is_mp3 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
    if is_mp3 { "audio/mpeg" } else { "audio/webm" }
}
