use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("status={status} body={body}")] Status { status: u16, body: String },
    #[error("parse error: {0}")] Parse(String),
    #[error("no {0} content in response")] NoContent(&'static str),
    #[error("demo mode: no API key configured")] Demo,
    #[error("IO error: {0}")] Io(#[from] std::io::Error),
}

/// Produces listing copy from a prompt plus optional attachments.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate_text(&self, parts: Vec<Part>) -> Result<String, GeminiError>;
}

/// Image-to-image model: returns every part of the first candidate so callers
/// can pick out the inline payload themselves.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate_parts(&self, instruction: &str, image: InlineData) -> Result<Vec<Part>, GeminiError>;
}

// Helper function to truncate base64 data in JSON for cleaner logging
fn truncate_base64_in_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let serde_json::Value::String(s) = val {
                        if s.len() > 100 && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=') {
                            *val = serde_json::Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

fn loggable_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(mut value) => {
            truncate_base64_in_json(&mut value);
            value.to_string()
        }
        Err(_) if body.len() > 1000 => {
            let cut = (0..=1000).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
            format!("{}...", &body[..cut])
        }
        Err(_) => body.to_string(),
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
    demo: bool,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.model_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_base.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            demo: config.is_demo(),
        }
    }

    async fn generate_content(&self, model: &str, body: serde_json::Value) -> Result<GeminiResponse, GeminiError> {
        if self.demo {
            info!("Using demo mode - skipping call to {}", model);
            return Err(GeminiError::Demo);
        }

        let url = format!("{}/models/{}:generateContent?key={}", self.base_url, model, self.api_key);
        info!("🔗 Making request to: {}", url.replace(&self.api_key, "***"));

        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.to_string()))?;
        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(GeminiError::Status { status: status.as_u16(), body: response_text });
        }

        debug!("📥 Raw Gemini API response: {}", loggable_body(&response_text));

        serde_json::from_str(&response_text).map_err(|e| GeminiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate_text(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        info!("Generating text with {} ({} parts)", self.text_model, parts.len());
        let payload = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95
            }
        });

        let parsed = self.generate_content(&self.text_model, payload).await?;
        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(Part::as_text))
            .map(|text| text.trim().to_string())
            .ok_or(GeminiError::NoContent("text"))
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate_parts(&self, instruction: &str, image: InlineData) -> Result<Vec<Part>, GeminiError> {
        info!("Enhancing image with {} ({})", self.image_model, image.mime_type);
        let parts = vec![Part::text(instruction), Part::Inline { inline_data: image }];
        let payload = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "candidateCount": 1
            }
        });

        let parsed = self.generate_content(&self.image_model, payload).await?;
        let candidate = parsed.candidates.into_iter().next().ok_or(GeminiError::NoContent("candidate"))?;
        Ok(candidate.content.parts)
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text { text: String },
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Part::Inline { inline_data: InlineData::from_bytes(mime_type, bytes) }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        use base64::Engine as _;
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}
