use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::gemini::{GeminiError, ImageModel, InlineData, Part, TextModel};

/// Replays queued responses in order; an empty queue is a failed call.
#[derive(Default)]
pub struct MockTextModel {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<Part>>>,
}

impl MockTextModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses.lock().push_back(Err(message.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_parts(&self) -> Option<Vec<Part>> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl TextModel for MockTextModel {
    async fn generate_text(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        self.calls.lock().push(parts);
        match self.responses.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(GeminiError::Http(message)),
            None => Err(GeminiError::NoContent("text")),
        }
    }
}

#[derive(Default)]
pub struct MockImageModel {
    responses: Mutex<VecDeque<Result<Vec<Part>, String>>>,
    calls: Mutex<Vec<(String, InlineData)>>,
}

impl MockImageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(self, parts: Vec<Part>) -> Self {
        self.responses.lock().push_back(Ok(parts));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses.lock().push_back(Err(message.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<(String, InlineData)> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl ImageModel for MockImageModel {
    async fn generate_parts(&self, instruction: &str, image: InlineData) -> Result<Vec<Part>, GeminiError> {
        self.calls.lock().push((instruction.to_string(), image));
        match self.responses.lock().pop_front() {
            Some(Ok(parts)) => Ok(parts),
            Some(Err(message)) => Err(GeminiError::Http(message)),
            None => Err(GeminiError::NoContent("candidate")),
        }
    }
}

/// A valid 2x2 PNG, encoded on the fly.
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 120, 40]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).expect("encode png");
    out.into_inner()
}
