use serde::{Serialize, Deserialize};
use serde_with::{serde_as, json::JsonString, DefaultOnError};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// Input to the content generator. Built per request and never mutated.
#[derive(Debug, Clone, Default)]
pub struct ProductContentRequest {
    pub title: String,
    pub story: String,
    pub description: String,
    pub artisan_location: String,
    pub keywords: Vec<String>,
    pub image_path: Option<PathBuf>,
    pub voice_note_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductContentResult {
    pub title: String,
    pub description: String,
    pub backstory: String,
}

impl ProductContentResult {
    /// Verbatim inputs, used whenever the text model cannot be relied on.
    pub fn fallback(req: &ProductContentRequest) -> Self {
        Self {
            title: req.title.clone(),
            description: first_non_empty(&req.description, &req.story).to_string(),
            backstory: req.story.clone(),
        }
    }
}

pub(crate) fn first_non_empty<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.is_empty() { b } else { a }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedImageResult {
    pub success: bool,
    /// Enhanced image on success, the original upload otherwise.
    pub path: PathBuf,
}

// --- Users ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age: u32,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(default, alias = "craftCategory")]
    pub primary_craft: Option<String>,
    pub experience: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Hex SHA-256 of the password.
    pub password: String,
    pub age: u32,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub primary_craft: Option<String>,
    pub experience: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl User {
    /// Where the artisan works: an explicit location wins, otherwise the
    /// non-empty parts of city, state and country.
    pub fn artisan_location(&self) -> String {
        if let Some(loc) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            return loc.to_string();
        }
        [&self.city, &self.state, &self.country]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            age: self.age,
            gender: self.gender.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            primary_craft: self.primary_craft.clone(),
            experience: self.experience.clone(),
        }
    }
}

/// A user document minus the password hash.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub age: u32,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub primary_craft: Option<String>,
    pub experience: String,
}

// --- Products ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    pub id: Uuid,
    pub artisan_id: Uuid,
    pub title: String,
    pub description: String,
    pub story: String,
    pub backstory: String,
    pub artisan_location: String,
    pub image: String,
    pub voice_note: String,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Content request for regeneration: stored text only, no attachments.
    pub fn content_request(&self) -> ProductContentRequest {
        ProductContentRequest {
            title: self.title.clone(),
            story: self.story.clone(),
            description: self.description.clone(),
            artisan_location: self.artisan_location.clone(),
            keywords: self.keywords.clone(),
            image_path: None,
            voice_note_path: None,
        }
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            image: self.image.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            backstory: self.backstory.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductSummary {
    pub id: Uuid,
    pub image: String,
    pub title: String,
    pub description: String,
    pub backstory: String,
}

/// Partial update; only these fields may ever be written by clients.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.backstory.is_none()
            && self.story.is_none()
            && self.image.is_none()
    }
}

/// Text fields of the add-product multipart form.
#[serde_as]
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AddProductFields {
    pub email: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Sent by the frontend as a JSON-encoded list; anything else means none.
    #[serde_as(as = "DefaultOnError<JsonString>")]
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub story: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailQuery {
    pub email: String,
}
