use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth,
    content::ContentGenerator,
    enhance::ImageEnhancer,
    error::ApiError,
    models::{
        AddProductFields, EmailQuery, LoginRequest, ProductContentRequest, ProductContentResult, ProductPatch,
        ProductSummary, PublicUser, SignUpRequest,
    },
    store::{NewProduct, Store},
    uploads::{public_url, Uploads},
};

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub content: ContentGenerator,
    pub enhancer: ImageEnhancer,
    pub uploads: Uploads,
    pub public_base_url: Option<String>,
}

impl AppState {
    fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.public_base_url {
            return base.clone();
        }
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{}", host)
    }
}

pub fn router(state: AppState) -> Router {
    let uploads_dir = state.uploads.dir().to_path_buf();
    Router::new()
        .route("/", get(health))
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/users/:email", get(get_user))
        .route("/api/v1/", get(list_products))
        .route("/api/v1/add", post(add_product))
        .route("/api/v1/:id", get(get_product))
        .route("/api/v1/:id/regenerate", post(regenerate_product))
        .route("/api/v1/:id/update", post(update_product))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "message": "Marketplace Assistant Backend is running 🚀" }))
}

pub async fn signup(State(state): State<AppState>, Json(body): Json<SignUpRequest>) -> Result<Json<Value>, ApiError> {
    let user = auth::sign_up(&state.store, body)?;
    info!("👤 Signed up {}", user.email);
    Ok(Json(json!({
        "status": "success",
        "message": "User created successfully",
        "user": { "id": user.id, "email": user.email, "full_name": user.full_name }
    })))
}

pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let user = auth::log_in(&state.store, &body)?;
    Ok(Json(json!({
        "status": "success",
        "message": "Login successful",
        "user": { "email": user.email, "full_name": user.full_name }
    })))
}

pub async fn get_user(Path(email): Path<String>, State(state): State<AppState>) -> Result<Json<PublicUser>, ApiError> {
    state
        .store
        .find_user_by_email(&email)
        .map(|u| Json(u.public_view()))
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

struct UploadedFile {
    file_name: String,
    data: Bytes,
}

pub async fn add_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut text_fields = serde_json::Map::new();
    let mut image: Option<UploadedFile> = None;
    let mut voice_note: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" | "voice_note" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if data.is_empty() {
                    continue;
                }
                let upload = Some(UploadedFile { file_name, data });
                if name == "image" { image = upload } else { voice_note = upload }
            }
            _ => {
                let value = field.text().await?;
                text_fields.insert(name, Value::String(value));
            }
        }
    }

    let form: AddProductFields = serde_json::from_value(Value::Object(text_fields))
        .map_err(|e| ApiError::BadRequest(format!("Invalid product form: {}", e)))?;

    let user = state
        .store
        .find_user_by_email(&form.email)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    let artisan_location = user.artisan_location();
    let base_url = state.base_url(&headers);

    let mut image_url = String::new();
    let mut image_path = None;
    if let Some(upload) = image {
        let original = state.uploads.save(&upload.file_name, &upload.data).await?;
        let enhanced = state.enhancer.enhance(&original).await;
        image_url = public_url(&base_url, &enhanced.path);
        info!(
            "[Products] Using {} image: {}",
            if enhanced.success { "enhanced" } else { "original" },
            image_url
        );
        image_path = Some(enhanced.path);
    }

    let mut voice_note_url = String::new();
    let mut voice_note_path = None;
    if let Some(upload) = voice_note {
        let saved = state.uploads.save(&upload.file_name, &upload.data).await?;
        voice_note_url = public_url("", &saved);
        voice_note_path = Some(saved);
    }

    let request = ProductContentRequest {
        title: form.title,
        story: form.story,
        description: form.description,
        artisan_location,
        keywords: form.keywords,
        image_path,
        voice_note_path,
    };
    let generated = state.content.generate(&request).await;

    let product = state.store.insert_product(NewProduct {
        artisan_id: user.id,
        title: generated.title,
        description: generated.description,
        story: request.story,
        backstory: generated.backstory,
        artisan_location: request.artisan_location,
        image: image_url,
        voice_note: voice_note_url,
        keywords: request.keywords,
    });
    info!("✅ Product {} added for {}", product.id, user.email);

    Ok(Json(json!({
        "message": "Product added successfully",
        "id": product.id,
        "product": product,
    })))
}

pub async fn get_product(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let product = state
        .store
        .get_product(id)
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(Json(json!(product)))
}

pub async fn regenerate_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ProductContentResult>, ApiError> {
    let product = state
        .store
        .get_product(id)
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    let generated = state.content.generate(&product.content_request()).await;
    state
        .store
        .apply_content(id, &generated)
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    info!("🔄 Regenerated content for product {}", id);
    Ok(Json(generated))
}

pub async fn update_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Value>, ApiError> {
    let updated = json!(patch);
    state.store.update_fields(id, patch)?;
    Ok(Json(json!({ "message": "Product updated successfully", "updated": updated })))
}

pub async fn list_products(
    Query(query): Query<EmailQuery>,
    State(state): State<AppState>,
) -> Json<Vec<ProductSummary>> {
    let Some(user) = state.store.find_user_by_email(&query.email) else {
        info!("[Products] No user found for email: {}", query.email);
        return Json(Vec::new());
    };
    let products: Vec<ProductSummary> = state
        .store
        .products_by_artisan(user.id)
        .iter()
        .map(|p| p.summary())
        .collect();
    info!("[Products] Found {} products for artisan_id: {} (email: {})", products.len(), user.id, query.email);
    Json(products)
}
