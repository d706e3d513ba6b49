use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::models::{LoginRequest, SignUpRequest, User};
use crate::store::{NewUser, Store};

// Unsalted SHA-256, hex encoded.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn sign_up(store: &Store, req: SignUpRequest) -> Result<User, ApiError> {
    if req.password != req.confirm_password {
        return Err(ApiError::BadRequest("Passwords do not match".into()));
    }
    let user = store.create_user(NewUser {
        password_hash: hash_password(&req.password),
        full_name: req.full_name,
        email: req.email,
        age: req.age,
        gender: req.gender,
        city: req.city,
        state: req.state,
        country: req.country,
        primary_craft: req.primary_craft,
        experience: req.experience,
    })?;
    Ok(user)
}

pub fn log_in(store: &Store, req: &LoginRequest) -> Result<User, ApiError> {
    let user = store
        .find_user_by_email(&req.email)
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    if user.password != hash_password(&req.password) {
        return Err(ApiError::Unauthorized("Invalid password".into()));
    }
    Ok(user)
}
