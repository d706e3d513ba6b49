use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Product, ProductContentResult, ProductPatch, User};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Product not found")] NotFound,
    #[error("No valid fields to update")] NoFields,
    #[error("User already exists")] DuplicateEmail,
}

/// User fields supplied at signup; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub age: u32,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub primary_craft: Option<String>,
    pub experience: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub artisan_id: Uuid,
    pub title: String,
    pub description: String,
    pub story: String,
    pub backstory: String,
    pub artisan_location: String,
    pub image: String,
    pub voice_note: String,
    pub keywords: Vec<String>,
}

/// In-process document store with a `users` and a `products` collection.
/// Products are kept in insertion order.
#[derive(Default)]
pub struct Store {
    users: RwLock<HashMap<Uuid, User>>,
    products: RwLock<Vec<Product>>,
}

impl Store {
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users.read().values().find(|u| u.email == email).cloned()
    }

    /// Email uniqueness is checked under the same write guard as the insert.
    pub fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            full_name: new.full_name,
            email: new.email,
            password: new.password_hash,
            age: new.age,
            gender: new.gender,
            city: new.city,
            state: new.state,
            country: new.country,
            primary_craft: new.primary_craft,
            experience: new.experience,
            location: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn insert_product(&self, new: NewProduct) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            artisan_id: new.artisan_id,
            title: new.title,
            description: new.description,
            story: new.story,
            backstory: new.backstory,
            artisan_location: new.artisan_location,
            image: new.image,
            voice_note: new.voice_note,
            keywords: new.keywords,
            created_at: Utc::now(),
        };
        self.products.write().push(product.clone());
        product
    }

    pub fn get_product(&self, id: Uuid) -> Option<Product> {
        self.products.read().iter().find(|p| p.id == id).cloned()
    }

    pub fn products_by_artisan(&self, artisan_id: Uuid) -> Vec<Product> {
        self.products
            .read()
            .iter()
            .filter(|p| p.artisan_id == artisan_id)
            .cloned()
            .collect()
    }

    pub fn apply_content(&self, id: Uuid, content: &ProductContentResult) -> Option<Product> {
        let mut guard = self.products.write();
        let product = guard.iter_mut().find(|p| p.id == id)?;
        product.title = content.title.clone();
        product.description = content.description.clone();
        product.backstory = content.backstory.clone();
        Some(product.clone())
    }

    pub fn update_fields(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut guard = self.products.write();
        let product = guard.iter_mut().find(|p| p.id == id).ok_or(StoreError::NotFound)?;
        if patch.is_empty() {
            return Err(StoreError::NoFields);
        }
        let ProductPatch { title, description, backstory, story, image } = patch;
        if let Some(v) = title { product.title = v; }
        if let Some(v) = description { product.description = v; }
        if let Some(v) = backstory { product.backstory = v; }
        if let Some(v) = story { product.story = v; }
        if let Some(v) = image { product.image = v; }
        Ok(product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Asha".into(),
            email: email.into(),
            password_hash: "h".into(),
            age: 30,
            gender: "f".into(),
            city: "Jaipur".into(),
            state: "Rajasthan".into(),
            country: "India".into(),
            primary_craft: None,
            experience: "5".into(),
        }
    }

    fn new_product(artisan_id: Uuid, title: &str) -> NewProduct {
        NewProduct {
            artisan_id,
            title: title.into(),
            description: "d".into(),
            story: "s".into(),
            backstory: "b".into(),
            artisan_location: "Jaipur".into(),
            image: String::new(),
            voice_note: String::new(),
            keywords: vec![],
        }
    }

    #[test]
    fn users_are_found_by_exact_email() {
        let store = Store::default();
        let user = store.create_user(new_user("asha@example.com")).unwrap();
        assert_eq!(store.find_user_by_email("asha@example.com").unwrap().id, user.id);
        assert!(store.find_user_by_email("ASHA@example.com").is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = Store::default();
        store.create_user(new_user("asha@example.com")).unwrap();
        assert_eq!(store.create_user(new_user("asha@example.com")).unwrap_err(), StoreError::DuplicateEmail);
    }

    #[test]
    fn concurrent_signups_for_one_email_create_one_user() {
        use std::sync::Barrier;

        const THREADS: usize = 8;
        for round in 0..50 {
            let store = Store::default();
            let barrier = Barrier::new(THREADS);
            let created = std::thread::scope(|s| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|_| {
                        s.spawn(|| {
                            barrier.wait();
                            store.create_user(new_user("race@example.com")).is_ok()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count()
            });
            assert_eq!(created, 1, "round {round}");
            assert_eq!(store.users.read().len(), 1);
        }
    }

    #[test]
    fn products_are_listed_per_artisan_in_creation_order() {
        let store = Store::default();
        let a = Uuid::new_v4();
        let first = store.insert_product(new_product(a, "one"));
        store.insert_product(new_product(Uuid::new_v4(), "other"));
        let second = store.insert_product(new_product(a, "two"));

        let ids: Vec<Uuid> = store.products_by_artisan(a).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn apply_content_overwrites_generated_fields_only() {
        let store = Store::default();
        let p = store.insert_product(new_product(Uuid::new_v4(), "old"));
        let content = ProductContentResult { title: "T".into(), description: "D".into(), backstory: "B".into() };

        let updated = store.apply_content(p.id, &content).unwrap();

        assert_eq!((updated.title.as_str(), updated.description.as_str(), updated.backstory.as_str()), ("T", "D", "B"));
        assert_eq!(updated.story, "s");
        assert!(store.apply_content(Uuid::new_v4(), &content).is_none());
    }

    #[test]
    fn update_fields_respects_allow_list() {
        let store = Store::default();
        let p = store.insert_product(new_product(Uuid::new_v4(), "old"));

        let patch = ProductPatch { story: Some("new story".into()), image: Some("u".into()), ..Default::default() };
        let updated = store.update_fields(p.id, patch).unwrap();
        assert_eq!(updated.story, "new story");
        assert_eq!(updated.image, "u");
        assert_eq!(updated.title, "old");
        assert_eq!(store.get_product(p.id).unwrap().story, "new story");

        assert_eq!(store.update_fields(p.id, ProductPatch::default()).unwrap_err(), StoreError::NoFields);
        assert_eq!(
            store.update_fields(Uuid::new_v4(), ProductPatch { title: Some("x".into()), ..Default::default() }).unwrap_err(),
            StoreError::NotFound
        );
    }
}
