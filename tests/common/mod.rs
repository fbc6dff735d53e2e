#![allow(dead_code)]

use axum::{body::Body, http::{Request, StatusCode}, Router};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use storefront::api::{self, auth, AppState};
use storefront::domain::aggregates::{Category, Gender, NewProduct, Product, Role, User};
use storefront::domain::value_objects::Money;
use storefront::services::EventPublisher;
use storefront::storage::{DocumentStore, MemoryStore, Storage};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"test-jwt-secret";

pub struct TestApp {
    pub router: Router,
    pub storage: Storage,
    pub store: Arc<dyn DocumentStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::default());
        let storage = Storage::new(store.clone());
        let router = api::router(AppState::new(store.clone(), EventPublisher::disabled(), SECRET));
        Self { router, storage, store }
    }

    /// Stores a user and returns a bearer token for it.
    pub async fn user(&self, id: &str, role: Role) -> String {
        self.storage.users.insert(User {
            id: id.into(), name: id.to_uppercase(), email: format!("{id}@example.com"), role,
            created_at: Some(Utc::now()), credentials: Map::new(),
        }).await.unwrap();
        token_for(id)
    }

    pub async fn product(&self, name: &str, price: u32, category: Category, gender: Gender) -> Product {
        self.storage.products.insert(Product::create(NewProduct {
            name: name.into(), description: "Everyday essential".into(), price: Money::minor(price), original_price: None,
            category, gender, images: vec![format!("/img/{}.jpg", name.to_lowercase().replace(' ', "-"))],
            sizes: vec!["S".into(), "M".into(), "L".into()], colors: vec![], stock: 20, featured: false,
        }, Utc::now())).await.unwrap()
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder.header("Content-Type", "application/json").body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, json)
    }
}

pub fn token_for(id: &str) -> String {
    auth::create_token(SECRET, id, chrono::Duration::days(30)).unwrap()
}

pub fn checkout_body(product_id: &str, quantity: u32) -> Value {
    serde_json::json!({
        "items": [{ "product": product_id, "name": "ignored", "price": 1, "quantity": quantity, "size": "M", "color": "Black" }],
        "shippingAddress": { "phone": "9876543210", "street": "221B MG Road", "city": "Bengaluru", "state": "KA", "zipCode": "560001", "country": "India" },
        "paymentMethod": "COD"
    })
}
