//! REST surface under `/api`.

pub mod admin;
pub mod auth;
pub mod error;
pub mod extract;
pub mod orders;
pub mod products;

use axum::{routing::{delete, get, put}, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::domain::aggregates::{Order, Product, User, UserSummary};
use crate::services::{AdminService, Catalog, EventPublisher, OrderService};
use crate::storage::{Collection, DocumentStore, Storage};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub orders: OrderService,
    pub admin: AdminService,
    pub users: Collection<User>,
    pub jwt_secret: Arc<[u8]>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, events: EventPublisher, jwt_secret: &[u8]) -> Self {
        let storage = Storage::new(store);
        Self {
            catalog: Catalog::new(storage.products.clone(), events.clone()),
            orders: OrderService::new(storage.orders.clone(), storage.products.clone(), events),
            admin: AdminService::new(storage.orders, storage.products, storage.users.clone()),
            users: storage.users,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

/// Response body that repeats the record id as `_id`, which existing clients
/// key on. Stored documents never carry it.
#[derive(Debug, Serialize)]
pub struct Exposed<T> {
    #[serde(rename = "_id")]
    legacy_id: String,
    #[serde(flatten)]
    record: T,
}

impl From<Product> for Exposed<Product> {
    fn from(record: Product) -> Self { Self { legacy_id: record.id.clone(), record } }
}

impl From<Order> for Exposed<Order> {
    fn from(record: Order) -> Self { Self { legacy_id: record.id().to_string(), record } }
}

impl From<UserSummary> for Exposed<UserSummary> {
    fn from(record: UserSummary) -> Self { Self { legacy_id: record.id.clone(), record } }
}

fn exposed_all<T>(records: Vec<T>) -> Vec<Exposed<T>>
where
    Exposed<T>: From<T>,
{
    records.into_iter().map(Exposed::from).collect()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "service": "storefront" }))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", get(products::get).put(products::update).delete(products::delete))
        .route("/orders", get(orders::list_mine).post(orders::create))
        .route("/orders/admin/all", get(orders::list_all))
        .route("/orders/:id", get(orders::get))
        .route("/orders/:id/status", put(orders::set_status))
        .route("/orders/:id/cancel", put(orders::request_cancellation))
        .route("/orders/:id/payment", put(orders::set_payment_status))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", delete(admin::delete_user))
        .route("/admin/users/:id/role", put(admin::set_role));

    Router::new().nest("/api", api).layer(TraceLayer::new_for_http()).with_state(state)
}
