use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use super::{auth::AuthUser, exposed_all, extract::ValidJson, AppState, Exposed};
use crate::domain::aggregates::{Category, Gender, NewProduct, Product, ProductFilter, ProductPatch, ProductSort};
use crate::domain::value_objects::Money;
use crate::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ListParams {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category,
            gender: self.gender,
            min_price: self.min_price,
            max_price: self.max_price,
            search: self.search.clone().filter(|s| !s.is_empty()),
            featured_only: self.featured.unwrap_or(false),
        }
    }
}

pub async fn list(State(s): State<AppState>, Query(p): Query<ListParams>) -> Result<Json<Vec<Exposed<Product>>>> {
    Ok(Json(exposed_all(s.catalog.list(&p.filter(), p.sort).await?)))
}

pub async fn get(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Exposed<Product>>> {
    Ok(Json(s.catalog.get(&id).await?.into()))
}

pub async fn create(State(s): State<AppState>, AuthUser(user): AuthUser, ValidJson(r): ValidJson<NewProduct>) -> Result<(StatusCode, Json<Exposed<Product>>)> {
    Ok((StatusCode::CREATED, Json(s.catalog.create(&user, r).await?.into())))
}

pub async fn update(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>, ValidJson(r): ValidJson<ProductPatch>) -> Result<Json<Exposed<Product>>> {
    Ok(Json(s.catalog.update(&user, &id, r).await?.into()))
}

pub async fn delete(State(s): State<AppState>, AuthUser(user): AuthUser, Path(id): Path<String>) -> Result<Json<Value>> {
    s.catalog.delete(&user, &id).await?;
    Ok(Json(json!({ "message": "Product removed" })))
}
