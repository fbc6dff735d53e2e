//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::domain::value_objects::{not_blank, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hoodies,
    #[serde(rename = "t-shirts")]
    TShirts,
    Shorts,
    Pants,
    Jackets,
    Accessories,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender { Men, Women, Unisex }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color { pub name: String, pub hex: String }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    pub category: Category,
    pub gender: Gender,
    #[serde(default)] pub images: Vec<String>,
    #[serde(default)] pub sizes: Vec<String>,
    #[serde(default)] pub colors: Vec<Color>,
    #[serde(default)] pub stock: u32,
    #[serde(default)] pub featured: bool,
    #[serde(default)] pub rating: f64,
    #[serde(default)] pub num_reviews: u32,
    /// Absent on records written before creation stamps existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Admin payload for a new catalog entry.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub description: String,
    pub price: Money,
    #[serde(default)] pub original_price: Option<Money>,
    pub category: Category,
    pub gender: Gender,
    #[serde(default)] pub images: Vec<String>,
    #[serde(default)] pub sizes: Vec<String>,
    #[serde(default)] pub colors: Vec<Color>,
    #[serde(default)] pub stock: u32,
    #[serde(default)] pub featured: bool,
}

/// Shallow merge: every supplied field replaces the stored one.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[validate(custom = "not_blank")]
    pub description: Option<String>,
    pub price: Option<Money>,
    /// `Some(None)` when the payload sends `null`, which removes the strike-through price.
    #[serde(default, deserialize_with = "present")]
    pub original_price: Option<Option<Money>>,
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<Color>>,
    pub stock: Option<u32>,
    pub featured: Option<bool>,
}

/// Marks a field as supplied even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Product {
    pub fn create(p: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(), name: p.name, description: p.description, price: p.price,
            original_price: p.original_price, category: p.category, gender: p.gender, images: p.images,
            sizes: p.sizes, colors: p.colors, stock: p.stock, featured: p.featured,
            rating: 0.0, num_reviews: 0, created_at: Some(now),
        }
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(v) = patch.name { self.name = v; }
        if let Some(v) = patch.description { self.description = v; }
        if let Some(v) = patch.price { self.price = v; }
        if let Some(v) = patch.original_price { self.original_price = v; }
        if let Some(v) = patch.category { self.category = v; }
        if let Some(v) = patch.gender { self.gender = v; }
        if let Some(v) = patch.images { self.images = v; }
        if let Some(v) = patch.sizes { self.sizes = v; }
        if let Some(v) = patch.colors { self.colors = v; }
        if let Some(v) = patch.stock { self.stock = v; }
        if let Some(v) = patch.featured { self.featured = v; }
    }
}

/// Catalog filter. Every supplied predicate must hold.
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub search: Option<String>,
    pub featured_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, p: &Product) -> bool {
        self.category.map_or(true, |c| p.category == c)
            && self.gender.map_or(true, |g| p.gender == g)
            && self.min_price.map_or(true, |min| p.price >= min)
            && self.max_price.map_or(true, |max| p.price <= max)
            && (!self.featured_only || p.featured)
            && self.search.as_deref().map_or(true, |needle| {
                p.name.to_lowercase().contains(&needle.to_lowercase())
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort { #[default] Newest, PriceAsc, PriceDesc, Rating }

/// Stable sort; undated products come after dated ones under `Newest`.
pub fn sort_products(products: &mut [Product], sort: ProductSort) {
    match sort {
        ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ProductSort::PriceAsc => products.sort_by_key(|p| p.price),
        ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        ProductSort::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
}
