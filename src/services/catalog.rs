use chrono::Utc;
use tracing::info;
use validator::Validate;
use super::EventPublisher;
use crate::domain::aggregates::{sort_products, NewProduct, Principal, Product, ProductFilter, ProductPatch, ProductSort};
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::storage::Collection;
use crate::Result;

/// Product catalog: public reads, admin-only writes.
#[derive(Clone)]
pub struct Catalog {
    products: Collection<Product>,
    events: EventPublisher,
}

impl Catalog {
    pub fn new(products: Collection<Product>, events: EventPublisher) -> Self { Self { products, events } }

    pub async fn list(&self, filter: &ProductFilter, sort: ProductSort) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.products.list().await?.into_iter().filter(|p| filter.matches(p)).collect();
        sort_products(&mut products, sort);
        Ok(products)
    }

    pub async fn get(&self, id: &str) -> Result<Product> { self.products.get(id).await }

    pub async fn create(&self, principal: &Principal, new: NewProduct) -> Result<Product> {
        principal.require_admin()?;
        new.validate()?;
        let product = self.products.insert(Product::create(new, Utc::now())).await?;
        info!(product_id = %product.id, admin_id = %principal.id, "product created");
        self.events.publish(vec![DomainEvent::Product(ProductEvent::Created { product_id: product.id.clone() })]).await;
        Ok(product)
    }

    pub async fn update(&self, principal: &Principal, id: &str, patch: ProductPatch) -> Result<Product> {
        principal.require_admin()?;
        patch.validate()?;
        let product = self.products.update(id, |p| { p.apply(patch); Ok(p.clone()) }).await?;
        info!(product_id = %product.id, admin_id = %principal.id, "product updated");
        self.events.publish(vec![DomainEvent::Product(ProductEvent::Updated { product_id: product.id.clone() })]).await;
        Ok(product)
    }

    /// Orders keep their line-item snapshots of a deleted product.
    pub async fn delete(&self, principal: &Principal, id: &str) -> Result<()> {
        principal.require_admin()?;
        let removed = self.products.delete(id).await?;
        info!(product_id = %removed.id, admin_id = %principal.id, "product deleted");
        self.events.publish(vec![DomainEvent::Product(ProductEvent::Deleted { product_id: removed.id })]).await;
        Ok(())
    }
}
