use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;
use super::EventPublisher;
use crate::domain::aggregates::{
    LineItem, Order, OrderError, OrderStatus, PaymentMethod, PaymentStatus, Principal, Product, ShippingAddress,
};
use crate::storage::Collection;
use crate::{Result, StorefrontError};

/// Checkout payload. Only product ids, quantities and options are taken
/// from the client; names and prices come from the catalog.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[validate]
    pub items: Vec<ItemRequest>,
    #[validate]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemRequest {
    pub product: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Newest first by creation time.
pub(crate) fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

#[derive(Clone)]
pub struct OrderService {
    orders: Collection<Order>,
    products: Collection<Product>,
    events: EventPublisher,
}

impl OrderService {
    pub fn new(orders: Collection<Order>, products: Collection<Product>, events: EventPublisher) -> Self {
        Self { orders, products, events }
    }

    /// Prices the cart against the catalog and appends the order.
    ///
    /// Every submission creates a new order; there is no deduplication.
    pub async fn place_order(&self, principal: &Principal, request: PlaceOrder) -> Result<Order> {
        if request.items.is_empty() { return Err(OrderError::NoItems.into()); }
        request.validate()?;

        let catalog = self.products.list().await?;
        let items = request.items.into_iter()
            .map(|item| {
                let product = catalog.iter().find(|p| p.id == item.product).ok_or(StorefrontError::NotFound("Product"))?;
                Ok(LineItem::snapshot(product, item.quantity, item.size, item.color))
            })
            .collect::<Result<Vec<_>>>()?;

        let order = Order::place(principal, items, request.shipping_address, request.payment_method, Utc::now())?;
        let mut order = self.orders.insert(order).await?;
        info!(order_id = %order.id(), owner_id = %principal.id, total = %order.pricing().total_price, "order placed");
        self.events.publish(order.take_events()).await;
        Ok(order)
    }

    /// The principal's own orders, newest first.
    pub async fn list_for(&self, principal: &Principal) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.list().await?.into_iter().filter(|o| o.is_owned_by(principal)).collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    pub async fn list_all(&self, principal: &Principal) -> Result<Vec<Order>> {
        principal.require_admin()?;
        let mut orders = self.orders.list().await?;
        newest_first(&mut orders);
        Ok(orders)
    }

    /// Visible to its owner and to admins.
    pub async fn get(&self, principal: &Principal, id: &str) -> Result<Order> {
        let order = self.orders.get(id).await?;
        if !order.is_owned_by(principal) && !principal.is_admin() {
            return Err(StorefrontError::Forbidden("Not authorized"));
        }
        Ok(order)
    }

    pub async fn request_cancellation(&self, principal: &Principal, id: &str) -> Result<Order> {
        let now = Utc::now();
        let mut order = self.orders.update(id, |o| {
            o.request_cancellation(principal, now)?;
            Ok(o.clone())
        }).await?;
        info!(order_id = %order.id(), owner_id = %principal.id, "cancellation requested");
        self.events.publish(order.take_events()).await;
        Ok(order)
    }

    /// Administrative override of the order status.
    pub async fn set_status(&self, principal: &Principal, id: &str, status: OrderStatus) -> Result<Order> {
        principal.require_admin()?;
        let now = Utc::now();
        let (mut order, from, overridden) = self.orders.update(id, |o| {
            let from = o.status();
            let overridden = o.override_status(status, now);
            Ok((o.clone(), from, overridden))
        }).await?;
        if overridden {
            warn!(order_id = %order.id(), admin_id = %principal.id, %from, to = %status, "status set outside the regular lifecycle");
        } else {
            info!(order_id = %order.id(), admin_id = %principal.id, %from, to = %status, "order status updated");
        }
        self.events.publish(order.take_events()).await;
        Ok(order)
    }

    pub async fn set_payment_status(&self, principal: &Principal, id: &str, status: PaymentStatus) -> Result<Order> {
        principal.require_admin()?;
        let mut order = self.orders.update(id, |o| {
            o.set_payment_status(status);
            Ok(o.clone())
        }).await?;
        info!(order_id = %order.id(), admin_id = %principal.id, payment_status = ?status, "payment status updated");
        self.events.publish(order.take_events()).await;
        Ok(order)
    }
}
