//! Order Aggregate
//!
//! Pricing, the status lifecycle and the administrative override live here.
//! Persistence and authorization of callers are the order service's concern.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;
use crate::domain::aggregates::{Principal, Product};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::{not_blank, Money, MoneyError};

/// Orders whose items total strictly exceeds this ship free.
pub const FREE_SHIPPING_ABOVE: Money = Money::minor(1000);
pub const FLAT_SHIPPING: Money = Money::minor(100);
/// 18%.
pub fn tax_rate() -> Decimal { Decimal::new(18, 2) }

/// One product selection, frozen at checkout.
///
/// Name, unit price and image are copied from the catalog when the order is
/// placed (snapshot pricing). Later catalog edits or deletions never change an
/// existing order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "product")]
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "price")]
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LineItem {
    pub fn snapshot(product: &Product, quantity: u32, size: Option<String>, color: Option<String>) -> Self {
        Self {
            product_id: product.id.clone(), name: product.name.clone(), image: product.images.first().cloned(),
            unit_price: product.price, quantity, size, color,
        }
    }

    pub fn line_total(&self) -> Result<Money, MoneyError> { self.unit_price.multiply(self.quantity) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[validate(custom = "not_blank")]
    pub street: String,
    #[validate(custom = "not_blank")]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[validate(custom = "not_blank")]
    pub zip_code: String,
    #[validate(custom = "not_blank")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Who placed the order, as they were at checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot { pub id: String, pub name: String, pub email: String }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus { #[default] Pending, Paid, Failed }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus { #[default] Pending, Processing, Shipped, Delivered, CancelRequested, Cancelled }

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending", Self::Processing => "processing", Self::Shipped => "shipped",
            Self::Delivered => "delivered", Self::CancelRequested => "cancel_requested", Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool { matches!(self, Self::Delivered | Self::Cancelled) }

    /// Whether the owner may still ask for a cancellation.
    pub fn is_cancellable(self) -> bool { matches!(self, Self::Pending | Self::Processing) }

    /// Regular lifecycle: pending → processing → shipped → delivered,
    /// pending|processing → cancel_requested → cancelled, and any
    /// non-terminal state → cancelled.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Processing) | (Processing, Shipped) | (Shipped, Delivered) => true,
            (from, CancelRequested) => from.is_cancellable(),
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Statuses whose totals count as revenue.
    pub fn is_revenue(self) -> bool { !matches!(self, Self::CancelRequested | Self::Cancelled) }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Derived totals. `total_price == items_price + shipping_price + tax_price`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
}

pub fn compute_pricing(items: &[LineItem]) -> Result<PriceBreakdown, OrderError> {
    if items.is_empty() { return Err(OrderError::NoItems); }
    let items_price = items.iter().try_fold(Money::ZERO, |acc, i| i.line_total().and_then(|t| acc.add(t)))?;
    let shipping_price = if items_price > FREE_SHIPPING_ABOVE { Money::ZERO } else { FLAT_SHIPPING };
    let tax_price = items_price.apply_rate(tax_rate())?;
    let total_price = items_price.add(shipping_price)?.add(tax_price)?;
    Ok(PriceBreakdown { items_price, shipping_price, tax_price, total_price })
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: String,
    #[serde(rename = "user")]
    owner: OwnerSnapshot,
    items: Vec<LineItem>,
    shipping_address: ShippingAddress,
    #[serde(default)]
    payment_method: PaymentMethod,
    #[serde(flatten)]
    pricing: PriceBreakdown,
    status: OrderStatus,
    #[serde(default)]
    payment_status: PaymentStatus,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivered_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl Order {
    pub fn place(
        owner: &Principal,
        items: Vec<LineItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if let Some(item) = items.iter().find(|i| i.quantity == 0) {
            return Err(OrderError::InvalidQuantity { product_id: item.product_id.clone() });
        }
        let pricing = compute_pricing(&items)?;
        let mut order = Self {
            id: Uuid::now_v7().to_string(),
            owner: OwnerSnapshot { id: owner.id.clone(), name: owner.name.clone(), email: owner.email.clone() },
            items, shipping_address, payment_method, pricing,
            status: OrderStatus::Pending, payment_status: PaymentStatus::Pending,
            created_at: now, delivered_at: None, events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Placed {
            order_id: order.id.clone(), owner_id: order.owner.id.clone(), total_price: pricing.total_price,
        }));
        Ok(order)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn owner(&self) -> &OwnerSnapshot { &self.owner }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn shipping_address(&self) -> &ShippingAddress { &self.shipping_address }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn pricing(&self) -> &PriceBreakdown { &self.pricing }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn payment_status(&self) -> PaymentStatus { self.payment_status }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn delivered_at(&self) -> Option<DateTime<Utc>> { self.delivered_at }
    pub fn is_owned_by(&self, principal: &Principal) -> bool { self.owner.id == principal.id }

    /// Owner asks for cancellation; an admin confirms it later.
    pub fn request_cancellation(&mut self, by: &Principal, now: DateTime<Utc>) -> Result<(), OrderError> {
        if !self.is_owned_by(by) { return Err(OrderError::NotOwner); }
        self.advance(OrderStatus::CancelRequested, now)
    }

    /// Move one step along the regular lifecycle.
    pub fn advance(&mut self, next: OrderStatus, now: DateTime<Utc>) -> Result<(), OrderError> {
        if !self.status.can_advance_to(next) {
            return Err(OrderError::InvalidTransition { from: self.status, to: next });
        }
        self.set_status(next, now, false);
        Ok(())
    }

    /// Administrative override: any status may be set from any status.
    ///
    /// Returns `true` when the change was not a regular lifecycle step.
    pub fn override_status(&mut self, next: OrderStatus, now: DateTime<Utc>) -> bool {
        let overridden = !self.status.can_advance_to(next);
        self.set_status(next, now, overridden);
        overridden
    }

    pub fn set_payment_status(&mut self, payment_status: PaymentStatus) {
        self.payment_status = payment_status;
        self.raise_event(DomainEvent::Order(OrderEvent::PaymentStatusChanged { order_id: self.id.clone(), payment_status }));
    }

    fn set_status(&mut self, next: OrderStatus, now: DateTime<Utc>, overridden: bool) {
        let from = self.status;
        self.status = next;
        self.delivered_at = (next == OrderStatus::Delivered).then_some(now);
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id: self.id.clone(), from, to: next, overridden }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    NoItems,
    InvalidQuantity { product_id: String },
    PriceOutOfRange,
    NotOwner,
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl From<MoneyError> for OrderError {
    fn from(_: MoneyError) -> Self { Self::PriceOutOfRange }
}

impl std::error::Error for OrderError {}
impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoItems => write!(f, "No order items"),
            Self::InvalidQuantity { product_id } => write!(f, "Invalid quantity for product {product_id}"),
            Self::PriceOutOfRange => write!(f, "Order total out of range"),
            Self::NotOwner => write!(f, "Not authorized"),
            Self::InvalidTransition { from, to } => write!(f, "Cannot move order from {from} to {to}"),
        }
    }
}
