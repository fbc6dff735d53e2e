//! Domain events
use crate::domain::aggregates::{OrderStatus, PaymentStatus};
use crate::domain::value_objects::Money;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: String },
    Updated { product_id: String },
    Deleted { product_id: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: String, owner_id: String, total_price: Money },
    /// `overridden` is set when an admin moved the order outside the regular lifecycle.
    StatusChanged { order_id: String, from: OrderStatus, to: OrderStatus, overridden: bool },
    PaymentStatusChanged { order_id: String, payment_status: PaymentStatus },
}

impl DomainEvent {
    pub fn subject(&self) -> String {
        match self {
            Self::Product(e) => format!("storefront.product.{}", e.kind()),
            Self::Order(e) => format!("storefront.order.{}", e.kind()),
        }
    }

    pub fn payload(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::Product(e) => serde_json::to_vec(e),
            Self::Order(e) => serde_json::to_vec(e),
        }
    }
}

impl ProductEvent {
    pub fn kind(&self) -> &'static str {
        match self { Self::Created { .. } => "created", Self::Updated { .. } => "updated", Self::Deleted { .. } => "deleted" }
    }
}

impl OrderEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Placed { .. } => "placed",
            Self::StatusChanged { .. } => "status_changed",
            Self::PaymentStatusChanged { .. } => "payment_status_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_and_payload() {
        let event = DomainEvent::Order(OrderEvent::StatusChanged {
            order_id: "o1".into(), from: OrderStatus::Pending, to: OrderStatus::Shipped, overridden: true,
        });
        assert_eq!(event.subject(), "storefront.order.status_changed");
        let json: serde_json::Value = serde_json::from_slice(&event.payload().unwrap()).unwrap();
        assert_eq!(json["kind"], "status_changed");
        assert_eq!(json["to"], "shipped");
        assert_eq!(json["overridden"], true);
    }
}
