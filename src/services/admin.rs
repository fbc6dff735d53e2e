use serde::Serialize;
use tracing::info;
use super::orders::newest_first;
use crate::domain::aggregates::{Order, OrderStatus, Principal, Product, Role, User, UserSummary};
use crate::domain::value_objects::Money;
use crate::storage::Collection;
use crate::Result;

const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: Money,
    pub recent_orders: Vec<Order>,
    pub orders_by_status: StatusCounts,
}

/// Tally of the regular lifecycle statuses. Cancellation states are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts { pub pending: usize, pub processing: usize, pub shipped: usize, pub delivered: usize }

/// Reduces the three collections into dashboard numbers.
///
/// Revenue leaves out cancelled orders and orders awaiting cancellation.
pub fn summarize(users: &[User], total_products: usize, mut orders: Vec<Order>) -> DashboardStats {
    let total_revenue = orders.iter().filter(|o| o.status().is_revenue()).map(|o| o.pricing().total_price).sum();
    let mut counts = StatusCounts::default();
    for order in &orders {
        match order.status() {
            OrderStatus::Pending => counts.pending += 1,
            OrderStatus::Processing => counts.processing += 1,
            OrderStatus::Shipped => counts.shipped += 1,
            OrderStatus::Delivered => counts.delivered += 1,
            OrderStatus::CancelRequested | OrderStatus::Cancelled => {}
        }
    }
    let total_orders = orders.len();
    newest_first(&mut orders);
    orders.truncate(RECENT_ORDERS);
    DashboardStats {
        total_users: users.iter().filter(|u| u.role == Role::User).count(),
        total_products,
        total_orders,
        total_revenue,
        recent_orders: orders,
        orders_by_status: counts,
    }
}

/// Admin console: dashboard and user management.
#[derive(Clone)]
pub struct AdminService {
    orders: Collection<Order>,
    products: Collection<Product>,
    users: Collection<User>,
}

impl AdminService {
    pub fn new(orders: Collection<Order>, products: Collection<Product>, users: Collection<User>) -> Self {
        Self { orders, products, users }
    }

    pub async fn stats(&self, principal: &Principal) -> Result<DashboardStats> {
        principal.require_admin()?;
        let users = self.users.list().await?;
        let total_products = self.products.list().await?.len();
        let orders = self.orders.list().await?;
        Ok(summarize(&users, total_products, orders))
    }

    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<UserSummary>> {
        principal.require_admin()?;
        Ok(self.users.list().await?.iter().map(UserSummary::from).collect())
    }

    pub async fn set_role(&self, principal: &Principal, id: &str, role: Role) -> Result<UserSummary> {
        principal.require_admin()?;
        let user = self.users.update(id, |u| { u.role = role; Ok(UserSummary::from(&*u)) }).await?;
        info!(user_id = %user.id, admin_id = %principal.id, role = ?role, "user role updated");
        Ok(user)
    }

    /// Orders placed by the user keep their owner snapshot.
    pub async fn delete_user(&self, principal: &Principal, id: &str) -> Result<()> {
        principal.require_admin()?;
        let removed = self.users.delete(id).await?;
        info!(user_id = %removed.id, admin_id = %principal.id, "user removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::Map;
    use crate::domain::aggregates::{LineItem, PaymentMethod, ShippingAddress};
    use crate::storage::Storage;
    use crate::StorefrontError;

    fn user(id: &str, role: Role) -> User {
        User { id: id.into(), name: id.into(), email: format!("{id}@example.com"), role, created_at: None, credentials: Map::new() }
    }

    fn order(owner: &str, price: u32, status: OrderStatus, age_minutes: i64) -> Order {
        let principal = Principal::from(&user(owner, Role::User));
        let items = vec![LineItem { product_id: "p".into(), name: "Tee".into(), image: None, unit_price: Money::minor(price), quantity: 1, size: None, color: None }];
        let created = Utc::now() - Duration::minutes(age_minutes);
        let mut o = Order::place(&principal, items, ShippingAddress::default(), PaymentMethod::default(), created).unwrap();
        o.override_status(status, created);
        o
    }

    #[test]
    fn test_revenue_excludes_cancellations() {
        let orders = vec![
            order("a", 1200, OrderStatus::Delivered, 1),    // 1416
            order("a", 500, OrderStatus::Pending, 2),       // 500 + 100 + 90 = 690
            order("b", 2000, OrderStatus::Cancelled, 3),
            order("b", 2000, OrderStatus::CancelRequested, 4),
        ];
        let stats = summarize(&[], 0, orders);
        assert_eq!(stats.total_revenue, Money::minor(1416 + 690));
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.orders_by_status, StatusCounts { pending: 1, processing: 0, shipped: 0, delivered: 1 });
    }

    #[test]
    fn test_recent_orders_are_five_newest() {
        let orders: Vec<Order> = (0..8).map(|age| order("a", 100, OrderStatus::Pending, age)).collect();
        let expected: Vec<String> = orders[..5].iter().map(|o| o.id().to_string()).collect();
        let stats = summarize(&[], 0, orders.into_iter().rev().collect());
        let got: Vec<String> = stats.recent_orders.iter().map(|o| o.id().to_string()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_user_count_skips_admins() {
        let stats = summarize(&[user("a", Role::User), user("b", Role::Admin), user("c", Role::User)], 7, vec![]);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_products, 7);
        assert_eq!(stats.total_revenue, Money::ZERO);
    }

    #[tokio::test]
    async fn test_user_management() {
        let storage = Storage::in_memory();
        let service = AdminService::new(storage.orders.clone(), storage.products.clone(), storage.users.clone());
        let mut shopper = user("u1", Role::User);
        shopper.credentials.insert("password".into(), "$2a$10$hash".into());
        storage.users.insert(shopper).await.unwrap();
        let admin = Principal::from(&user("root", Role::Admin));
        let plain = Principal::from(&user("u2", Role::User));

        assert!(matches!(service.list_users(&plain).await, Err(StorefrontError::Forbidden(_))));
        let promoted = service.set_role(&admin, "u1", Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);
        let stored = storage.users.get("u1").await.unwrap();
        assert_eq!(stored.credentials["password"], "$2a$10$hash");

        assert!(matches!(service.set_role(&admin, "ghost", Role::User).await, Err(StorefrontError::NotFound("User"))));
        service.delete_user(&admin, "u1").await.unwrap();
        assert!(service.list_users(&admin).await.unwrap().is_empty());
    }
}
