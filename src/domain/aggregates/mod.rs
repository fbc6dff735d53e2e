//! Aggregates module
pub mod product;
pub mod order;
pub mod user;

pub use product::{sort_products, Category, Color, Gender, NewProduct, Product, ProductFilter, ProductPatch, ProductSort};
pub use order::{compute_pricing, LineItem, Order, OrderError, OrderStatus, OwnerSnapshot, PaymentMethod, PaymentStatus, PriceBreakdown, ShippingAddress};
pub use user::{Principal, Role, User, UserSummary};
