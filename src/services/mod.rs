//! Application services: the operations the REST API exposes, with
//! authorization, persistence and event publishing around the aggregates.

pub mod admin;
pub mod catalog;
pub mod orders;
pub mod publisher;

pub use admin::{AdminService, DashboardStats, StatusCounts};
pub use catalog::Catalog;
pub use orders::{ItemRequest, OrderService, PlaceOrder};
pub use publisher::EventPublisher;
