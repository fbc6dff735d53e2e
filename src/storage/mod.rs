//! Flat-file persistence.
//!
//! Each collection is one JSON document. `DocumentStore` moves whole documents
//! in and out of the backing medium; `Collection` layers typed record access
//! on top and serializes mutations of a collection behind one lock.

mod collection;
mod file;
mod memory;

pub use collection::{Collection, Record};
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::sync::Arc;
use crate::domain::aggregates::{Order, Product, User};
use crate::Result;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Contents of the named document, `None` if it was never written.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the named document. Readers see either the old or the new
    /// contents, never a mix.
    async fn write(&self, name: &str, contents: Vec<u8>) -> Result<()>;
}

/// The storefront's collections over one backing store.
#[derive(Clone)]
pub struct Storage {
    pub orders: Collection<Order>,
    pub products: Collection<Product>,
    pub users: Collection<User>,
}

impl Storage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: Collection::new(store.clone()),
            products: Collection::new(store.clone()),
            users: Collection::new(store),
        }
    }

    pub fn in_memory() -> Self { Self::new(Arc::new(MemoryStore::default())) }
}

impl Record for Order {
    const COLLECTION: &'static str = "orders";
    const KIND: &'static str = "Order";
    fn id(&self) -> &str { Order::id(self) }
}

impl Record for Product {
    const COLLECTION: &'static str = "products";
    const KIND: &'static str = "Product";
    fn id(&self) -> &str { &self.id }
}

impl Record for User {
    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "User";
    fn id(&self) -> &str { &self.id }
}
