use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use super::DocumentStore;
use crate::{Result, StorefrontError};

pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Document name the collection is stored under.
    const COLLECTION: &'static str;
    /// Human name used in "not found" errors.
    const KIND: &'static str;
    fn id(&self) -> &str;
}

/// Typed repository over one JSON document.
///
/// Mutations are read-modify-write of the whole document, run one at a time
/// per collection so two writers in this process cannot drop each other's
/// changes.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), write_lock: self.write_lock.clone(), _record: PhantomData }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, write_lock: Arc::new(Mutex::new(())), _record: PhantomData }
    }

    /// All records in storage order.
    pub async fn list(&self) -> Result<Vec<T>> { self.load().await }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.load().await?.into_iter().find(|r| r.id() == id).ok_or(StorefrontError::NotFound(T::KIND))
    }

    /// Append a record.
    pub async fn insert(&self, record: T) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        records.push(record.clone());
        self.save(&records).await?;
        debug!(collection = T::COLLECTION, id = record.id(), "record inserted");
        Ok(record)
    }

    /// Apply `mutate` to the record with `id` and persist the collection.
    ///
    /// When `mutate` fails nothing is written.
    pub async fn update<F, R>(&self, id: &str, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R> + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let record = records.iter_mut().find(|r| r.id() == id).ok_or(StorefrontError::NotFound(T::KIND))?;
        let out = mutate(record)?;
        self.save(&records).await?;
        debug!(collection = T::COLLECTION, id, "record updated");
        Ok(out)
    }

    /// Remove the record with `id`, returning it.
    pub async fn delete(&self, id: &str) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let index = records.iter().position(|r| r.id() == id).ok_or(StorefrontError::NotFound(T::KIND))?;
        let removed = records.remove(index);
        self.save(&records).await?;
        debug!(collection = T::COLLECTION, id, "record deleted");
        Ok(removed)
    }

    async fn load(&self) -> Result<Vec<T>> {
        match self.store.read(T::COLLECTION).await? {
            None => Ok(vec![]),
            Some(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(vec![]),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorefrontError::Storage(format!("{}: {}", T::COLLECTION, e))),
        }
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StorefrontError::Storage(format!("{}: {}", T::COLLECTION, e)))?;
        self.store.write(T::COLLECTION, bytes).await
    }
}
