use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use super::DocumentStore;
use crate::Result;

/// Documents held in process memory. Used by tests and throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.documents.read().await.get(name).cloned())
    }

    async fn write(&self, name: &str, contents: Vec<u8>) -> Result<()> {
        self.documents.write().await.insert(name.to_string(), contents);
        Ok(())
    }
}
