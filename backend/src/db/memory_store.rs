use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::db::document_store::{Document, DocumentStore, StoreError, UpdateCounts, ID_FIELD};
use crate::db::record_id::RecordId;

/// Process-local store, used with `DOCUMENT_STORE_URI=memory://` and in tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    pub async fn all(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, id: &RecordId, mut document: Document) -> Result<(), StoreError> {
        self.record_call();
        let key = id.to_string();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&key) {
            return Err(StoreError::Duplicate(key));
        }
        document.insert(ID_FIELD.to_string(), key.clone().into());
        docs.insert(key, document);
        Ok(())
    }

    async fn find(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, StoreError> {
        self.record_call();
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(&id.to_string()))
            .cloned())
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Document,
    ) -> Result<UpdateCounts, StoreError> {
        self.record_call();
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&id.to_string()))
        else {
            return Ok(UpdateCounts::default());
        };

        let mut changed = false;
        for (name, value) in fields {
            if document.get(&name) != Some(&value) {
                document.insert(name, value);
                changed = true;
            }
        }
        Ok(UpdateCounts {
            matched: 1,
            modified: u64::from(changed),
        })
    }
}
