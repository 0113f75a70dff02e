use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::db::record_id::RecordId;

pub type Document = Map<String, Value>;

/// Attribute holding the record id inside every stored document.
pub const ID_FIELD: &str = "id";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Record {0} already exists")]
    Duplicate(String),
    #[error("Invalid data format: {0}")]
    InvalidData(String),
    #[error("Store operation '{operation}' timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, id: &RecordId, document: Document) -> Result<(), StoreError>;

    async fn find(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, StoreError>;

    /// Partial update: sets the given top-level fields, leaves the rest alone.
    async fn set_fields(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Document,
    ) -> Result<UpdateCounts, StoreError>;
}
