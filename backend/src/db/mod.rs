pub mod document_store;
pub mod dynamodb_store;
pub mod memory_store;
pub mod models;
pub mod persistence;
pub mod record_id;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::sync::Arc;

use crate::config::StoreSettings;

pub use document_store::{Document, DocumentStore, StoreError, UpdateCounts};
pub use dynamodb_store::DynamoDbStore;
pub use memory_store::MemoryStore;
pub use models::{DiagnosisRecord, DiagnosisResults, PatientRecord, ReportSummary, StandaloneFeedbackRecord};
pub use persistence::{FeedbackOutcome, FeedbackUpdate, PersistenceError, PersistenceGateway, SaveReceipt};
pub use record_id::{RecordId, RecordIdError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    DynamoDbDefault,
    DynamoDbEndpoint(String),
}

impl StoreTarget {
    pub fn parse(uri: &str) -> Result<Self, StoreError> {
        let uri = uri.trim();
        if uri == "memory://" {
            return Ok(StoreTarget::Memory);
        }
        if uri == "dynamodb://default" {
            return Ok(StoreTarget::DynamoDbDefault);
        }
        let parsed = url::Url::parse(uri)
            .map_err(|e| StoreError::InvalidData(format!("Invalid store URI '{}': {}", uri, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(StoreTarget::DynamoDbEndpoint(uri.to_string())),
            other => Err(StoreError::InvalidData(format!(
                "Unsupported store scheme '{}'",
                other
            ))),
        }
    }
}

/// Builds the persistence gateway for the configured store. A missing URI
/// yields an unconfigured gateway, which saves placeholders only.
pub async fn connect(settings: &StoreSettings) -> Result<PersistenceGateway, StoreError> {
    let Some(uri) = settings.uri.as_deref() else {
        log::warn!("DOCUMENT_STORE_URI not set; diagnosis records will not be persisted");
        return Ok(PersistenceGateway::new(None, settings.collection.clone(), settings.timeout));
    };

    let store: Arc<dyn DocumentStore> = match StoreTarget::parse(uri)? {
        StoreTarget::Memory => {
            log::info!("Using in-memory document store");
            Arc::new(MemoryStore::new())
        }
        StoreTarget::DynamoDbDefault => {
            let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
            log::info!("Using DynamoDB document store, table '{}'", settings.collection);
            Arc::new(DynamoDbStore::new(DynamoDbClient::new(&aws_config)))
        }
        StoreTarget::DynamoDbEndpoint(endpoint) => {
            let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
            let dynamodb_config = aws_sdk_dynamodb::config::Builder::from(&aws_config)
                .endpoint_url(&endpoint)
                .build();
            log::info!(
                "Using DynamoDB document store at {}, table '{}'",
                endpoint,
                settings.collection
            );
            Arc::new(DynamoDbStore::new(DynamoDbClient::from_conf(dynamodb_config)))
        }
    };

    Ok(PersistenceGateway::new(
        Some(store),
        settings.collection.clone(),
        settings.timeout,
    ))
}
