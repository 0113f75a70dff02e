use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::FeedbackData;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::document_store::{Document, DocumentStore, StoreError};
use crate::db::models::{DiagnosisRecord, StandaloneFeedbackRecord, FEEDBACK_RECORD};
use crate::db::record_id::{RecordId, RecordIdError};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Document store is not configured")]
    Unconfigured,
    #[error("{0}")]
    InvalidRecordId(#[from] RecordIdError),
    #[error("No record found with ID: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of `save`. A save that could not reach the store still returns a
/// receipt, carrying a placeholder id and `success == false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveReceipt {
    pub success: bool,
    pub record_id: String,
    pub message: String,
}

impl SaveReceipt {
    pub fn persisted_id(&self) -> Option<&str> {
        self.success.then_some(self.record_id.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Applied,
    AlreadyRecorded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackUpdate {
    pub record_id: String,
    pub modified_count: u64,
    pub outcome: FeedbackOutcome,
    pub message: String,
}

#[derive(Clone)]
pub struct PersistenceGateway {
    store: Option<Arc<dyn DocumentStore>>,
    collection: String,
    timeout: Duration,
}

impl PersistenceGateway {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, collection: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            collection: collection.into(),
            timeout,
        }
    }

    pub fn unconfigured() -> Self {
        Self::new(None, "patient_diagnoses", Duration::from_secs(10))
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn save_diagnosis(&self, record: &DiagnosisRecord) -> Result<SaveReceipt, PersistenceError> {
        self.save(to_document(record)?).await
    }

    pub async fn save_feedback(&self, record: &StandaloneFeedbackRecord) -> Result<SaveReceipt, PersistenceError> {
        self.save(to_document(record)?).await
    }

    /// Validates before any I/O, then inserts under a freshly minted id.
    pub async fn save(&self, document: Document) -> Result<SaveReceipt, PersistenceError> {
        validate(&document)?;

        let Some(store) = &self.store else {
            log::warn!("Document store not configured; record kept locally only");
            return Ok(SaveReceipt {
                success: false,
                record_id: format!("local_save_{}", Utc::now().timestamp()),
                message: "Database not available - record not persisted".to_string(),
            });
        };

        let id = RecordId::generate();
        match self
            .bounded("insert", store.insert(&self.collection, &id, document))
            .await
        {
            Ok(()) => {
                log::info!("Saved record with ID: {}", id);
                Ok(SaveReceipt {
                    success: true,
                    record_id: id.to_string(),
                    message: "Record saved successfully".to_string(),
                })
            }
            Err(e) => {
                log::error!("Failed to save record to '{}': {}", self.collection, e);
                Ok(SaveReceipt {
                    success: false,
                    record_id: format!("error_save_{}", Utc::now().timestamp()),
                    message: format!("Database save failed: {}", e),
                })
            }
        }
    }

    /// Merges feedback into an existing record. Submitting the same feedback
    /// again succeeds with `modified_count == 0` and writes nothing.
    pub async fn update_with_feedback(
        &self,
        record_id: &str,
        feedback: &FeedbackData,
    ) -> Result<FeedbackUpdate, PersistenceError> {
        let store = self.store.as_ref().ok_or(PersistenceError::Unconfigured)?;
        let id = RecordId::parse(record_id)?;
        let feedback_value = serde_json::to_value(feedback)?;

        let existing = self
            .bounded("find", store.find(&self.collection, &id))
            .await?
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;

        if existing.get("user_feedback") == Some(&feedback_value) {
            log::info!("Feedback for record {} already recorded", id);
            return Ok(FeedbackUpdate {
                record_id: id.to_string(),
                modified_count: 0,
                outcome: FeedbackOutcome::AlreadyRecorded,
                message: "Record found but no changes were made (feedback may be identical)".to_string(),
            });
        }

        let now = Value::String(Utc::now().to_rfc3339());
        let mut fields = Document::new();
        fields.insert("user_feedback".to_string(), feedback_value);
        fields.insert("feedback_timestamp".to_string(), now.clone());
        fields.insert("last_updated".to_string(), now);

        let counts = self
            .bounded("set_fields", store.set_fields(&self.collection, &id, fields))
            .await?;
        if counts.matched == 0 {
            return Err(PersistenceError::NotFound(id.to_string()));
        }

        log::info!("Successfully updated record {} with feedback", id);
        Ok(FeedbackUpdate {
            record_id: id.to_string(),
            modified_count: counts.modified.max(1),
            outcome: FeedbackOutcome::Applied,
            message: "Feedback updated successfully".to_string(),
        })
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout {
                operation,
                seconds: self.timeout.as_secs(),
            })?
    }
}

fn to_document<T: Serialize>(record: &T) -> Result<Document, PersistenceError> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        _ => Err(PersistenceError::Validation("document")),
    }
}

fn validate(document: &Document) -> Result<(), PersistenceError> {
    let required: &[&'static str] = match document.get("record_type").and_then(Value::as_str) {
        Some(FEEDBACK_RECORD) => &["feedback_data"],
        _ => &["patient_data", "diagnosis_results"],
    };
    for &field in required {
        if !document.contains_key(field) {
            log::error!("Missing required field: {}", field);
            return Err(PersistenceError::Validation(field));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use shared::{ConfidenceLevel, PredictionAccuracy, Recommendation, ReportUsefulness};

    fn gateway(store: Arc<MemoryStore>) -> PersistenceGateway {
        PersistenceGateway::new(Some(store), "patient_diagnoses", Duration::from_secs(5))
    }

    fn diagnosis_document() -> Document {
        json!({
            "record_type": "diagnosis",
            "patient_data": {"name": "Test Patient"},
            "diagnosis_results": {"predicted_condition": "Acne"}
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn feedback() -> FeedbackData {
        FeedbackData {
            prediction_accuracy: PredictionAccuracy::VeryAccurate,
            confidence: ConfidenceLevel::VeryConfident,
            report_usefulness: ReportUsefulness::VeryUseful,
            recommendation: Recommendation::DefinitelyYes,
            additional_comments: "Helpful".to_string(),
        }
    }

    #[tokio::test]
    async fn save_without_store_returns_local_placeholder() {
        let receipt = PersistenceGateway::unconfigured()
            .save(diagnosis_document())
            .await
            .unwrap();
        assert!(!receipt.success);
        assert!(receipt.record_id.starts_with("local_save_"));
        assert_eq!(receipt.persisted_id(), None);
    }

    #[tokio::test]
    async fn save_validates_before_touching_the_store() {
        let store = Arc::new(MemoryStore::new());
        let mut document = diagnosis_document();
        document.remove("diagnosis_results");

        let result = gateway(store.clone()).save(document).await;
        assert!(matches!(result, Err(PersistenceError::Validation("diagnosis_results"))));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn feedback_records_need_feedback_data_only() {
        let store = Arc::new(MemoryStore::new());
        let record = StandaloneFeedbackRecord::new(feedback(), Some("abc".into()));
        let receipt = gateway(store.clone()).save_feedback(&record).await.unwrap();
        assert!(receipt.success);
        assert_eq!(store.count("patient_diagnoses").await, 1);

        let bare = json!({"record_type": "user_feedback"}).as_object().cloned().unwrap();
        assert!(matches!(
            gateway(store).save(bare).await,
            Err(PersistenceError::Validation("feedback_data"))
        ));
    }

    #[tokio::test]
    async fn identical_feedback_is_reported_once() {
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway(store.clone());
        let receipt = gateway.save(diagnosis_document()).await.unwrap();
        let id = receipt.persisted_id().unwrap().to_string();

        let first = gateway.update_with_feedback(&id, &feedback()).await.unwrap();
        assert_eq!(first.modified_count, 1);
        assert_eq!(first.outcome, FeedbackOutcome::Applied);

        let second = gateway.update_with_feedback(&id, &feedback()).await.unwrap();
        assert_eq!(second.modified_count, 0);
        assert_eq!(second.outcome, FeedbackOutcome::AlreadyRecorded);

        let stored = &store.all("patient_diagnoses").await[0];
        assert_eq!(stored["user_feedback"]["prediction_accuracy"], "Very Accurate");
        assert_eq!(stored["patient_data"]["name"], "Test Patient");
        assert!(stored.contains_key("feedback_timestamp"));
        assert!(stored.contains_key("last_updated"));
    }

    #[tokio::test]
    async fn changed_feedback_is_applied_again() {
        let store = Arc::new(MemoryStore::new());
        let gateway = gateway(store);
        let id = gateway.save(diagnosis_document()).await.unwrap().record_id;
        gateway.update_with_feedback(&id, &feedback()).await.unwrap();

        let mut revised = feedback();
        revised.additional_comments = "Changed my mind".into();
        let update = gateway.update_with_feedback(&id, &revised).await.unwrap();
        assert_eq!(update.modified_count, 1);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_fail() {
        let gateway = gateway(Arc::new(MemoryStore::new()));
        assert!(matches!(
            gateway.update_with_feedback("65a1f0c2e4b0a1b2c3d4e5f6", &feedback()).await,
            Err(PersistenceError::NotFound(_))
        ));
        assert!(matches!(
            gateway.update_with_feedback("zzzzzzzzzzzzzzzzzzzzzzzz", &feedback()).await,
            Err(PersistenceError::InvalidRecordId(_))
        ));
        assert!(matches!(
            PersistenceGateway::unconfigured().update_with_feedback("x", &feedback()).await,
            Err(PersistenceError::Unconfigured)
        ));
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn insert(&self, _: &str, _: &RecordId, _: Document) -> Result<(), StoreError> {
            Err(StoreError::DynamoDb("connection refused".into()))
        }

        async fn find(&self, _: &str, _: &RecordId) -> Result<Option<Document>, StoreError> {
            Err(StoreError::DynamoDb("connection refused".into()))
        }

        async fn set_fields(
            &self,
            _: &str,
            _: &RecordId,
            _: Document,
        ) -> Result<crate::db::document_store::UpdateCounts, StoreError> {
            Err(StoreError::DynamoDb("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_failures_yield_error_placeholder() {
        let gateway = PersistenceGateway::new(Some(Arc::new(FailingStore)), "c", Duration::from_secs(1));
        let receipt = gateway.save(diagnosis_document()).await.unwrap();
        assert!(!receipt.success);
        assert!(receipt.record_id.starts_with("error_save_"));
    }

    struct SlowStore;

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn insert(&self, _: &str, _: &RecordId, _: Document) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn find(&self, _: &str, _: &RecordId) -> Result<Option<Document>, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn set_fields(
            &self,
            _: &str,
            _: &RecordId,
            _: Document,
        ) -> Result<crate::db::document_store::UpdateCounts, StoreError> {
            Ok(Default::default())
        }
    }

    #[tokio::test]
    async fn slow_store_calls_time_out() {
        let gateway = PersistenceGateway::new(Some(Arc::new(SlowStore)), "c", Duration::from_millis(20));
        let receipt = gateway.save(diagnosis_document()).await.unwrap();
        assert!(receipt.record_id.starts_with("error_save_"));

        let update = gateway.update_with_feedback("65a1f0c2e4b0a1b2c3d4e5f6", &feedback()).await;
        assert!(matches!(update, Err(PersistenceError::Store(StoreError::Timeout { .. }))));
    }
}
