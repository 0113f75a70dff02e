#![allow(dead_code)]

use async_trait::async_trait;
use backend::cache::TensorCache;
use backend::config::{PreprocessingConfig, RemoteInfoSettings};
use backend::db::{Document, DocumentStore, MemoryStore, PersistenceGateway, RecordId, StoreError, UpdateCounts};
use backend::inference::{Classifier, ImageTensor, InferenceError, LoadedModel, ModelSource};
use backend::knowledge::known_classes;
use backend::remote::MedicationService;
use backend::workflow::DiagnosisWorkflow;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const COLLECTION: &str = "patient_diagnoses";
pub const RINGWORM_SCORES: [f32; 10] = [0.1, 0.05, 0.05, 0.7, 0.02, 0.02, 0.02, 0.02, 0.01, 0.01];

pub struct FixedClassifier(pub Vec<f32>);

impl Classifier for FixedClassifier {
    fn classify(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, InferenceError> {
        Ok(self.0.clone())
    }
}

pub struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn classify(&self, _tensor: &ImageTensor) -> Result<Vec<f32>, InferenceError> {
        Err(InferenceError::ModelError("output tensor missing".to_string()))
    }
}

pub fn labels() -> Vec<String> {
    known_classes().into_iter().map(str::to_string).collect()
}

pub fn model_with(classifier: impl Classifier + 'static) -> Arc<LoadedModel> {
    Arc::new(LoadedModel::new(Box::new(classifier), labels(), ModelSource::InMemory))
}

pub fn black_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn unconfigured_remote() -> MedicationService {
    MedicationService::new(RemoteInfoSettings {
        url: None,
        username: None,
        password: None,
        timeout: Duration::from_secs(1),
    })
    .unwrap()
}

pub fn gateway(store: Option<Arc<dyn DocumentStore>>) -> PersistenceGateway {
    PersistenceGateway::new(store, COLLECTION, Duration::from_secs(5))
}

pub fn workflow(model: Arc<LoadedModel>, persistence: PersistenceGateway) -> DiagnosisWorkflow {
    DiagnosisWorkflow::new(
        model,
        Arc::new(TensorCache::new(PreprocessingConfig::default())),
        unconfigured_remote(),
        persistence,
    )
}

pub fn ringworm_workflow(store: Arc<MemoryStore>) -> DiagnosisWorkflow {
    workflow(
        model_with(FixedClassifier(RINGWORM_SCORES.to_vec())),
        gateway(Some(store)),
    )
}

/// Accepts inserts but cannot find or update anything afterwards.
#[derive(Default)]
pub struct ForgetfulStore {
    pub inner: MemoryStore,
    pub failed_lookups: AtomicUsize,
}

#[async_trait]
impl DocumentStore for ForgetfulStore {
    async fn insert(&self, collection: &str, id: &RecordId, document: Document) -> Result<(), StoreError> {
        self.inner.insert(collection, id, document).await
    }

    async fn find(&self, _collection: &str, _id: &RecordId) -> Result<Option<Document>, StoreError> {
        self.failed_lookups.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::DynamoDb("connection reset".to_string()))
    }

    async fn set_fields(
        &self,
        _collection: &str,
        _id: &RecordId,
        _fields: Document,
    ) -> Result<UpdateCounts, StoreError> {
        Err(StoreError::DynamoDb("connection reset".to_string()))
    }
}
