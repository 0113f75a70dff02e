use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sha2::{Digest, Sha256};

use crate::config::PreprocessingConfig;
use crate::inference::preprocess::{preprocess_bytes, ImageError, ImageTensor};

pub fn calculate_image_hash(image_data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_data);
    hex::encode(hasher.finalize())
}

/// Preprocessed tensors keyed by the SHA-256 of the raw image bytes.
/// Entries live for the whole process.
pub struct TensorCache {
    config: PreprocessingConfig,
    entries: Mutex<HashMap<String, Arc<ImageTensor>>>,
}

impl TensorCache {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_preprocess(&self, image_data: &[u8]) -> Result<Arc<ImageTensor>, ImageError> {
        let image_hash = calculate_image_hash(image_data);

        if let Some(existing) = self.lookup(&image_hash) {
            log::debug!("Tensor cache hit for image {}", image_hash);
            return Ok(existing);
        }

        let tensor = Arc::new(preprocess_bytes(image_data, &self.config)?);
        log::debug!("Tensor cache miss for image {}, preprocessed", image_hash);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.entry(image_hash).or_insert(tensor).clone())
    }

    pub fn lookup(&self, image_hash: &str) -> Option<Arc<ImageTensor>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(image_hash)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
