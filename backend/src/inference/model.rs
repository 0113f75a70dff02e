use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tract_onnx::prelude::*;
use url::Url;

use crate::config::ModelSettings;
use crate::inference::preprocess::ImageTensor;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),
    #[error("Model error: {0}")]
    ModelError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model registry is not configured")]
    RegistryNotConfigured,
    #[error("No local model path configured")]
    LocalPathNotConfigured,
    #[error("Model download failed: {0}")]
    Download(String),
    #[error("Invalid registry URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("Label file {0} contains no labels")]
    EmptyLabels(String),
    #[error("Label line {0} is blank")]
    BlankLabel(usize),
    #[error("Failed to load model: remote ({remote}); local ({local})")]
    Unavailable { remote: String, local: String },
}

/// Anything that turns a preprocessed batch into one score per class.
pub trait Classifier: Send + Sync {
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<f32>, InferenceError>;
}

pub struct TractClassifier {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
}

impl TractClassifier {
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| InferenceError::ModelError(e.to_string()))?;
        Ok(Self { model })
    }
}

impl Classifier for TractClassifier {
    fn classify(&self, tensor: &ImageTensor) -> Result<Vec<f32>, InferenceError> {
        let input = Tensor::from_shape(&tensor.shape(), &tensor.to_vec())
            .map_err(|e| InferenceError::PreprocessingError(e.to_string()))?;
        let output = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::ModelError(e.to_string()))?;
        let scores = output
            .first()
            .ok_or_else(|| InferenceError::ModelError("Model produced no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::ModelError(e.to_string()))?
            .iter()
            .copied()
            .collect();
        Ok(scores)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Registry(PathBuf),
    Local(PathBuf),
    InMemory,
}

/// A classifier paired with the labels its outputs are indexed by.
pub struct LoadedModel {
    classifier: Box<dyn Classifier>,
    labels: Vec<String>,
    source: ModelSource,
}

impl LoadedModel {
    pub fn new(classifier: Box<dyn Classifier>, labels: Vec<String>, source: ModelSource) -> Self {
        Self {
            classifier,
            labels,
            source,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    pub fn classify(&self, tensor: &ImageTensor) -> Result<Vec<f32>, InferenceError> {
        self.classifier.classify(tensor)
    }
}

/// Each label line starts with a two-character index prefix ("3 FU-ringworm").
/// Line N is the label for output N, so only trailing blank lines are dropped.
pub fn parse_labels(contents: &str) -> Result<Vec<String>, ModelLoadError> {
    let lines: Vec<&str> = contents.lines().collect();
    let used = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);

    lines[..used]
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let label = line.chars().skip(2).collect::<String>().trim().to_string();
            if label.is_empty() {
                Err(ModelLoadError::BlankLabel(index + 1))
            } else {
                Ok(label)
            }
        })
        .collect()
}

pub async fn load_labels(path: &Path) -> Result<Vec<String>, ModelLoadError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let labels = parse_labels(&contents)?;
    if labels.is_empty() {
        return Err(ModelLoadError::EmptyLabels(path.display().to_string()));
    }
    Ok(labels)
}

pub type ClassifierFactory =
    Arc<dyn Fn(&Path) -> Result<Box<dyn Classifier>, InferenceError> + Send + Sync>;

/// Loads the classifier and labels once per process and hands out the shared result.
pub struct ModelLoader {
    settings: ModelSettings,
    http_client: reqwest::Client,
    factory: ClassifierFactory,
    cell: OnceCell<Arc<LoadedModel>>,
}

impl ModelLoader {
    pub fn new(settings: ModelSettings) -> Result<Self, ModelLoadError> {
        let factory: ClassifierFactory = Arc::new(|path: &Path| {
            TractClassifier::load(path).map(|c| Box::new(c) as Box<dyn Classifier>)
        });
        Self::with_factory(settings, factory)
    }

    pub fn with_factory(settings: ModelSettings, factory: ClassifierFactory) -> Result<Self, ModelLoadError> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.fetch_timeout)
            .build()
            .map_err(|e| ModelLoadError::Download(e.to_string()))?;
        Ok(Self {
            settings,
            http_client,
            factory,
            cell: OnceCell::new(),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Concurrent first callers wait for the single in-flight load. A failed load
    /// leaves the cell empty so a later call can try again.
    pub async fn get_or_load(&self) -> Result<Arc<LoadedModel>, ModelLoadError> {
        self.cell
            .get_or_try_init(|| async { self.load().await.map(Arc::new) })
            .await
            .cloned()
    }

    async fn load(&self) -> Result<LoadedModel, ModelLoadError> {
        log::info!("Loading classification model");
        let labels = load_labels(&self.settings.labels_path).await?;
        log::info!(
            "Loaded {} labels from {}",
            labels.len(),
            self.settings.labels_path.display()
        );

        let remote_error = match self.load_from_registry().await {
            Ok((classifier, path)) => {
                log::info!("Model loaded from registry artifact {}", path.display());
                return Ok(LoadedModel::new(classifier, labels, ModelSource::Registry(path)));
            }
            Err(e) => {
                log::error!("Error loading model from registry: {}", e);
                e.to_string()
            }
        };

        log::info!("Attempting to load model from local storage");
        match self.load_from_local() {
            Ok((classifier, path)) => {
                log::info!("Local model loaded successfully from {}", path.display());
                Ok(LoadedModel::new(classifier, labels, ModelSource::Local(path)))
            }
            Err(e) => {
                log::error!("Error loading local model: {}", e);
                Err(ModelLoadError::Unavailable {
                    remote: remote_error,
                    local: e.to_string(),
                })
            }
        }
    }

    async fn load_from_registry(&self) -> Result<(Box<dyn Classifier>, PathBuf), ModelLoadError> {
        let path = self.fetch_artifact().await?;
        let classifier = self.build(&path)?;
        Ok((classifier, path))
    }

    fn load_from_local(&self) -> Result<(Box<dyn Classifier>, PathBuf), ModelLoadError> {
        let path = self
            .settings
            .local_path
            .clone()
            .ok_or(ModelLoadError::LocalPathNotConfigured)?;
        let classifier = self.build(&path)?;
        Ok((classifier, path))
    }

    fn build(&self, path: &Path) -> Result<Box<dyn Classifier>, ModelLoadError> {
        (self.factory)(path).map_err(|e| ModelLoadError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn artifact_url(&self) -> Result<Url, ModelLoadError> {
        let (namespace, repository) = match (&self.settings.namespace, &self.settings.repository) {
            (Some(n), Some(r)) => (n, r),
            _ => return Err(ModelLoadError::RegistryNotConfigured),
        };
        let base = format!("{}/", self.settings.registry_url.trim_end_matches('/'));
        let url = Url::parse(&base)?.join(&format!(
            "{}/{}/resolve/main/{}",
            namespace, repository, self.settings.filename
        ))?;
        Ok(url)
    }

    fn cached_artifact_path(&self) -> Result<PathBuf, ModelLoadError> {
        match (&self.settings.namespace, &self.settings.repository) {
            (Some(n), Some(r)) => Ok(self
                .settings
                .cache_dir
                .join(n)
                .join(r)
                .join(&self.settings.filename)),
            _ => Err(ModelLoadError::RegistryNotConfigured),
        }
    }

    /// Downloads the artifact into the cache directory unless it is already there.
    async fn fetch_artifact(&self) -> Result<PathBuf, ModelLoadError> {
        let url = self.artifact_url()?;
        let target = self.cached_artifact_path()?;

        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            log::info!("Using cached model artifact {}", target.display());
            return Ok(target);
        }

        log::info!("Downloading model artifact from {}", url);
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ModelLoadError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ModelLoadError::Download(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ModelLoadError::Download(e.to_string()))?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let partial = target.with_extension("part");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, &target).await?;

        log::info!(
            "Model artifact downloaded ({} bytes) to {}",
            bytes.len(),
            target.display()
        );
        Ok(target)
    }
}
