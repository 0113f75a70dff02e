use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    pub version: f32,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub size: Vec<u32>,
    pub channels: u32,
    pub preprocessing: ResizeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub resize_method: String,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            version: 1.0,
            image: ImageConfig {
                size: vec![224, 224],
                channels: 3,
                preprocessing: ResizeConfig {
                    resize_method: "lanczos3".to_string(),
                },
            },
        }
    }
}

impl PreprocessingConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ConfigError> {
        let config: PreprocessingConfig = serde_yaml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.image.size.as_slice() {
            [h, w] if *h > 0 && *w > 0 => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    name: "image.size",
                    value: format!("{:?}", self.image.size),
                });
            }
        }
        if self.image.channels != 3 {
            return Err(ConfigError::InvalidValue {
                name: "image.channels",
                value: self.image.channels.to_string(),
            });
        }
        self.filter()?;
        Ok(())
    }

    /// Target (height, width).
    pub fn dimensions(&self) -> (u32, u32) {
        match self.image.size.as_slice() {
            [h, w] => (*h, *w),
            _ => (224, 224),
        }
    }

    pub fn filter(&self) -> Result<FilterType, ConfigError> {
        match self.image.preprocessing.resize_method.to_lowercase().as_str() {
            "lanczos3" | "lanczos" => Ok(FilterType::Lanczos3),
            "catmullrom" | "bicubic" => Ok(FilterType::CatmullRom),
            "gaussian" => Ok(FilterType::Gaussian),
            "triangle" | "bilinear" => Ok(FilterType::Triangle),
            "nearest" => Ok(FilterType::Nearest),
            other => Err(ConfigError::InvalidValue {
                name: "image.preprocessing.resize_method",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub registry_url: String,
    pub namespace: Option<String>,
    pub repository: Option<String>,
    pub filename: String,
    pub cache_dir: PathBuf,
    pub local_path: Option<PathBuf>,
    pub labels_path: PathBuf,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub uri: Option<String>,
    pub collection: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct RemoteInfoSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteInfoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteInfoSettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model: ModelSettings,
    pub store: StoreSettings,
    pub remote_info: RemoteInfoSettings,
    pub preprocessing_config: Option<PathBuf>,
    pub session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT", 8081u16)?;

        let model = ModelSettings {
            registry_url: var_or("MODEL_REGISTRY_URL", "https://huggingface.co"),
            namespace: optional_var("HUGGINGFACE_USERNAME"),
            repository: optional_var("HUGGINGFACE_REPO"),
            filename: var_or("MODEL_FILENAME", "SDN5.onnx"),
            cache_dir: PathBuf::from(var_or("MODEL_CACHE_DIR", ".model_cache")),
            local_path: optional_var("MODEL_LOCAL_PATH").map(PathBuf::from),
            labels_path: PathBuf::from(var_or("LABELS_PATH", "models/sdn_labels.txt")),
            fetch_timeout: Duration::from_secs(parse_var("MODEL_FETCH_TIMEOUT_SECS", 120u64)?),
        };

        let store = StoreSettings {
            uri: optional_var("DOCUMENT_STORE_URI"),
            collection: var_or("COLLECTION_NAME", "patient_diagnoses"),
            timeout: Duration::from_secs(parse_var("STORE_TIMEOUT_SECS", 10u64)?),
        };

        let remote_info = RemoteInfoSettings {
            url: optional_var("REMOTE_INFO_URL"),
            username: optional_var("REMOTE_INFO_USERNAME"),
            password: optional_var("REMOTE_INFO_PASSWORD"),
            timeout: Duration::from_secs(parse_var("REMOTE_INFO_TIMEOUT_SECS", 15u64)?),
        };

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port,
            model,
            store,
            remote_info,
            preprocessing_config: optional_var("PREPROCESSING_CONFIG").map(PathBuf::from),
            session_ttl: Duration::from_secs(parse_var("SESSION_TTL_SECS", 1800u64)?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    optional_var(name).unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
