pub mod model;
pub mod predictor;
pub mod preprocess;

pub use model::{Classifier, InferenceError, LoadedModel, ModelLoadError, ModelLoader, ModelSource};
pub use predictor::{predict, top_predictions};
pub use preprocess::{ImageError, ImageTensor};
