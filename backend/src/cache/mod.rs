pub mod tensor_cache;

pub use tensor_cache::{calculate_image_hash, TensorCache};
