use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

use crate::config::PreprocessingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Empty image payload")]
    Empty,
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid preprocessing config: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// A single-image NHWC batch with values in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    pub fn from_array(data: Array4<f32>) -> Self {
        Self { data }
    }

    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }

    pub fn array(&self) -> &Array4<f32> {
        &self.data
    }

    /// Values in row-major NHWC order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Center-crops the image to the target aspect ratio, resizes it and rescales
/// every channel from [0, 255] to [-1, 1].
pub fn preprocess(image: &DynamicImage, height: u32, width: u32, filter: FilterType) -> ImageTensor {
    let fitted = image.resize_to_fill(width, height, filter).to_rgb8();
    let data = Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| fitted.get_pixel(x as u32, y as u32)[c] as f32 / 127.5 - 1.0,
    );
    ImageTensor { data }
}

pub fn preprocess_bytes(bytes: &[u8], config: &PreprocessingConfig) -> Result<ImageTensor, ImageError> {
    let image = decode_image(bytes)?;
    let (height, width) = config.dimensions();
    let filter = config.filter()?;
    Ok(preprocess(&image, height, width, filter))
}
