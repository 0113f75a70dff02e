use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
const MAX_DIMENSION: u32 = 800;
const MAX_ARCHIVE_KB: usize = 500;
const START_QUALITY: u8 = 85;
const QUALITY_STEP: u8 = 10;
const MIN_QUALITY: u8 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Image is larger than {} MB", MAX_UPLOAD_BYTES / (1024 * 1024))]
    FileTooLarge,
    #[error("Image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// JPEG copy of the submitted image, small enough to embed in a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressedImage {
    pub image_data: String,
    pub compressed_size_kb: f64,
    pub quality: u8,
    pub dimensions: [u32; 2],
}

pub fn validate_image_size(image_data: &[u8]) -> Result<(), ArchiveError> {
    if image_data.len() > MAX_UPLOAD_BYTES {
        return Err(ArchiveError::FileTooLarge);
    }
    Ok(())
}

pub fn compress_for_storage(image_data: &[u8]) -> Result<CompressedImage, ArchiveError> {
    validate_image_size(image_data)?;
    let decoded = image::load_from_memory(image_data)?;
    compress_image(&decoded)
}

pub fn compress_image(image: &DynamicImage) -> Result<CompressedImage, ArchiveError> {
    compress_within(image, MAX_ARCHIVE_KB * 1024)
}

fn compress_within(image: &DynamicImage, max_bytes: usize) -> Result<CompressedImage, ArchiveError> {
    let mut rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    if rgb.width().max(rgb.height()) > MAX_DIMENSION {
        rgb = rgb.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3);
    }

    let mut quality = START_QUALITY;
    let mut encoded = encode_jpeg(&rgb, quality)?;
    while encoded.len() > max_bytes && quality > MIN_QUALITY {
        quality -= QUALITY_STEP;
        encoded = encode_jpeg(&rgb, quality)?;
    }

    let image_data = STANDARD.encode(&encoded);
    let compressed = CompressedImage {
        compressed_size_kb: image_data.len() as f64 / 1024.0,
        image_data,
        quality,
        dimensions: [rgb.width(), rgb.height()],
    };
    log::info!(
        "Compressed image for storage: {:.2} KB at quality {}",
        compressed.compressed_size_kb,
        compressed.quality
    );
    Ok(compressed)
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ArchiveError> {
    let mut buffer = Vec::new();
    image.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;
    Ok(buffer)
}
