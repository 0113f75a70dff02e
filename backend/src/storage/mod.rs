pub mod image_archive;

pub use image_archive::{compress_for_storage, validate_image_size, ArchiveError, CompressedImage};
