//! Image loading for texture maps
//!
//! Texture images referenced by MTL files are decoded through the
//! [`ImageDecoder`] capability, which the caller injects into a load.
//! Keeping decoding behind a trait means the parsers never hold ambient
//! graphics state and tests can substitute a stub decoder.

use std::path::Path;

use thiserror::Error;

/// Errors raised while decoding a texture image.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The image file could not be found
    #[error("image file not found: {0}")]
    NotFound(String),
    /// The image file could not be decoded
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),
    /// IO error while reading the image file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded image data ready for upload or inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (always 4 for RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Load an image from a file path, converting to RGBA8.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref)
            .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

        // RGBA8 is the canonical in-memory format for texture data.
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
            channels: 4,
        })
    }

    /// Create a solid color image (useful for testing and defaults).
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
            channels: 4,
        }
    }

    /// Get the size of the image data in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Capability for turning a texture path into decoded image data.
///
/// A decoder is passed into a load call when the caller wants texture
/// images resolved eagerly; without one, texture maps carry only their
/// file reference.
pub trait ImageDecoder {
    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<ImageData, ImageError>;
}

/// Default [`ImageDecoder`] that reads image files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskImageDecoder;

impl ImageDecoder for DiskImageDecoder {
    fn decode(&self, path: &Path) -> Result<ImageData, ImageError> {
        if !path.exists() {
            return Err(ImageError::NotFound(path.display().to_string()));
        }
        ImageData::from_file(path)
    }
}
