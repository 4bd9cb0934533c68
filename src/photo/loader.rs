/// Photo decoder
///
/// The workflow only needs "path in, pixel buffer out", so decoding sits
/// behind a trait. `FileDecoder` reads from disk with the `image` crate;
/// tests swap in an in-memory decoder.

use std::path::Path;

use super::buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Turns an image path into a decoded buffer
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer>;
}

/// Decodes JPEG and PNG files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer> {
        let image = image::open(path).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let buffer = PixelBuffer::from_dynamic(&image);
        log::debug!(
            "Decoded {}: {}x{} (max sample {})",
            path.display(),
            buffer.width(),
            buffer.height(),
            buffer.max_value()
        );

        Ok(buffer)
    }
}
