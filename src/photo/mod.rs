/// Photo handling module
///
/// This module handles:
/// - The decoded pixel buffer the measurements read from
/// - Decoding JPEG/PNG files into that buffer
/// - Listing the photos of a batch folder

pub mod buffer;
pub mod listing;
pub mod loader;

pub use buffer::{Channel, PixelBuffer};
pub use loader::{FileDecoder, ImageDecoder};
