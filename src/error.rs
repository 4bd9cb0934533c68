/// Error types shared across the crate
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while analysing photos
#[derive(Debug, Error)]
pub enum Error {
    /// The image file could not be opened or decoded
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Listing a batch folder failed
    #[error("failed to list folder: {0}")]
    Listing(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration file exists but is not valid JSON for `Config`
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value that would make the estimate meaningless
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A click outside the decoded image
    #[error("point ({x}, {y}) lies outside the {width}x{height} image")]
    PointOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
