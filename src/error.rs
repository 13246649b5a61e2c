//! Error types for the accessory overlay library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP transport failed while fetching an asset
    #[error("HTTP error: {0}")]
    Http(String),

    /// The asset host refused cross-origin access
    #[error("Cross-origin request rejected for {url}")]
    CrossOrigin {
        /// URL of the rejected request
        url: String,
    },

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Accessory asset lookup or loading error
    #[error("Asset error: {0}")]
    AssetError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Landmark replay input could not be parsed
    #[error("Frame input error: {0}")]
    FrameInput(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
