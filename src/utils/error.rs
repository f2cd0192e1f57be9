//! Error Handling Module
//!
//! Defines the error type shared by the indexer, the dataset accessor and the
//! metrics. Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for fashionNet dataset and metric operations
#[derive(Error, Debug)]
pub enum FashionNetError {
    /// Argument outside the accepted domain (e.g. unknown subset name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error loading or decoding an image referenced by the index
    #[error("Failed to load image at '{0}': {1}")]
    ImageLoad(PathBuf, String),

    /// Dataset lookup past the end of the indexed table
    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Zero-length batch passed to a metric
    #[error("Empty batch: accuracy is undefined for zero samples")]
    EmptyBatch,

    /// Subset root missing while indexing in strict mode
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for fashionNet operations
pub type Result<T> = std::result::Result<T, FashionNetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FashionNetError::InvalidArgument("subset must be one of (background, evaluation)".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid argument: subset must be one of (background, evaluation)"
        );
    }

    #[test]
    fn test_image_load_error() {
        let path = PathBuf::from("/path/to/image.jpg");
        let err = FashionNetError::ImageLoad(path, "file not found".to_string());
        assert!(format!("{}", err).contains("image.jpg"));
    }

    #[test]
    fn test_index_out_of_bounds_display() {
        let err = FashionNetError::IndexOutOfBounds { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Index 7 out of bounds for dataset of length 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FashionNetError = io_err.into();
        assert!(matches!(err, FashionNetError::Io(_)));
    }
}
