//! # Error Types
//!
//! This module defines error types used throughout the ledmask library.

use thiserror::Error;

/// Main error type for mask encoding operations
#[derive(Debug, Error)]
pub enum MaskError {
    /// Zero-sized input, or a crop/resize that would leave nothing
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Font could not be located or parsed
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),

    /// Text layout or glyph drawing failed
    #[error("Render error: {0}")]
    Render(String),

    /// Bitmap does not fit the packed column format
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid user-supplied parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, MaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MaskError::InvalidGeometry("0x12".to_string());
        assert_eq!(err.to_string(), "Invalid geometry: 0x12");

        let err = MaskError::Encoding("column 3 has 11 rows".to_string());
        assert_eq!(err.to_string(), "Encoding error: column 3 has 11 rows");

        let err = MaskError::InvalidArgument("bad color".to_string());
        assert_eq!(err.to_string(), "Invalid argument: bad color");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MaskError = io.into();
        assert!(matches!(err, MaskError::Io(_)));
    }
}
