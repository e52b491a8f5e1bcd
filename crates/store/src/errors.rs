//! Errors for the `verdict-store` crate.

use thiserror::Error;

/// An error raised while reading or writing typed entities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing key-value store failed.
    #[error("Storage backend failure: {0}")]
    Backend(String),
    /// A value could not be encoded or decoded.
    #[error("Failed to {0} value under {1}: {2}")]
    Codec(&'static str, String, String),
    /// A key carried an unknown namespace type byte.
    #[error("Invalid store key type: {0}")]
    InvalidKeyType(u8),
}

/// A [Result] alias for the [StoreError] type.
pub type StoreResult<T> = Result<T, StoreError>;
