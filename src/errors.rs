//! Error types you might see while parsing an image reference

use thiserror::Error;

/// Errors from parsing or validating an image reference or digest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// repository name must have at least one component
    #[error("repository name must have at least one component")]
    NameEmpty,

    /// invalid reference format
    #[error("invalid reference format: {0:?}")]
    ReferenceInvalidFormat(String),

    /// repository name must not be more than 255 characters
    #[error("repository name must not be more than 255 characters, found {0}")]
    NameTooLong(usize),

    /// unsupported digest algorithm
    #[error("unsupported digest algorithm: {0:?}")]
    DigestUnsupported(String),

    /// invalid checksum digest length
    #[error("invalid checksum digest length for {algorithm}, expected {expected} hex digits, found {found}")]
    DigestInvalidLength {
        algorithm: String,
        expected: usize,
        found: usize,
    },

    /// invalid checksum digest format
    #[error("invalid checksum digest format: {0:?}")]
    DigestInvalidFormat(String),
}
