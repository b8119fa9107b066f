//! Error types for the type model.

use crate::types::TypeKey;
use thiserror::Error;

/// Core error type for type model operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced type was never defined in the set.
    #[error("unknown type '{key}'")]
    UnknownType {
        /// Key of the missing type.
        key: TypeKey,
    },

    /// A type key was defined twice with different definitions.
    #[error("type '{key}' is already defined")]
    DuplicateType {
        /// Key of the duplicate type.
        key: TypeKey,
    },
}

/// Result type alias for type model operations.
pub type Result<T> = std::result::Result<T, Error>;
