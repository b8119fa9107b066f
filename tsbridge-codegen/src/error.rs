//! Error types for code generation.

use thiserror::Error;
use tsbridge_core::PrimitiveKind;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] tsbridge_schema::ParseError),

    /// Schema validation error.
    #[error("schema error: {0}")]
    Schema(#[from] tsbridge_schema::SchemaError),

    /// Type model error, e.g. a root that was never described.
    #[error("type error: {0}")]
    Core(#[from] tsbridge_core::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A field's primitive kind has no TypeScript mapping.
    #[error("cannot find type '{kind}' for field '{field}' of '{type_name}'")]
    UnmappedPrimitiveKind {
        /// Unmapped kind.
        kind: PrimitiveKind,
        /// Serialized field name.
        field: String,
        /// Emitted name of the containing type.
        type_name: String,
    },

    /// A field shape the generator cannot express.
    #[error("unsupported field '{field}' of '{type_name}': {detail}")]
    UnsupportedField {
        /// Serialized field name.
        field: String,
        /// Emitted name of the containing type.
        type_name: String,
        /// What is unsupported.
        detail: String,
    },
}

impl CodegenError {
    /// Creates an unmapped primitive kind error.
    pub fn unmapped(
        kind: PrimitiveKind,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnmappedPrimitiveKind {
            kind,
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates an unsupported field error.
    pub fn unsupported(
        field: impl Into<String>,
        type_name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::UnsupportedField {
            field: field.into(),
            type_name: type_name.into(),
            detail: detail.into(),
        }
    }
}
