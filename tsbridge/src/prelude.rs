//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tsbridge::prelude::*;
//! ```

// Type model
pub use tsbridge_core::{
    Describe, Error as CoreError, PrimitiveKind, TypeDef, TypeExpr, TypeKey, TypeSet,
};
pub use tsbridge_derive::Describe;

// Generation
pub use tsbridge_codegen::{CodegenError, Converter, CustomCode, TypeMapper, load_custom_code};

// Schemas
pub use tsbridge_schema::{SchemaIr, parse_schema, parse_schema_file};
