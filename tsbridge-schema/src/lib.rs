//! # tsbridge Schema
//!
//! XML type schema parser and type definitions.
//!
//! This crate provides:
//! - Parsing of `<typeSchema>` documents describing structs, enums and aliases
//! - A small type-expression language (`Vec<T>`, `Option<T>`, `HashMap<K, V>`, ...)
//! - Schema validation
//! - Lowering into a [`tsbridge_core::TypeSet`] for code generation

pub mod error;
pub mod ir;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::SchemaIr;
pub use parser::{parse_schema, parse_schema_file};
pub use types::{
    AliasDef, DateKind, Definition, EnumDef, EnumValue, FieldDecl, Schema, StructDef, TypeRef,
};
pub use validation::validate_schema;
