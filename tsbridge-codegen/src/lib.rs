//! # tsbridge Codegen
//!
//! TypeScript generation from described Rust types or XML type schemas.
//!
//! This crate provides:
//! - The [`Converter`]: classes, interfaces and enums with `createFrom` factories
//! - Primitive mapping, enum member discovery and class body rendering
//! - Preservation of hand-written code between regenerations
//! - Backups and generated file output

pub mod custom;
pub mod error;
pub mod generator;
pub mod output;
pub mod typescript;

pub use custom::{CustomCode, load_custom_code, parse_custom_code};
pub use error::CodegenError;
pub use generator::Converter;
pub use output::{GENERATED_HEADER, backup};
pub use typescript::{ENUM_PROBE_CEILING, TypeMapper};

/// Generates TypeScript from an XML type schema string.
///
/// # Arguments
/// * `xml` - XML type schema content
/// * `converter` - Configured converter; the schema's types and roots are added to it
///
/// # Returns
/// Generated TypeScript code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or generation fails.
pub fn generate_from_xml(xml: &str, mut converter: Converter) -> Result<String, CodegenError> {
    let schema = tsbridge_schema::parse_schema(xml)?;
    let ir = tsbridge_schema::SchemaIr::from_schema(&schema)?;
    converter.add_schema(ir);
    converter.convert(None)
}

/// Generates TypeScript from an XML type schema file.
///
/// # Arguments
/// * `path` - Path to the XML type schema file
/// * `converter` - Configured converter; the schema's types and roots are added to it
///
/// # Returns
/// Generated TypeScript code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    converter: Converter,
) -> Result<String, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, converter)
}
