//! Schema validation utilities.
//!
//! This module checks a parsed schema for consistency before it is lowered
//! into a type set.

use crate::error::SchemaError;
use crate::types::{Definition, EnumDef, Schema, StructDef, TypeRef};
use std::collections::HashSet;

/// Validates a parsed schema for correctness.
///
/// # Arguments
/// * `schema` - The schema to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    validate_definitions(schema)?;
    validate_roots(schema)?;
    Ok(())
}

/// Validates all definitions in the schema.
fn validate_definitions(schema: &Schema) -> Result<(), SchemaError> {
    for definition in &schema.definitions {
        match definition {
            Definition::Struct(struct_def) => validate_struct(schema, struct_def)?,
            Definition::Enum(enum_def) => validate_enum(enum_def)?,
            Definition::Alias(_) => {}
        }
    }
    Ok(())
}

/// Validates a struct definition.
fn validate_struct(schema: &Schema, struct_def: &StructDef) -> Result<(), SchemaError> {
    let mut seen_names = HashSet::new();

    for field in &struct_def.fields {
        if !seen_names.insert(field.name.as_str()) {
            return Err(SchemaError::Validation {
                message: format!(
                    "Duplicate field '{}' in struct '{}'",
                    field.name, struct_def.name
                ),
            });
        }

        let context = format!("field '{}.{}'", struct_def.name, field.name);
        let mut missing = None;
        field.ty.for_each_named(&mut |name| {
            if missing.is_none() && !schema.has_definition(name) {
                missing = Some(name.to_string());
            }
        });
        if let Some(name) = missing {
            return Err(SchemaError::not_found(name, context));
        }

        if field.embedded {
            let embeds_struct = match field.ty.deref() {
                TypeRef::Named(name) => schema.get(name).is_some_and(Definition::is_struct),
                _ => false,
            };
            if !embeds_struct {
                return Err(SchemaError::Validation {
                    message: format!("embedded {context} must reference a struct"),
                });
            }
        }
    }

    Ok(())
}

/// Validates an enum definition.
fn validate_enum(enum_def: &EnumDef) -> Result<(), SchemaError> {
    if !enum_def.encoding_type.is_integer() {
        return Err(SchemaError::InvalidEnumEncoding {
            enum_name: enum_def.name.clone(),
            encoding: enum_def.encoding_type.to_string(),
        });
    }

    if enum_def.values.is_empty() {
        return Err(SchemaError::Validation {
            message: format!("Enum '{}' has no values", enum_def.name),
        });
    }

    let mut seen_names = HashSet::new();
    let mut seen_values = HashSet::new();

    for value in &enum_def.values {
        let Some(raw) = value.as_i64() else {
            return Err(SchemaError::InvalidEnumValue {
                enum_name: enum_def.name.clone(),
                value: value.value.clone(),
            });
        };

        if !seen_names.insert(&value.name) {
            return Err(SchemaError::Validation {
                message: format!(
                    "Duplicate enum value name '{}' in enum '{}'",
                    value.name, enum_def.name
                ),
            });
        }

        if !seen_values.insert(raw) {
            return Err(SchemaError::Validation {
                message: format!(
                    "Duplicate enum value '{}' in enum '{}'",
                    value.value, enum_def.name
                ),
            });
        }
    }

    Ok(())
}

/// Validates that every root names a definition.
fn validate_roots(schema: &Schema) -> Result<(), SchemaError> {
    for root in &schema.roots {
        if !schema.has_definition(root) {
            return Err(SchemaError::not_found(root, "root"));
        }
    }
    Ok(())
}
