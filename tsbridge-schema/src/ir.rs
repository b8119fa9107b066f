//! Intermediate representation for code generation.
//!
//! Lowers a validated [`Schema`] into a [`TypeSet`] plus the ordered list of
//! root types, the same shape the derive front end produces.

use crate::error::SchemaError;
use crate::types::{DateKind, Definition, EnumDef, Schema, StructDef, TypeRef};
use crate::validation::validate_schema;
use tsbridge_core::{EnumRenderer, FieldDef, TypeDef, TypeExpr, TypeKey, TypeSet};

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// Package name.
    pub package: String,
    /// Every named type of the schema.
    pub types: TypeSet,
    /// Root types in document order.
    pub roots: Vec<TypeKey>,
}

impl SchemaIr {
    /// Creates an intermediate representation from a parsed schema.
    ///
    /// # Errors
    /// Returns `SchemaError` if the schema fails validation.
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        validate_schema(schema)?;

        let mut types = TypeSet::new();
        for definition in &schema.definitions {
            let def = match definition {
                Definition::Struct(s) => lower_struct(&mut types, s),
                Definition::Enum(e) => lower_enum(e)?,
                Definition::Alias(a) => TypeDef::primitive(TypeKey::new(&a.name), &a.name, a.kind),
            };
            types.insert(def)?;
        }

        Ok(Self {
            package: schema.package.clone(),
            types,
            roots: schema.roots.iter().map(TypeKey::new).collect(),
        })
    }

    /// Gets a type definition by its declared name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(&TypeKey::new(name))
    }
}

fn lower_struct(types: &mut TypeSet, struct_def: &StructDef) -> TypeDef {
    let fields = struct_def
        .fields
        .iter()
        .map(|field| {
            let ty = lower_type(types, &field.ty);
            if field.embedded {
                FieldDef::embedded(&field.name, ty)
            } else {
                let def = FieldDef::new(&field.name, field.json.as_deref(), ty);
                if field.skip { def.skipped() } else { def }
            }
        })
        .collect();
    TypeDef::structure(TypeKey::new(&struct_def.name), &struct_def.name, fields)
}

fn lower_enum(enum_def: &EnumDef) -> Result<TypeDef, SchemaError> {
    let mut table = Vec::with_capacity(enum_def.values.len());
    for value in &enum_def.values {
        let raw = value.as_i64().ok_or_else(|| SchemaError::InvalidEnumValue {
            enum_name: enum_def.name.clone(),
            value: value.value.clone(),
        })?;
        table.push((raw, value.name.clone()));
    }

    Ok(TypeDef::enumeration(
        TypeKey::new(&enum_def.name),
        &enum_def.name,
        enum_def.encoding_type,
        EnumRenderer::from_table(&enum_def.name, table),
    ))
}

/// Lowers a type expression; date types are registered on the fly.
fn lower_type(types: &mut TypeSet, ty: &TypeRef) -> TypeExpr {
    match ty {
        TypeRef::Primitive(kind) => TypeExpr::Primitive(*kind),
        TypeRef::Named(name) => TypeExpr::Named(TypeKey::new(name)),
        TypeRef::Date(DateKind::DateTime) => types.describe::<chrono::DateTime<chrono::Utc>>(),
        TypeRef::Date(DateKind::NaiveDateTime) => types.describe::<chrono::NaiveDateTime>(),
        TypeRef::Date(DateKind::NaiveDate) => types.describe::<chrono::NaiveDate>(),
        TypeRef::Pointer(inner) => TypeExpr::pointer(lower_type(types, inner)),
        TypeRef::Vec(elem) => TypeExpr::slice(lower_type(types, elem)),
        TypeRef::Map(key, value) => {
            let key = lower_type(types, key);
            TypeExpr::map(key, lower_type(types, value))
        }
    }
}
