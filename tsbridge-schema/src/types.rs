//! Schema document definitions.
//!
//! This module contains the data structures representing a parsed type
//! schema: structs, enumerations, aliases and the list of root types.

use crate::error::ParseError;
use std::collections::HashMap;
use tsbridge_core::PrimitiveKind;

/// Complete type schema document.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Package name (informational).
    pub package: String,
    /// Schema description.
    pub description: Option<String>,
    /// Named definitions, in document order.
    pub definitions: Vec<Definition>,
    /// Root type names, in document order.
    pub roots: Vec<String>,
    /// Definition lookup map (built during parsing).
    def_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new(package: String) -> Self {
        Self {
            package,
            description: None,
            definitions: Vec::new(),
            roots: Vec::new(),
            def_map: HashMap::new(),
        }
    }

    /// Adds a definition to the schema.
    ///
    /// # Errors
    /// Returns [`ParseError::DuplicateDefinition`] if the name is taken.
    pub fn add_definition(&mut self, definition: Definition) -> Result<(), ParseError> {
        let name = definition.name().to_string();
        if self.def_map.contains_key(&name) {
            return Err(ParseError::duplicate(definition.kind_name(), name));
        }
        self.def_map.insert(name, self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Registers a root type by name.
    pub fn add_root(&mut self, name: impl Into<String>) {
        self.roots.push(name.into());
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.def_map.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Returns true if a definition with the given name exists.
    #[must_use]
    pub fn has_definition(&self, name: &str) -> bool {
        self.def_map.contains_key(name)
    }
}

/// Named definition variants.
#[derive(Debug, Clone)]
pub enum Definition {
    /// Record with named fields.
    Struct(StructDef),
    /// Integer enumeration.
    Enum(EnumDef),
    /// Named primitive.
    Alias(AliasDef),
}

impl Definition {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(s) => &s.name,
            Self::Enum(e) => &e.name,
            Self::Alias(a) => &a.name,
        }
    }

    /// Returns the element name describing this definition kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Enum(_) => "enum",
            Self::Alias(_) => "alias",
        }
    }

    /// Returns true if this is a struct definition.
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }
}

/// Struct definition.
#[derive(Debug, Clone)]
pub struct StructDef {
    /// Struct name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDecl>,
}

impl StructDef {
    /// Creates a new struct definition.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    pub fn add_field(&mut self, field: FieldDecl) {
        self.fields.push(field);
    }
}

/// Field declaration within a struct.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Serialized (JSON) name; fields without one are not emitted.
    pub json: Option<String>,
    /// Excluded from serialization.
    pub skip: bool,
    /// Fields of the referenced struct are hoisted into the container.
    pub embedded: bool,
    /// Field type.
    pub ty: TypeRef,
}

impl FieldDecl {
    /// Creates a serialized field.
    #[must_use]
    pub fn new(name: String, json: Option<String>, ty: TypeRef) -> Self {
        Self {
            name,
            json,
            skip: false,
            embedded: false,
            ty,
        }
    }
}

/// Enumeration definition.
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Integer encoding.
    pub encoding_type: PrimitiveKind,
    /// Description.
    pub description: Option<String>,
    /// Named values.
    pub values: Vec<EnumValue>,
}

impl EnumDef {
    /// Creates a new enum definition.
    #[must_use]
    pub fn new(name: String, encoding_type: PrimitiveKind) -> Self {
        Self {
            name,
            encoding_type,
            description: None,
            values: Vec::new(),
        }
    }

    /// Adds a value.
    pub fn add_value(&mut self, value: EnumValue) {
        self.values.push(value);
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// Enumeration value.
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// Rendered name.
    pub name: String,
    /// Raw value text.
    pub value: String,
}

impl EnumValue {
    /// Creates a new enum value.
    #[must_use]
    pub fn new(name: String, value: String) -> Self {
        Self { name, value }
    }

    /// Parses the value as a signed integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }
}

/// Named primitive definition.
#[derive(Debug, Clone)]
pub struct AliasDef {
    /// Alias name.
    pub name: String,
    /// Underlying primitive.
    pub kind: PrimitiveKind,
}

/// Date-like types recognized by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Timezone-aware timestamp (`DateTime`).
    DateTime,
    /// Timestamp without timezone (`NaiveDateTime`).
    NaiveDateTime,
    /// Calendar date (`NaiveDate`).
    NaiveDate,
}

/// Type expression used by fields and aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Built-in primitive.
    Primitive(PrimitiveKind),
    /// Built-in date type.
    Date(DateKind),
    /// Reference to a named definition.
    Named(String),
    /// `Option<T>` or `Box<T>`.
    Pointer(Box<TypeRef>),
    /// `Vec<T>`.
    Vec(Box<TypeRef>),
    /// `HashMap<K, V>` or `BTreeMap<K, V>`.
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    /// Parses a type expression such as `Vec<Option<Address>>`.
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidTypeExpr`] for malformed input.
    pub fn parse(expr: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidTypeExpr {
            expr: expr.to_string(),
        };
        let text = expr.trim();
        if text.is_empty() {
            return Err(invalid());
        }

        let Some(open) = text.find('<') else {
            if !text.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(invalid());
            }
            return Ok(Self::simple(text));
        };
        if !text.ends_with('>') {
            return Err(invalid());
        }

        let head = text[..open].trim();
        let args = split_args(&text[open + 1..text.len() - 1]).ok_or_else(invalid)?;
        match (head, args.as_slice()) {
            ("Vec" | "VecDeque" | "HashSet" | "BTreeSet", [elem]) => {
                Ok(Self::Vec(Box::new(Self::parse(elem)?)))
            }
            ("Option" | "Box" | "Rc" | "Arc", [inner]) => {
                Ok(Self::Pointer(Box::new(Self::parse(inner)?)))
            }
            ("HashMap" | "BTreeMap" | "Map", [key, value]) => Ok(Self::Map(
                Box::new(Self::parse(key)?),
                Box::new(Self::parse(value)?),
            )),
            _ => Err(invalid()),
        }
    }

    fn simple(name: &str) -> Self {
        match name {
            "DateTime" => Self::Date(DateKind::DateTime),
            "NaiveDateTime" => Self::Date(DateKind::NaiveDateTime),
            "NaiveDate" => Self::Date(DateKind::NaiveDate),
            _ => PrimitiveKind::from_name(name)
                .map_or_else(|| Self::Named(name.to_string()), Self::Primitive),
        }
    }

    /// Strips `Option`/`Box` layers.
    #[must_use]
    pub fn deref(&self) -> &Self {
        let mut ty = self;
        while let Self::Pointer(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Visits every named reference in this expression.
    pub fn for_each_named(&self, f: &mut impl FnMut(&str)) {
        match self {
            Self::Named(name) => f(name),
            Self::Pointer(inner) | Self::Vec(inner) => inner.for_each_named(f),
            Self::Map(key, value) => {
                key.for_each_named(f);
                value.for_each_named(f);
            }
            Self::Primitive(_) | Self::Date(_) => {}
        }
    }
}

/// Splits generic arguments on top-level commas.
fn split_args(args: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(args[start..].trim());
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}
