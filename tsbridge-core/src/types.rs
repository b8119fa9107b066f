//! Type model definitions.
//!
//! This module contains the data structures describing host types for
//! conversion: primitive kinds, type identities, field descriptors and the
//! named type definitions that make up a [`TypeSet`](crate::TypeSet).

use std::fmt;
use std::sync::Arc;

/// Primitive kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Signed 128-bit integer.
    I128,
    /// Pointer-sized signed integer.
    Isize,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Unsigned 128-bit integer.
    U128,
    /// Pointer-sized unsigned integer.
    Usize,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// Single Unicode scalar value.
    Char,
    /// UTF-8 string.
    String,
    /// Dynamically typed value.
    Any,
    /// Unit / empty tuple.
    Unit,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::I128,
        Self::Isize,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::U128,
        Self::Usize,
        Self::F32,
        Self::F64,
        Self::Char,
        Self::String,
        Self::Any,
        Self::Unit,
    ];

    /// Returns the canonical name of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
            Self::Any => "any",
            Self::Unit => "()",
        }
    }

    /// Parses a primitive kind from its canonical name.
    ///
    /// `str` and `string` are accepted as aliases of `String`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" | "string" => Some(Self::String),
            _ => Self::ALL.into_iter().find(|kind| kind.name() == name),
        }
    }

    /// Returns true if this is a signed integer kind.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128 | Self::Isize
        )
    }

    /// Returns true if this is an unsigned integer kind.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::U128 | Self::Usize
        )
    }

    /// Returns true if this is any integer kind.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// Returns true if this is a floating point kind.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a type inside a [`TypeSet`](crate::TypeSet).
///
/// Rust types use their [`std::any::type_name`]; schema types use their
/// declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(String);

impl TypeKey {
    /// Creates a key from an arbitrary identity string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key of a Rust type.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shape of a field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Unnamed primitive.
    Primitive(PrimitiveKind),
    /// Reference to a named type in the set.
    Named(TypeKey),
    /// Indirection (`Box`, `Option`, `Arc`, ...).
    Pointer(Box<TypeExpr>),
    /// Sequence of elements.
    Slice(Box<TypeExpr>),
    /// Key/value map.
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

impl TypeExpr {
    /// Wraps an expression in a pointer.
    #[must_use]
    pub fn pointer(inner: Self) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// Wraps an expression in a slice.
    #[must_use]
    pub fn slice(element: Self) -> Self {
        Self::Slice(Box::new(element))
    }

    /// Builds a map expression.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Strips every level of pointer indirection.
    #[must_use]
    pub fn deref(&self) -> &Self {
        let mut expr = self;
        while let Self::Pointer(inner) = expr {
            expr = inner;
        }
        expr
    }
}

/// String-rendering capability of an integer type.
///
/// Renders a raw value the way the host type would display it. Values
/// without a name conventionally render as `Name(<value>)`.
#[derive(Clone)]
pub struct EnumRenderer(Arc<dyn Fn(i64) -> String + Send + Sync>);

impl EnumRenderer {
    /// Creates a renderer from a closure.
    pub fn new(render: impl Fn(i64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    /// Creates a renderer from a `(value, name)` table.
    ///
    /// Values missing from the table render as `type_name(<value>)`.
    #[must_use]
    pub fn from_table(type_name: impl Into<String>, values: Vec<(i64, String)>) -> Self {
        let type_name = type_name.into();
        Self::new(move |value| {
            values
                .iter()
                .find(|(v, _)| *v == value)
                .map_or_else(|| format!("{type_name}({value})"), |(_, name)| name.clone())
        })
    }

    /// Renders a raw value.
    #[must_use]
    pub fn render(&self, value: i64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for EnumRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnumRenderer(..)")
    }
}

/// One field of a structural type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name in the host type.
    pub name: String,
    /// External wire name, if any.
    pub serialized_name: Option<String>,
    /// Explicitly excluded from serialization.
    pub skip: bool,
    /// Embedded field whose own fields are hoisted into the container.
    pub embedded: bool,
    /// Field type.
    pub ty: TypeExpr,
}

impl FieldDef {
    /// Creates a field with an optional serialized name.
    #[must_use]
    pub fn new(name: impl Into<String>, serialized_name: Option<&str>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            serialized_name: serialized_name.map(str::to_string),
            skip: false,
            embedded: false,
            ty,
        }
    }

    /// Creates an embedded field.
    #[must_use]
    pub fn embedded(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            serialized_name: None,
            skip: false,
            embedded: true,
            ty,
        }
    }

    /// Marks the field as skipped.
    #[must_use]
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Returns the trimmed wire name if the field is serialized.
    #[must_use]
    pub fn wire_name(&self) -> Option<&str> {
        if self.skip {
            return None;
        }
        self.serialized_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "-")
    }
}

/// Kind of a named type.
#[derive(Debug, Clone)]
pub enum TypeDefKind {
    /// Record type with named fields.
    Struct(Vec<FieldDef>),
    /// Named primitive, optionally renderable as an enumeration.
    Primitive {
        /// Underlying primitive kind.
        kind: PrimitiveKind,
        /// String-rendering capability.
        renderer: Option<EnumRenderer>,
    },
}

/// Named type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Type identity.
    pub key: TypeKey,
    /// Base name used in generated code.
    pub name: String,
    /// Type kind.
    pub kind: TypeDefKind,
}

impl TypeDef {
    /// Creates a structural type definition.
    #[must_use]
    pub fn structure(key: TypeKey, name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            key,
            name: name.into(),
            kind: TypeDefKind::Struct(fields),
        }
    }

    /// Creates a named primitive definition.
    #[must_use]
    pub fn primitive(key: TypeKey, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            key,
            name: name.into(),
            kind: TypeDefKind::Primitive {
                kind,
                renderer: None,
            },
        }
    }

    /// Creates an enumeration candidate: an integer with a renderer.
    #[must_use]
    pub fn enumeration(
        key: TypeKey,
        name: impl Into<String>,
        kind: PrimitiveKind,
        renderer: EnumRenderer,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            kind: TypeDefKind::Primitive {
                kind,
                renderer: Some(renderer),
            },
        }
    }

    /// Returns true if this is a structural type.
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self.kind, TypeDefKind::Struct(_))
    }

    /// Returns the renderer if this type is an enumeration candidate.
    #[must_use]
    pub fn enum_renderer(&self) -> Option<&EnumRenderer> {
        match &self.kind {
            TypeDefKind::Primitive {
                kind,
                renderer: Some(renderer),
            } if kind.is_integer() => Some(renderer),
            _ => None,
        }
    }

    /// Returns the declared fields; empty for primitives.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        match &self.kind {
            TypeDefKind::Struct(fields) => fields,
            TypeDefKind::Primitive { .. } => &[],
        }
    }
}
