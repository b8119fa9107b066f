//! The [`Describe`] trait and its implementations for foreign types.
//!
//! `Describe` is the compile-time replacement for runtime reflection: a
//! type registers its own structural description (and those of the types it
//! references) into a [`TypeSet`].

use crate::set::TypeSet;
use crate::types::{PrimitiveKind, TypeDef, TypeExpr, TypeKey};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// A type that can describe its structure.
///
/// Usually implemented with `#[derive(Describe)]`.
pub trait Describe {
    /// Registers the type (and everything it references) into `types` and
    /// returns the expression a field of this type has.
    fn describe(types: &mut TypeSet) -> TypeExpr;
}

macro_rules! describe_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(_types: &mut TypeSet) -> TypeExpr {
                    TypeExpr::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    str => String,
    () => Unit,
    serde_json::Value => Any,
}

macro_rules! describe_pointer {
    ($($ty:ident),*) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn describe(types: &mut TypeSet) -> TypeExpr {
                    TypeExpr::pointer(T::describe(types))
                }
            }
        )*
    };
}

describe_pointer!(Box, Rc, Arc);

impl<T: Describe> Describe for Option<T> {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        TypeExpr::pointer(T::describe(types))
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        T::describe(types)
    }
}

macro_rules! describe_sequence {
    ($($ty:ident),*) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn describe(types: &mut TypeSet) -> TypeExpr {
                    TypeExpr::slice(T::describe(types))
                }
            }
        )*
    };
}

describe_sequence!(Vec, VecDeque, HashSet, BTreeSet);

impl<T: Describe> Describe for [T] {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        TypeExpr::slice(T::describe(types))
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        TypeExpr::slice(T::describe(types))
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        let key = K::describe(types);
        TypeExpr::map(key, V::describe(types))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        let key = K::describe(types);
        TypeExpr::map(key, V::describe(types))
    }
}

/// Registers an opaque structural type with no fields.
///
/// Date and time types are described this way; the converter recognizes
/// them by key and substitutes the date notation.
fn describe_opaque<T: ?Sized>(types: &mut TypeSet, name: &str) -> TypeExpr {
    let key = TypeKey::of::<T>();
    types.define_with(key.clone(), |_| TypeDef::structure(key, name, Vec::new()))
}

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        describe_opaque::<Self>(types, "DateTime")
    }
}

impl Describe for chrono::NaiveDateTime {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        describe_opaque::<Self>(types, "NaiveDateTime")
    }
}

impl Describe for chrono::NaiveDate {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        describe_opaque::<Self>(types, "NaiveDate")
    }
}

impl Describe for std::time::SystemTime {
    fn describe(types: &mut TypeSet) -> TypeExpr {
        describe_opaque::<Self>(types, "SystemTime")
    }
}

/// Keys of the date-like types treated as opaque by default.
#[must_use]
pub fn default_date_types() -> Vec<TypeKey> {
    vec![
        TypeKey::of::<chrono::DateTime<chrono::Utc>>(),
        TypeKey::of::<chrono::DateTime<chrono::Local>>(),
        TypeKey::of::<chrono::DateTime<chrono::FixedOffset>>(),
        TypeKey::of::<chrono::NaiveDateTime>(),
        TypeKey::of::<chrono::NaiveDate>(),
        TypeKey::of::<std::time::SystemTime>(),
    ]
}
