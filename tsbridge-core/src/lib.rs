//! # tsbridge Core
//!
//! Type model shared by every tsbridge crate.
//!
//! This crate provides:
//! - Primitive kinds, type keys and field descriptors
//! - Named type definitions, including enumeration candidates
//! - The [`TypeSet`] arena that holds a type graph
//! - The [`Describe`] trait, the compile-time replacement for reflection

pub mod describe;
pub mod error;
pub mod set;
pub mod types;

pub use describe::{Describe, default_date_types};
pub use error::{Error, Result};
pub use set::TypeSet;
pub use types::{EnumRenderer, FieldDef, PrimitiveKind, TypeDef, TypeDefKind, TypeExpr, TypeKey};
