//! # tsbridge
//!
//! TypeScript classes, interfaces and enums generated from Rust types.
//!
//! Types opt in with `#[derive(Describe)]`, which records their shape
//! (honoring `serde` renames, skips and flattening) so the [`Converter`]
//! can walk the type graph and emit every reachable type exactly once,
//! dependencies first.
//!
//! ## Features
//!
//! - **Classes or interfaces** - With an optional `createFrom` factory that revives nested objects and dates
//! - **Enums** - Integer enums with named variants become string enums
//! - **Custom code** - Hand-written code between markers survives regeneration
//! - **Schemas** - Types can also come from an XML type schema
//!
//! ## Quick Start
//!
//! ```ignore
//! use tsbridge::prelude::*;
//!
//! #[derive(Describe)]
//! struct Person {
//!     name: String,
//!     nicknames: Vec<String>,
//! }
//!
//! let mut converter = Converter::new().create_from_method(false);
//! converter.add::<Person>();
//! converter.convert_to_file("models.ts")?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Type model and the `Describe` trait
//! - [`schema`] - XML type schema parsing and validation
//! - [`codegen`] - TypeScript generation

pub mod prelude;

/// Type model and the `Describe` trait.
pub mod core {
    pub use tsbridge_core::*;
}

/// XML type schema parsing and validation.
pub mod schema {
    pub use tsbridge_schema::*;
}

/// TypeScript generation.
pub mod codegen {
    pub use tsbridge_codegen::*;
}

// Re-export commonly used items at the crate root
pub use tsbridge_codegen::{CodegenError, Converter, CustomCode, TypeMapper};
pub use tsbridge_core::{Describe, TypeKey, TypeSet};
pub use tsbridge_derive::Describe;
