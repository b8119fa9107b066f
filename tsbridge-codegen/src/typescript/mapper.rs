//! Primitive kind to TypeScript type mapping.

use std::collections::BTreeMap;
use tsbridge_core::PrimitiveKind;

/// Table from primitive kind to TypeScript type name.
///
/// The default table maps booleans to `boolean`, every integer width up to
/// 64 bits and both float widths to `number`, strings to `string` and
/// dynamic values to `any`. `char`, 128-bit integers and `()` are left
/// unmapped: a field of one of those kinds fails the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    table: BTreeMap<PrimitiveKind, String>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(PrimitiveKind::Bool, "boolean".to_string());
        for kind in PrimitiveKind::ALL {
            let fits_number = (kind.is_integer()
                && !matches!(kind, PrimitiveKind::I128 | PrimitiveKind::U128))
                || kind.is_float();
            if fits_number {
                table.insert(kind, "number".to_string());
            }
        }
        table.insert(PrimitiveKind::String, "string".to_string());
        table.insert(PrimitiveKind::Any, "any".to_string());
        Self { table }
    }
}

impl TypeMapper {
    /// Creates the default mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapper with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Adds or replaces the mapping of `kind`.
    #[must_use]
    pub fn with_mapping(mut self, kind: PrimitiveKind, ts_type: impl Into<String>) -> Self {
        self.table.insert(kind, ts_type.into());
        self
    }

    /// Removes the mapping of `kind`.
    #[must_use]
    pub fn without_mapping(mut self, kind: PrimitiveKind) -> Self {
        self.table.remove(&kind);
        self
    }

    /// Looks up the TypeScript type of `kind`.
    #[must_use]
    pub fn map(&self, kind: PrimitiveKind) -> Option<&str> {
        self.table.get(&kind).map(String::as_str)
    }
}
