//! Arena of named type definitions.

use crate::describe::Describe;
use crate::error::{Error, Result};
use crate::types::{TypeDef, TypeExpr, TypeKey};
use std::collections::{HashMap, HashSet};

/// Collection of named type definitions keyed by [`TypeKey`].
///
/// A type is *reserved* while its definition is being built, so that a
/// self-referential or mutually-referential description terminates.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    defs: HashMap<TypeKey, TypeDef>,
    pending: HashSet<TypeKey>,
}

impl TypeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Describes a Rust type into the set and returns its expression.
    pub fn describe<T: Describe + ?Sized>(&mut self) -> TypeExpr {
        T::describe(self)
    }

    /// Defines a named type, building it at most once.
    ///
    /// `build` runs only if `key` is neither defined nor currently being
    /// built; the returned expression always refers to `key`.
    pub fn define_with(
        &mut self,
        key: TypeKey,
        build: impl FnOnce(&mut Self) -> TypeDef,
    ) -> TypeExpr {
        if !self.contains(&key) {
            self.pending.insert(key.clone());
            let def = build(self);
            self.pending.remove(&key);
            self.defs.insert(key.clone(), def);
        }
        TypeExpr::Named(key)
    }

    /// Inserts a fully built definition.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateType`] if the key is already defined.
    pub fn insert(&mut self, def: TypeDef) -> Result<()> {
        if self.defs.contains_key(&def.key) {
            return Err(Error::DuplicateType { key: def.key });
        }
        self.defs.insert(def.key.clone(), def);
        Ok(())
    }

    /// Returns true if the key is defined or being defined.
    #[must_use]
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.defs.contains_key(key) || self.pending.contains(key)
    }

    /// Looks up a definition.
    #[must_use]
    pub fn get(&self, key: &TypeKey) -> Option<&TypeDef> {
        self.defs.get(key)
    }

    /// Looks up a definition that must exist.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] if the key is not defined.
    pub fn resolve(&self, key: &TypeKey) -> Result<&TypeDef> {
        self.defs
            .get(key)
            .ok_or_else(|| Error::UnknownType { key: key.clone() })
    }

    /// Merges every definition of `other` not already present.
    pub fn extend(&mut self, other: Self) {
        for (key, def) in other.defs {
            self.defs.entry(key).or_insert(def);
        }
    }

    /// Returns the number of defined types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if no type is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterates over the defined types in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.defs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDef, PrimitiveKind};

    fn node_key() -> TypeKey {
        TypeKey::new("Node")
    }

    fn describe_node(set: &mut TypeSet) -> TypeExpr {
        set.define_with(node_key(), |set| {
            let next = describe_node(set);
            TypeDef::structure(
                node_key(),
                "Node",
                vec![FieldDef::new("next", Some("next"), TypeExpr::pointer(next))],
            )
        })
    }

    #[test]
    fn test_define_with_self_reference_terminates() {
        let mut set = TypeSet::new();
        let expr = describe_node(&mut set);

        assert_eq!(expr, TypeExpr::Named(node_key()));
        assert_eq!(set.len(), 1);
        let def = set.resolve(&node_key()).expect("node defined");
        assert_eq!(def.fields().len(), 1);
    }

    #[test]
    fn test_define_with_builds_once() {
        let mut set = TypeSet::new();
        let mut calls = 0;
        for _ in 0..3 {
            set.define_with(TypeKey::new("A"), |_| {
                calls += 1;
                TypeDef::structure(TypeKey::new("A"), "A", Vec::new())
            });
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = TypeSet::new();
        let def = TypeDef::primitive(TypeKey::new("Email"), "Email", PrimitiveKind::String);
        set.insert(def.clone()).expect("first insert");
        assert!(matches!(set.insert(def), Err(Error::DuplicateType { .. })));
    }

    #[test]
    fn test_resolve_unknown() {
        let set = TypeSet::new();
        let err = set.resolve(&TypeKey::new("Missing")).unwrap_err();
        assert_eq!(err.to_string(), "unknown type 'Missing'");
    }

    #[test]
    fn test_extend_keeps_existing() {
        let mut a = TypeSet::new();
        a.insert(TypeDef::primitive(TypeKey::new("X"), "First", PrimitiveKind::I32))
            .expect("insert");
        let mut b = TypeSet::new();
        b.insert(TypeDef::primitive(TypeKey::new("X"), "Second", PrimitiveKind::I32))
            .expect("insert");
        b.insert(TypeDef::primitive(TypeKey::new("Y"), "Y", PrimitiveKind::Bool))
            .expect("insert");

        a.extend(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(&TypeKey::new("X")).map(|d| d.name.as_str()), Some("First"));
    }
}
