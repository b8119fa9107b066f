//! TypeScript generation from a type graph.
//!
//! A [`Converter`] holds configuration, a [`TypeSet`] and the ordered list
//! of root types. Each call to [`Converter::convert`] walks the graph with a
//! fresh [`Emitter`] session, so one converter can serve concurrent calls.

use crate::custom::{CustomCode, END_MARKER, load_custom_code, start_marker};
use crate::error::CodegenError;
use crate::output::{backup, write_generated};
use crate::typescript::{ClassBuilder, TypeMapper, probe_members};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, trace, warn};
use tsbridge_core::{
    Describe, EnumRenderer, FieldDef, PrimitiveKind, TypeDef, TypeDefKind, TypeExpr, TypeKey,
    TypeSet, default_date_types,
};
use tsbridge_schema::SchemaIr;

/// Generator of TypeScript classes, interfaces and enums.
///
/// # Example
/// ```ignore
/// let mut converter = Converter::new().prefix("api_").create_from_method(false);
/// converter.add::<Person>();
/// let code = converter.convert(None)?;
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    prefix: String,
    suffix: String,
    indent: String,
    create_from_method: bool,
    export: bool,
    use_interface: bool,
    prefixed_references: bool,
    backup_extension: Option<String>,
    mapper: TypeMapper,
    date_types: HashSet<TypeKey>,
    types: TypeSet,
    roots: Vec<TypeKey>,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            indent: "    ".to_string(),
            create_from_method: true,
            export: true,
            use_interface: false,
            prefixed_references: false,
            backup_extension: Some("backup".to_string()),
            mapper: TypeMapper::default(),
            date_types: default_date_types().into_iter().collect(),
            types: TypeSet::new(),
            roots: Vec::new(),
        }
    }
}

impl Converter {
    /// Creates a converter with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix of every emitted type name.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the suffix of every emitted type name.
    ///
    /// The suffix is placed between the prefix and the base name.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the indentation of one nesting level.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Enables or disables the static `createFrom` factory on classes.
    #[must_use]
    pub fn create_from_method(mut self, enabled: bool) -> Self {
        self.create_from_method = enabled;
        self
    }

    /// Enables or disables the `export` keyword.
    #[must_use]
    pub fn export(mut self, enabled: bool) -> Self {
        self.export = enabled;
        self
    }

    /// Emits interfaces instead of classes.
    #[must_use]
    pub fn use_interface(mut self, enabled: bool) -> Self {
        self.use_interface = enabled;
        self
    }

    /// Makes field types and `createFrom` calls use the prefixed and
    /// suffixed name of the referenced type instead of its base name.
    #[must_use]
    pub fn prefixed_references(mut self, enabled: bool) -> Self {
        self.prefixed_references = enabled;
        self
    }

    /// Sets the extension of backups written by [`Converter::convert_to_file`].
    #[must_use]
    pub fn backup_extension(mut self, extension: impl Into<String>) -> Self {
        self.backup_extension = Some(extension.into());
        self
    }

    /// Disables backups.
    #[must_use]
    pub fn without_backup(mut self) -> Self {
        self.backup_extension = None;
        self
    }

    /// Replaces the primitive type mapper.
    #[must_use]
    pub fn mapper(mut self, mapper: TypeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Treats `T` as an opaque date type.
    #[must_use]
    pub fn date_type<T: ?Sized>(self) -> Self {
        self.date_type_key(TypeKey::of::<T>())
    }

    /// Treats the type identified by `key` as an opaque date type.
    #[must_use]
    pub fn date_type_key(mut self, key: TypeKey) -> Self {
        self.date_types.insert(key);
        self
    }

    /// Registers `T` as a root type.
    ///
    /// Wrappers such as `Box<T>` or `Option<T>` register the wrapped type.
    /// Types that are not named (plain primitives, collections) are ignored.
    pub fn add<T: Describe + ?Sized>(&mut self) -> &mut Self {
        match self.types.describe::<T>().deref() {
            TypeExpr::Named(key) => self.roots.push(key.clone()),
            other => warn!(expr = ?other, "ignoring root that is not a named type"),
        }
        self
    }

    /// Registers the type of `value` as a root type.
    pub fn add_value<T: Describe>(&mut self, _value: &T) -> &mut Self {
        self.add::<T>()
    }

    /// Registers an already described type as a root type.
    pub fn add_type(&mut self, key: TypeKey) -> &mut Self {
        self.roots.push(key);
        self
    }

    /// Merges type definitions without registering roots.
    pub fn add_types(&mut self, types: TypeSet) -> &mut Self {
        self.types.extend(types);
        self
    }

    /// Merges the types of a schema and registers its roots.
    pub fn add_schema(&mut self, ir: SchemaIr) -> &mut Self {
        self.types.extend(ir.types);
        self.roots.extend(ir.roots);
        self
    }

    /// Returns the registered roots in registration order.
    #[must_use]
    pub fn roots(&self) -> &[TypeKey] {
        &self.roots
    }

    /// Returns the known type definitions.
    #[must_use]
    pub fn types(&self) -> &TypeSet {
        &self.types
    }

    /// Returns the primitive type mapper.
    #[must_use]
    pub fn type_mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    /// Converts every root to TypeScript.
    ///
    /// Roots are emitted in registration order, each preceded by the types
    /// it depends on. With `custom_code`, every block carries a custom-code
    /// region holding the entry of the matching emitted name.
    ///
    /// # Errors
    /// Returns `CodegenError` if a root or field type is unknown, a
    /// primitive kind has no mapping or a field shape is unsupported. No
    /// partial output is returned.
    pub fn convert(&self, custom_code: Option<&CustomCode>) -> Result<String, CodegenError> {
        let mut emitter = Emitter {
            converter: self,
            custom_code,
            visited: HashSet::new(),
        };

        let mut output = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let blocks = emitter.emit(root)?;
            if blocks.is_empty() {
                continue;
            }
            let text = blocks.join("\n\n");
            let text = text.trim_matches(|c: char| {
                c == ' ' || c == '\r' || c == '\n' || self.indent.contains(c)
            });
            output.push(text.to_string());
        }

        debug!(
            roots = self.roots.len(),
            types = emitter.visited.len(),
            "conversion finished"
        );
        Ok(output.join("\n\n"))
    }

    /// Regenerates a TypeScript file.
    ///
    /// Custom code of the existing file is preserved. The file is only
    /// touched once conversion succeeded: it is first backed up (unless
    /// backups are disabled) and then overwritten.
    ///
    /// # Errors
    /// Returns `CodegenError` if conversion fails or the file cannot be
    /// read, backed up or written.
    pub fn convert_to_file(&self, path: impl AsRef<Path>) -> Result<(), CodegenError> {
        let path = path.as_ref();
        let custom_code = load_custom_code(path)?;
        let converted = self.convert(Some(&custom_code))?;

        if let Some(extension) = &self.backup_extension {
            if let Some(backup_path) = backup(path, extension)? {
                info!(path = %backup_path.display(), "backed up previous output");
            }
        }

        write_generated(path, &converted)?;
        info!(path = %path.display(), "wrote TypeScript definitions");
        Ok(())
    }

    fn emitted_name(&self, def: &TypeDef) -> String {
        format!("{}{}{}", self.prefix, self.suffix, def.name)
    }

    /// Name under which a field refers to `def`.
    fn reference_name(&self, def: &TypeDef) -> String {
        if self.prefixed_references {
            self.emitted_name(def)
        } else {
            def.name.clone()
        }
    }

    /// Maps a field's primitive kind. `any` is never looked up.
    fn map_kind(
        &self,
        kind: PrimitiveKind,
        field: &str,
        type_name: &str,
    ) -> Result<&str, CodegenError> {
        if kind == PrimitiveKind::Any {
            return Ok("any");
        }
        self.mapper
            .map(kind)
            .ok_or_else(|| CodegenError::unmapped(kind, field, type_name))
    }

    fn header(&self, form: Form, name: &str) -> String {
        let export = if self.export { "export " } else { "" };
        format!("{export}{} {name} {{\n", form.keyword())
    }
}

/// Output form of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Class,
    Interface,
    Enum,
}

impl Form {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

/// State of a single conversion call.
struct Emitter<'a> {
    converter: &'a Converter,
    custom_code: Option<&'a CustomCode>,
    visited: HashSet<TypeKey>,
}

impl<'a> Emitter<'a> {
    /// Emits `key` and every type it depends on, dependencies first.
    ///
    /// Returns no blocks for date types, for types already emitted in this
    /// session and for named primitives that are not enumerations.
    fn emit(&mut self, key: &TypeKey) -> Result<Vec<String>, CodegenError> {
        let converter = self.converter;
        if converter.date_types.contains(key) || !self.visited.insert(key.clone()) {
            return Ok(Vec::new());
        }

        let def = converter.types.resolve(key)?;
        let name = converter.emitted_name(def);
        match (&def.kind, def.enum_renderer()) {
            (TypeDefKind::Struct(_), _) => self.emit_struct(def, &name),
            (TypeDefKind::Primitive { .. }, Some(renderer)) => {
                Ok(vec![self.emit_enum(&name, renderer)])
            }
            (TypeDefKind::Primitive { kind, .. }, None) => {
                warn!(type_name = %name, %kind, "named primitive is not an enumeration, nothing emitted");
                Ok(Vec::new())
            }
        }
    }

    fn emit_struct(&mut self, def: &'a TypeDef, name: &str) -> Result<Vec<String>, CodegenError> {
        let converter = self.converter;
        let form = if converter.use_interface {
            Form::Interface
        } else {
            Form::Class
        };

        let mut dependencies = Vec::new();
        let mut builder = ClassBuilder::new(&converter.indent);
        for field in flatten_fields(&converter.types, def) {
            let Some(wire_name) = field.wire_name() else {
                continue;
            };
            trace!(type_name = %name, field = wire_name, "resolving field");
            let mut chunk = self.add_field(&mut builder, name, wire_name, &field.ty)?;
            // later dependencies go first
            chunk.append(&mut dependencies);
            dependencies = chunk;
        }

        let mut block = converter.header(form, name);
        block.push_str(builder.fields());
        if form == Form::Class && converter.create_from_method {
            block.push_str(&builder.create_from_method(name));
        }
        self.push_custom_code(&mut block, name);
        block.push('}');

        debug!(type_name = %name, form = form.keyword(), "emitted block");
        dependencies.push(block);
        Ok(dependencies)
    }

    fn emit_enum(&self, name: &str, renderer: &EnumRenderer) -> String {
        let converter = self.converter;
        let mut block = converter.header(Form::Enum, name);
        let members = probe_members(renderer);
        for member in &members {
            block.push_str(&member.line(&converter.indent));
        }
        self.push_custom_code(&mut block, name);
        block.push('}');

        debug!(type_name = %name, members = members.len(), "emitted enum");
        block
    }

    fn push_custom_code(&self, block: &mut String, name: &str) {
        let Some(custom_code) = self.custom_code else {
            return;
        };
        let indent = &self.converter.indent;
        block.push_str(&format!("{indent}{}\n", start_marker(name)));
        if let Some(code) = custom_code.get(name).filter(|code| !code.is_empty()) {
            block.push_str(code);
            block.push('\n');
        }
        block.push_str(&format!("{indent}{END_MARKER}\n"));
    }

    /// Adds one field and returns the blocks it required.
    fn add_field(
        &mut self,
        builder: &mut ClassBuilder<'_>,
        type_name: &str,
        field: &str,
        ty: &TypeExpr,
    ) -> Result<Vec<String>, CodegenError> {
        let converter = self.converter;
        match ty.deref() {
            TypeExpr::Primitive(kind) => {
                builder.add_simple_field(field, converter.map_kind(*kind, field, type_name)?);
                Ok(Vec::new())
            }
            TypeExpr::Named(key) => self.add_named_field(builder, type_name, field, key),
            TypeExpr::Slice(element) => self.add_slice_field(builder, type_name, field, element),
            TypeExpr::Map(key, value) => self.add_map_field(builder, field, key, value),
            TypeExpr::Pointer(inner) => self.add_field(builder, type_name, field, inner),
        }
    }

    fn add_named_field(
        &mut self,
        builder: &mut ClassBuilder<'_>,
        type_name: &str,
        field: &str,
        key: &TypeKey,
    ) -> Result<Vec<String>, CodegenError> {
        let converter = self.converter;
        if converter.date_types.contains(key) {
            builder.add_date_field(field);
            return Ok(Vec::new());
        }

        let def = converter.types.resolve(key)?;
        match &def.kind {
            TypeDefKind::Struct(_) => {
                let blocks = self.emit(key)?;
                builder.add_struct_field(field, &converter.reference_name(def));
                Ok(blocks)
            }
            TypeDefKind::Primitive { .. } if def.enum_renderer().is_some() => {
                let blocks = self.emit(key)?;
                builder.add_simple_field(field, &converter.reference_name(def));
                Ok(blocks)
            }
            TypeDefKind::Primitive { kind, .. } => {
                builder.add_simple_field(field, converter.map_kind(*kind, field, type_name)?);
                Ok(Vec::new())
            }
        }
    }

    fn add_slice_field(
        &mut self,
        builder: &mut ClassBuilder<'_>,
        type_name: &str,
        field: &str,
        element: &TypeExpr,
    ) -> Result<Vec<String>, CodegenError> {
        let converter = self.converter;
        match element.deref() {
            TypeExpr::Named(key) if converter.date_types.contains(key) => {
                builder.add_date_array_field(field);
                Ok(Vec::new())
            }
            TypeExpr::Named(key) => {
                let def = converter.types.resolve(key)?;
                match &def.kind {
                    TypeDefKind::Struct(_) => {
                        let blocks = self.emit(key)?;
                        builder.add_array_of_structs_field(field, &converter.reference_name(def));
                        Ok(blocks)
                    }
                    TypeDefKind::Primitive { .. } if def.enum_renderer().is_some() => {
                        let blocks = self.emit(key)?;
                        builder.add_simple_array_field(field, &converter.reference_name(def));
                        Ok(blocks)
                    }
                    TypeDefKind::Primitive { kind, .. } => {
                        let ts_type = converter.map_kind(*kind, field, type_name)?;
                        builder.add_simple_array_field(field, ts_type);
                        Ok(Vec::new())
                    }
                }
            }
            TypeExpr::Primitive(kind) => {
                let ts_type = converter.map_kind(*kind, field, type_name)?;
                builder.add_simple_array_field(field, ts_type);
                Ok(Vec::new())
            }
            TypeExpr::Slice(_) | TypeExpr::Map(..) | TypeExpr::Pointer(_) => {
                Err(CodegenError::unsupported(
                    field,
                    type_name,
                    "collections nested inside a sequence are not supported",
                ))
            }
        }
    }

    /// Adds a `{[key: K]: V}` field.
    ///
    /// The key type comes from the key's primitive kind alone, so a map keyed
    /// by a derived enum gets `number` keys even though serde writes such
    /// keys as the variant strings.
    fn add_map_field(
        &mut self,
        builder: &mut ClassBuilder<'_>,
        field: &str,
        key: &TypeExpr,
        value: &TypeExpr,
    ) -> Result<Vec<String>, CodegenError> {
        let converter = self.converter;
        let key_type = self.primitive_kind_of(key).and_then(|kind| converter.mapper.map(kind));
        let key_type = key_type.unwrap_or("string");

        let (value_type, blocks) = match value.deref() {
            TypeExpr::Named(value_key) if converter.date_types.contains(value_key) => {
                ("Date".to_string(), Vec::new())
            }
            TypeExpr::Named(value_key) => {
                let def = converter.types.resolve(value_key)?;
                if def.is_struct() || def.enum_renderer().is_some() {
                    let blocks = self.emit(value_key)?;
                    (converter.reference_name(def), blocks)
                } else {
                    (self.mapped_or_any(value), Vec::new())
                }
            }
            _ => (self.mapped_or_any(value), Vec::new()),
        };

        builder.add_simple_field(field, &format!("{{[key: {key_type}]: {value_type}}}"));
        Ok(blocks)
    }

    /// Kind of a primitive or named primitive expression.
    fn primitive_kind_of(&self, expr: &TypeExpr) -> Option<PrimitiveKind> {
        match expr.deref() {
            TypeExpr::Primitive(kind) => Some(*kind),
            TypeExpr::Named(key) => match self.converter.types.get(key)?.kind {
                TypeDefKind::Primitive { kind, .. } => Some(kind),
                TypeDefKind::Struct(_) => None,
            },
            _ => None,
        }
    }

    fn mapped_or_any(&self, expr: &TypeExpr) -> String {
        self.primitive_kind_of(expr)
            .filter(|kind| *kind != PrimitiveKind::Any)
            .and_then(|kind| self.converter.mapper.map(kind))
            .unwrap_or("any")
            .to_string()
    }
}

/// Collects the fields of `def` with embedded structs flattened in place.
fn flatten_fields<'t>(types: &'t TypeSet, def: &'t TypeDef) -> Vec<&'t FieldDef> {
    let mut fields = Vec::new();
    let mut stack = vec![&def.key];
    collect_fields(types, def, &mut stack, &mut fields);
    fields
}

fn collect_fields<'t>(
    types: &'t TypeSet,
    def: &'t TypeDef,
    stack: &mut Vec<&'t TypeKey>,
    fields: &mut Vec<&'t FieldDef>,
) {
    for field in def.fields() {
        if field.embedded {
            if let TypeExpr::Named(key) = field.ty.deref() {
                if let Some(inner) = types.get(key).filter(|inner| inner.is_struct()) {
                    if !stack.contains(&key) {
                        stack.push(key);
                        collect_fields(types, inner, stack, fields);
                        stack.pop();
                    }
                    continue;
                }
            }
        }
        fields.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use tsbridge_derive::Describe;

    #[derive(Describe)]
    struct Address {
        duration: f64,
        #[ts(rename = "text")]
        text1: String,
        #[ts(rename = "")]
        text2: String,
        #[ts(skip)]
        text3: String,
    }

    #[derive(Describe)]
    struct Dummy {
        something: String,
        some_interface: serde_json::Value,
    }

    #[derive(Describe)]
    struct HasName {
        name: String,
    }

    #[derive(Describe)]
    struct Person {
        #[ts(flatten)]
        has_name: HasName,
        nicknames: Vec<String>,
        addresses: Vec<Address>,
        #[ts(rename = "a")]
        dummy: Dummy,
        #[ts(rename = "b")]
        ptr: Option<Box<Dummy>>,
        slice_ptr: Vec<Box<Dummy>>,
        map: HashMap<String, Box<Dummy>>,
        birthday: DateTime<Utc>,
    }

    #[derive(Describe)]
    struct Shipment {
        statuses: HashMap<String, DateTime<Utc>>,
    }

    #[derive(Describe)]
    #[ts(rename = "Item")]
    struct Measurement {
        name: String,
        number: f64,
    }

    #[derive(Describe)]
    #[repr(u8)]
    enum Status {
        #[ts(rename = "active")]
        Active = 1,
        #[ts(rename = "on-hold")]
        OnHold = 3,
    }

    #[derive(Describe)]
    struct Account {
        status: Status,
        history: Vec<Status>,
        by_day: HashMap<String, Status>,
    }

    #[derive(Describe)]
    struct Node {
        label: String,
        children: Vec<Node>,
        parent: Option<Box<Node>>,
    }

    #[derive(Describe)]
    struct Payload {
        value: serde_json::Value,
        values: Vec<serde_json::Value>,
        by_name: HashMap<String, serde_json::Value>,
    }

    #[derive(Describe)]
    struct Roster {
        by_status: HashMap<Status, String>,
    }

    #[derive(Describe)]
    struct Inner {
        a: i32,
    }

    #[derive(Describe)]
    struct Middle {
        #[ts(flatten)]
        inner: Inner,
        b: i32,
    }

    #[derive(Describe)]
    struct Outer {
        #[serde(flatten)]
        middle: Box<Middle>,
        c: i32,
    }

    #[derive(Describe)]
    struct Letter {
        initial: char,
    }

    #[derive(Describe)]
    struct Grid {
        cells: Vec<Vec<i32>>,
    }

    const PERSON_GRAPH: &str = "export class Dummy {
    something: string;
    some_interface: any;
}

export class Address {
    duration: number;
    text: string;
}

export class Person {
    name: string;
    nicknames: string[];
    addresses: Address[];
    a: Dummy;
    b: Dummy;
    slice_ptr: Dummy[];
    map: {[key: string]: Dummy};
    birthday: Date;
}";

    fn plain() -> Converter {
        Converter::new().create_from_method(false)
    }

    #[test]
    fn test_dependencies_precede_their_first_use() {
        let mut converter = plain();
        converter.add::<Person>();
        assert_eq!(converter.convert(None).expect("convert"), PERSON_GRAPH);
    }

    #[test]
    fn test_double_registration_emits_once() {
        let mut converter = plain();
        converter.add::<Person>().add::<Person>();
        assert_eq!(converter.convert(None).expect("convert"), PERSON_GRAPH);
    }

    #[test]
    fn test_add_value_registers_its_type() {
        let dummy = Dummy {
            something: String::new(),
            some_interface: serde_json::Value::Null,
        };
        let mut converter = plain();
        converter.add::<Person>().add_value(&dummy);
        assert_eq!(converter.convert(None).expect("convert"), PERSON_GRAPH);
    }

    #[test]
    fn test_prefix_on_independent_roots() {
        let mut converter = plain().prefix("test_");
        converter.add::<Address>().add::<Dummy>();

        let expected = "export class test_Address {
    duration: number;
    text: string;
}

export class test_Dummy {
    something: string;
    some_interface: any;
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_prefix_and_suffix_on_references() {
        let mut converter = plain().prefix("I").suffix("Dto");
        converter.add::<Person>();
        let code = converter.convert(None).expect("convert");

        assert!(code.contains("export class IDtoAddress {"));
        assert!(code.contains("    addresses: Address[];\n"));
        assert!(code.contains("    a: Dummy;\n"));
        assert!(code.contains("    map: {[key: string]: Dummy};\n"));
    }

    #[test]
    fn test_references_use_base_names() {
        let mut converter = Converter::new().prefix("test_");
        converter.add::<Person>();
        let code = converter.convert(None).expect("convert");

        assert!(code.contains("export class test_Person {"));
        assert!(code.contains("    a: Dummy;\n"));
        assert!(code.contains("        result.a = source[\"a\"] ? Dummy.createFrom(source[\"a\"]) : null;\n"));
        assert!(code.contains("        let result = new test_Person();\n"));
    }

    #[test]
    fn test_prefixed_references() {
        let mut converter = Converter::new()
            .prefix("I")
            .suffix("Dto")
            .prefixed_references(true);
        converter.add::<Person>().add::<Account>();
        let code = converter.convert(None).expect("convert");

        assert!(code.contains("    addresses: IDtoAddress[];\n"));
        assert!(code.contains("    map: {[key: string]: IDtoDummy};\n"));
        assert!(code.contains("return IDtoAddress.createFrom(element);"));
        assert!(code.contains("    history: IDtoStatus[];\n"));
    }

    #[test]
    fn test_separate_calls_do_not_share_state() {
        let mut converter = plain().prefix("test_");
        converter.add::<Address>();
        let first = converter.convert(None).expect("convert");
        let second = converter.convert(None).expect("convert");

        assert_eq!(first, second);
        assert!(first.starts_with("export class test_Address {"));
    }

    #[test]
    fn test_concurrent_conversions() {
        let mut converter = Converter::new();
        converter.add::<Person>().add::<Account>();
        let expected = converter.convert(None).expect("convert");

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| converter.convert(None).expect("convert")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().expect("thread"), expected);
            }
        });
    }

    #[test]
    fn test_interface_without_factory() {
        let mut converter = plain().use_interface(true);
        converter.add::<Measurement>();

        let expected = "export interface Item {
    name: string;
    number: number;
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_interface_never_has_factory() {
        let mut converter = Converter::new().use_interface(true);
        converter.add::<Person>();
        assert!(!converter.convert(None).expect("convert").contains("createFrom"));
    }

    #[test]
    fn test_map_of_dates() {
        let mut converter = plain();
        converter.add::<Shipment>();

        let expected = "export class Shipment {
    statuses: {[key: string]: Date};
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_date_fields_emit_no_block() {
        let mut converter = plain();
        converter.add::<Person>().add::<DateTime<Utc>>();
        let code = converter.convert(None).expect("convert");

        assert!(code.contains("    birthday: Date;\n"));
        assert!(!code.contains("class DateTime"));
    }

    #[test]
    fn test_custom_date_type() {
        let mut converter = plain().date_type::<Dummy>();
        converter.add::<Person>();
        let code = converter.convert(None).expect("convert");

        assert!(code.contains("    a: Date;\n"));
        assert!(code.contains("    slice_ptr: Date[];\n"));
        assert!(!code.contains("class Dummy"));
    }

    #[test]
    fn test_create_from_method() {
        let mut converter = Converter::new().indent("  ");
        converter.add::<Person>();
        let code = converter.convert(None).expect("convert");

        let person = "  static createFrom(source: any) {
    let result = new Person();
    result.name = source[\"name\"];
    result.nicknames = source[\"nicknames\"];
    result.addresses = source[\"addresses\"] ? source[\"addresses\"].map(function(element) { return Address.createFrom(element); }) : null;
    result.a = source[\"a\"] ? Dummy.createFrom(source[\"a\"]) : null;
    result.b = source[\"b\"] ? Dummy.createFrom(source[\"b\"]) : null;
    result.slice_ptr = source[\"slice_ptr\"] ? source[\"slice_ptr\"].map(function(element) { return Dummy.createFrom(element); }) : null;
    result.map = source[\"map\"];
    result.birthday = source[\"birthday\"] ? new Date(source[\"birthday\"]) : null;
    return result;
  }
}";
        assert!(code.ends_with(person), "{code}");
        assert!(code.contains("    let result = new Dummy();\n"));
    }

    #[test]
    fn test_enum_fields() {
        let mut converter = plain().export(false);
        converter.add::<Account>();

        let expected = "enum Status {
    Active = 'active',
    OnHold = 'on-hold',
}

class Account {
    status: Status;
    history: Status[];
    by_day: {[key: string]: Status};
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_enum_root_has_no_factory() {
        let mut converter = Converter::new();
        converter.add::<Status>();
        let code = converter.convert(None).expect("convert");

        assert!(code.starts_with("export enum Status {\n"));
        assert!(!code.contains("createFrom"));
    }

    #[test]
    fn test_nested_embedding_is_flattened_depth_first() {
        let mut converter = plain();
        converter.add::<Outer>();

        let expected = "export class Outer {
    a: number;
    b: number;
    c: number;
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_cyclic_type_emits_once() {
        let mut converter = plain();
        converter.add::<Node>();

        let expected = "export class Node {
    label: string;
    children: Node[];
    parent: Node;
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_unmapped_kind_is_an_error() {
        let mut converter = Converter::new();
        converter.add::<Letter>();
        let err = converter.convert(None).unwrap_err();

        assert!(matches!(
            err,
            CodegenError::UnmappedPrimitiveKind {
                kind: PrimitiveKind::Char,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "cannot find type 'char' for field 'initial' of 'Letter'"
        );
    }

    #[test]
    fn test_custom_mapper() {
        let mapper = TypeMapper::new().with_mapping(PrimitiveKind::Char, "string");
        let mut converter = plain().mapper(mapper);
        converter.add::<Letter>();
        assert!(
            converter
                .convert(None)
                .expect("convert")
                .contains("    initial: string;\n")
        );
    }

    #[test]
    fn test_any_ignores_the_mapper() {
        let mapper = TypeMapper::new().without_mapping(PrimitiveKind::Any);
        let mut converter = plain().mapper(mapper);
        converter.add::<Payload>();

        let expected = "export class Payload {
    value: any;
    values: any[];
    by_name: {[key: string]: any};
}";
        assert_eq!(converter.convert(None).expect("convert"), expected);
    }

    #[test]
    fn test_enum_keys_map_to_their_kind() {
        let mut converter = plain();
        converter.add::<Roster>();
        let code = converter.convert(None).expect("convert");

        assert!(code.contains("    by_status: {[key: number]: string};\n"));
        assert!(!code.contains("enum Status"));
    }

    #[test]
    fn test_nested_collections_are_unsupported() {
        let mut converter = Converter::new();
        converter.add::<Grid>();
        assert!(matches!(
            converter.convert(None),
            Err(CodegenError::UnsupportedField { .. })
        ));
    }

    #[test]
    fn test_primitive_roots_emit_nothing() {
        let mut types = TypeSet::new();
        types
            .insert(TypeDef::primitive(
                TypeKey::new("Email"),
                "Email",
                PrimitiveKind::String,
            ))
            .expect("insert");

        let mut converter = Converter::new();
        converter.add::<i32>();
        converter.add_types(types).add_type(TypeKey::new("Email"));

        assert_eq!(converter.roots(), &[TypeKey::new("Email")]);
        assert_eq!(converter.convert(None).expect("convert"), "");
    }

    #[test]
    fn test_unknown_root() {
        let mut converter = Converter::new();
        converter.add_type(TypeKey::new("Missing"));
        assert!(matches!(
            converter.convert(None),
            Err(CodegenError::Core(tsbridge_core::Error::UnknownType { .. }))
        ));
    }

    #[test]
    fn test_custom_code_regions() {
        let mut converter = plain();
        converter.add::<Address>().add::<Status>();

        let mut custom = CustomCode::new();
        custom.insert("Address".to_string(), "    label() { return this.text; }".to_string());
        let code = converter.convert(Some(&custom)).expect("convert");

        let expected = "export class Address {
    duration: number;
    text: string;
    //[Address:]
    label() { return this.text; }
    //[end]
}

export enum Status {
    Active = 'active',
    OnHold = 'on-hold',
    //[Status:]
    //[end]
}";
        assert_eq!(code, expected);
        assert_eq!(crate::custom::parse_custom_code(&code), {
            let mut regions = custom.clone();
            regions.insert("Status".to_string(), String::new());
            regions
        });
    }

    #[test]
    fn test_convert_to_file_preserves_custom_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("models.ts");
        let mut converter = plain().without_backup();
        converter.add::<Address>();

        converter.convert_to_file(&path).expect("first write");
        let first = std::fs::read_to_string(&path).expect("read");
        assert!(first.starts_with(crate::output::GENERATED_HEADER));
        assert!(first.ends_with("}\n"));

        let edited = first.replace(
            "    //[Address:]\n",
            "    //[Address:]\n    hello() { return 1; }\n",
        );
        std::fs::write(&path, &edited).expect("edit");

        converter.convert_to_file(&path).expect("second write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), edited);
        assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn test_convert_to_file_writes_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("models.ts");
        std::fs::write(&path, "previous").expect("write");

        let mut converter = plain().backup_extension("bak");
        converter.add::<Dummy>();
        converter.convert_to_file(&path).expect("write");

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "bak"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).expect("read"), "previous");
    }

    #[test]
    fn test_failed_conversion_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("models.ts");
        std::fs::write(&path, "previous").expect("write");

        let mut converter = Converter::new();
        converter.add::<Letter>();
        assert!(converter.convert_to_file(&path).is_err());

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "previous");
        assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 1);
    }
}
