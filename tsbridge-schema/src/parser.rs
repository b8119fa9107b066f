//! Type schema XML parser.
//!
//! This module parses `<typeSchema>` documents into the [`Schema`]
//! representation.
//!
//! ```xml
//! <typeSchema package="people">
//!     <alias name="Email" type="String"/>
//!     <enum name="Status" encodingType="u8">
//!         <value name="active">1</value>
//!         <value name="blocked">2</value>
//!     </enum>
//!     <struct name="Person">
//!         <field name="Name" json="name" type="String"/>
//!         <field name="Status" json="status" type="Status"/>
//!         <field name="Friends" json="friends" type="Vec&lt;Person&gt;"/>
//!     </struct>
//!     <root type="Person"/>
//! </typeSchema>
//! ```

use crate::error::ParseError;
use crate::types::{
    AliasDef, Definition, EnumDef, EnumValue, FieldDecl, Schema, StructDef, TypeRef,
};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;
use tsbridge_core::PrimitiveKind;

/// Parses a type schema from a string.
///
/// # Arguments
/// * `xml` - XML schema content
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid schema elements.
pub fn parse_schema(xml: &str) -> Result<Schema, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut schema: Option<Schema> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parse_element(&mut reader, &mut schema, e, true)?,
            Ok(Event::Empty(ref e)) => parse_element(&mut reader, &mut schema, e, false)?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    schema.ok_or_else(|| ParseError::InvalidStructure {
        message: "No typeSchema element found".to_string(),
    })
}

/// Parses one top-level element; `has_body` is false for empty elements.
fn parse_element(
    reader: &mut Reader<&[u8]>,
    schema: &mut Option<Schema>,
    e: &BytesStart<'_>,
    has_body: bool,
) -> Result<(), ParseError> {
    let name_bytes = e.name().as_ref().to_vec();
    let name = std::str::from_utf8(&name_bytes)?;

    let Some(current) = schema.as_mut() else {
        if name != "typeSchema" {
            return Err(ParseError::unknown_element(name, "document"));
        }
        *schema = Some(parse_type_schema(e)?);
        return Ok(());
    };

    match (name, has_body) {
        ("struct", true) => {
            let def = parse_struct(reader, e)?;
            current.add_definition(Definition::Struct(def))?;
        }
        ("struct", false) => {
            let def = StructDef::new(required_attr(e, "struct", "name")?);
            current.add_definition(Definition::Struct(def))?;
        }
        ("enum", true) => {
            let def = parse_enum(reader, e)?;
            current.add_definition(Definition::Enum(def))?;
        }
        ("enum", false) => {
            return Err(ParseError::InvalidStructure {
                message: "enum without values".to_string(),
            });
        }
        ("alias", _) => {
            current.add_definition(Definition::Alias(parse_alias(e)?))?;
            if has_body {
                skip_element(reader)?;
            }
        }
        ("root", _) => {
            current.add_root(parse_root(e)?);
            if has_body {
                skip_element(reader)?;
            }
        }
        _ => return Err(ParseError::unknown_element(name, "typeSchema")),
    }
    Ok(())
}

/// Reads and parses a type schema file.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, or any error of
/// [`parse_schema`].
pub fn parse_schema_file(path: impl AsRef<Path>) -> Result<Schema, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_schema(&xml)
}

/// Decodes the attributes of an element.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        let value = unescape(value).map_err(quick_xml::Error::from)?;
        attrs.push((key.to_string(), value.into_owned()));
    }
    Ok(attrs)
}

fn required_attr(e: &BytesStart<'_>, element: &str, attribute: &str) -> Result<String, ParseError> {
    attributes(e)?
        .into_iter()
        .find(|(key, _)| key == attribute)
        .map(|(_, value)| value)
        .ok_or_else(|| ParseError::missing_attr(element, attribute))
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

/// Consumes events up to and including the end tag of the current element.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Ok(Event::Eof) => return Ok(()),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

/// Parses the typeSchema element attributes.
fn parse_type_schema(e: &BytesStart<'_>) -> Result<Schema, ParseError> {
    let mut package = String::new();
    let mut description = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "package" => package = value,
            "description" => description = Some(value),
            _ => {}
        }
    }

    let mut schema = Schema::new(package);
    schema.description = description;
    Ok(schema)
}

/// Parses a struct definition and its fields.
fn parse_struct(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<StructDef, ParseError> {
    let mut name = None;
    let mut description = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "description" => description = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("struct", "name"))?;
    let mut struct_def = StructDef::new(name);
    struct_def.description = description;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let field = parse_field_element(e)?;
                skip_element(reader)?;
                struct_def.add_field(field);
            }
            Ok(Event::Empty(ref e)) => {
                struct_def.add_field(parse_field_element(e)?);
            }
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(struct_def)
}

fn parse_field_element(e: &BytesStart<'_>) -> Result<FieldDecl, ParseError> {
    let name_bytes = e.name().as_ref().to_vec();
    let tag_name = std::str::from_utf8(&name_bytes)?;
    if tag_name != "field" {
        return Err(ParseError::unknown_element(tag_name, "struct"));
    }
    parse_field(e)
}

/// Parses a field declaration.
fn parse_field(e: &BytesStart<'_>) -> Result<FieldDecl, ParseError> {
    let mut name = None;
    let mut json = None;
    let mut ty = None;
    let mut skip = false;
    let mut embedded = false;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "json" => json = Some(value),
            "type" => ty = Some(TypeRef::parse(&value)?),
            "skip" => skip = parse_bool("field", "skip", &value)?,
            "embedded" => embedded = parse_bool("field", "embedded", &value)?,
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("field", "name"))?;
    let ty = ty.ok_or_else(|| ParseError::missing_attr("field", "type"))?;

    let mut field = FieldDecl::new(name, json, ty);
    field.skip = skip;
    field.embedded = embedded;
    Ok(field)
}

/// Parses an enum definition.
fn parse_enum(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<EnumDef, ParseError> {
    let mut name = None;
    let mut encoding_type = PrimitiveKind::I32;
    let mut description = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "encodingType" => {
                encoding_type = PrimitiveKind::from_name(&value)
                    .ok_or_else(|| ParseError::invalid_attr("enum", "encodingType", &value))?;
            }
            "description" => description = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("enum", "name"))?;
    let mut enum_def = EnumDef::new(name, encoding_type);
    enum_def.description = description;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                if tag_name != "value" {
                    return Err(ParseError::unknown_element(tag_name, "enum"));
                }
                let value = parse_enum_value(reader, e)?;
                enum_def.add_value(value);
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                return Err(ParseError::InvalidStructure {
                    message: format!("empty <{tag_name}> in enum '{}'", enum_def.name),
                });
            }
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(enum_def)
}

/// Parses an enum value.
fn parse_enum_value(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<EnumValue, ParseError> {
    let name = required_attr(e, "value", "name")?;

    // Read the value content
    let mut buf = Vec::new();
    let mut value_str = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                value_str = std::str::from_utf8(t.as_ref())?.trim().to_string();
            }
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(EnumValue::new(name, value_str))
}

/// Parses an alias (named primitive) definition.
fn parse_alias(e: &BytesStart<'_>) -> Result<AliasDef, ParseError> {
    let name = required_attr(e, "alias", "name")?;
    let ty = required_attr(e, "alias", "type")?;
    let kind = PrimitiveKind::from_name(ty.trim())
        .ok_or_else(|| ParseError::invalid_attr("alias", "type", &ty))?;
    Ok(AliasDef { name, kind })
}

fn parse_root(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(required_attr(e, "root", "type")?.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DateKind;

    const PEOPLE_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<typeSchema package="people" description="Test schema">
    <!-- named primitives -->
    <alias name="Email" type="String"/>
    <enum name="Status" encodingType="u8">
        <value name="active">1</value>
        <value name="blocked">2</value>
    </enum>
    <struct name="Address">
        <field name="City" json="city" type="String"/>
        <field name="Number" json="number" type="f64"/>
    </struct>
    <struct name="Person">
        <field name="Name" json="name" type="String"/>
        <field name="Email" json="email" type="Email"/>
        <field name="Status" json="status" type="Status"/>
        <field name="Address" json="address" type="Option&lt;Address&gt;"/>
        <field name="Born" json="born" type="DateTime"/>
        <field name="Secret" json="secret" type="String" skip="true"/>
        <field name="Internal" type="i32"/>
    </struct>
    <root type="Person"/>
</typeSchema>"#;

    #[test]
    fn test_parse_people_schema() {
        let schema = parse_schema(PEOPLE_SCHEMA).expect("Failed to parse schema");

        assert_eq!(schema.package, "people");
        assert_eq!(schema.description.as_deref(), Some("Test schema"));
        assert_eq!(schema.definitions.len(), 4);
        assert_eq!(schema.roots, vec!["Person"]);
    }

    #[test]
    fn test_parse_struct_fields() {
        let schema = parse_schema(PEOPLE_SCHEMA).expect("Failed to parse schema");
        let Some(Definition::Struct(person)) = schema.get("Person") else {
            panic!("Person should be a struct");
        };

        assert_eq!(person.fields.len(), 7);
        assert_eq!(person.fields[0].json.as_deref(), Some("name"));
        assert_eq!(
            person.fields[3].ty,
            TypeRef::Pointer(Box::new(TypeRef::Named("Address".to_string())))
        );
        assert_eq!(person.fields[4].ty, TypeRef::Date(DateKind::DateTime));
        assert!(person.fields[5].skip);
        assert!(person.fields[6].json.is_none());
    }

    #[test]
    fn test_parse_enum_and_alias() {
        let schema = parse_schema(PEOPLE_SCHEMA).expect("Failed to parse schema");

        let Some(Definition::Enum(status)) = schema.get("Status") else {
            panic!("Status should be an enum");
        };
        assert_eq!(status.encoding_type, PrimitiveKind::U8);
        assert_eq!(status.values.len(), 2);
        assert_eq!(status.get_value("blocked").and_then(EnumValue::as_i64), Some(2));

        let Some(Definition::Alias(email)) = schema.get("Email") else {
            panic!("Email should be an alias");
        };
        assert_eq!(email.kind, PrimitiveKind::String);
    }

    #[test]
    fn test_parse_embedded_field_and_empty_struct() {
        let xml = r#"<typeSchema package="p">
            <struct name="Base"/>
            <struct name="Derived">
                <field name="Base" type="Base" embedded="true"></field>
                <field name="Extra" json="extra" type="bool"/>
            </struct>
        </typeSchema>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");

        let Some(Definition::Struct(derived)) = schema.get("Derived") else {
            panic!("Derived should be a struct");
        };
        assert!(derived.fields[0].embedded);
        assert_eq!(derived.fields[1].name, "Extra");
        assert!(schema.get("Base").is_some_and(Definition::is_struct));
    }

    #[test]
    fn test_missing_type_schema() {
        let err = parse_schema("<?xml version=\"1.0\"?>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_unknown_element() {
        let xml = r#"<typeSchema package="p"><message name="X"/></typeSchema>"#;
        let err = parse_schema(xml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown element 'message' in context 'typeSchema'"
        );
    }

    #[test]
    fn test_missing_field_type() {
        let xml = r#"<typeSchema package="p">
            <struct name="A"><field name="x" json="x"/></struct>
        </typeSchema>"#;
        let err = parse_schema(xml).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingAttribute { ref attribute, .. } if attribute == "type"
        ));
    }

    #[test]
    fn test_invalid_bool_attribute() {
        let xml = r#"<typeSchema package="p">
            <struct name="A"><field name="x" json="x" type="i32" skip="maybe"/></struct>
        </typeSchema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_invalid_alias_target() {
        let xml = r#"<typeSchema package="p"><alias name="A" type="Vec&lt;i32&gt;"/></typeSchema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_duplicate_definition() {
        let xml = r#"<typeSchema package="p">
            <struct name="A"/>
            <alias name="A" type="String"/>
        </typeSchema>"#;
        assert!(matches!(
            parse_schema(xml),
            Err(ParseError::DuplicateDefinition { .. })
        ));
    }

    #[test]
    fn test_parse_schema_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("people.xml");
        std::fs::write(&path, PEOPLE_SCHEMA).expect("write schema");

        let schema = parse_schema_file(&path).expect("Failed to parse schema");
        assert_eq!(schema.package, "people");

        let missing = parse_schema_file(dir.path().join("missing.xml"));
        assert!(matches!(missing, Err(ParseError::Io(_))));
    }
}
