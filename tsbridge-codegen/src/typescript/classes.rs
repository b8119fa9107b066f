//! Class and interface body generation.

/// Accumulates the field lines of one type together with the body of its
/// `createFrom` factory.
#[derive(Debug)]
pub struct ClassBuilder<'a> {
    indent: &'a str,
    fields: String,
    create_from: String,
}

impl<'a> ClassBuilder<'a> {
    /// Creates a new builder using `indent` for one nesting level.
    #[must_use]
    pub fn new(indent: &'a str) -> Self {
        Self {
            indent,
            fields: String::new(),
            create_from: String::new(),
        }
    }

    fn push_field(&mut self, name: &str, ts_type: &str) {
        self.fields
            .push_str(&format!("{}{name}: {ts_type};\n", self.indent));
    }

    fn push_assignment(&mut self, name: &str, value: &str) {
        let indent = self.indent;
        self.create_from
            .push_str(&format!("{indent}{indent}result.{name} = {value};\n"));
    }

    /// Adds a field copied as-is from the source object.
    pub fn add_simple_field(&mut self, name: &str, ts_type: &str) {
        self.push_field(name, ts_type);
        self.push_assignment(name, &format!("source[\"{name}\"]"));
    }

    /// Adds an array of primitives, copied as-is.
    pub fn add_simple_array_field(&mut self, name: &str, ts_type: &str) {
        self.add_simple_field(name, &format!("{ts_type}[]"));
    }

    /// Adds a field holding a nested class instance.
    pub fn add_struct_field(&mut self, name: &str, ts_type: &str) {
        self.push_field(name, ts_type);
        self.push_assignment(
            name,
            &format!("source[\"{name}\"] ? {ts_type}.createFrom(source[\"{name}\"]) : null"),
        );
    }

    /// Adds an array of nested class instances.
    pub fn add_array_of_structs_field(&mut self, name: &str, ts_type: &str) {
        self.push_field(name, &format!("{ts_type}[]"));
        self.push_assignment(
            name,
            &format!(
                "source[\"{name}\"] ? source[\"{name}\"].map(function(element) {{ return {ts_type}.createFrom(element); }}) : null"
            ),
        );
    }

    /// Adds a date field, revived from its serialized form.
    pub fn add_date_field(&mut self, name: &str) {
        self.push_field(name, "Date");
        self.push_assignment(
            name,
            &format!("source[\"{name}\"] ? new Date(source[\"{name}\"]) : null"),
        );
    }

    /// Adds an array of dates.
    pub fn add_date_array_field(&mut self, name: &str) {
        self.push_field(name, "Date[]");
        self.push_assignment(
            name,
            &format!(
                "source[\"{name}\"] ? source[\"{name}\"].map(function(element) {{ return new Date(element); }}) : null"
            ),
        );
    }

    /// Returns the accumulated field lines.
    #[must_use]
    pub fn fields(&self) -> &str {
        &self.fields
    }

    /// Renders the static `createFrom` factory of `class_name`.
    #[must_use]
    pub fn create_from_method(&self, class_name: &str) -> String {
        let indent = self.indent;
        let mut output = String::new();
        output.push_str(&format!("\n{indent}static createFrom(source: any) {{\n"));
        output.push_str(&format!(
            "{indent}{indent}let result = new {class_name}();\n"
        ));
        output.push_str(&self.create_from);
        output.push_str(&format!("{indent}{indent}return result;\n"));
        output.push_str(&format!("{indent}}}\n"));
        output
    }
}
