//! Enumeration member discovery and naming.
//!
//! Integer types carry no list of their named values, only a renderer, so
//! members are discovered by probing: every value in
//! `0..ENUM_PROBE_CEILING` is rendered and any render that does not look
//! like the `Name(<n>)` fallback becomes a member.

use regex::Regex;
use std::sync::LazyLock;
use tsbridge_core::EnumRenderer;

/// Exclusive upper bound of the probed values.
pub const ENUM_PROBE_CEILING: i64 = 10_000;

static NUMBER_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z])(\d+)([a-zA-Z]?)").expect("valid pattern"));

/// One discovered enumeration member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Raw probed value.
    pub value: i64,
    /// Rendered string, used as the member's literal value.
    pub rendered: String,
}

impl EnumMember {
    /// Member identifier derived from the rendered string.
    #[must_use]
    pub fn identifier(&self) -> String {
        to_pascal_case(&self.rendered)
    }

    /// Renders the member line, e.g. `    Active = 'active',`.
    #[must_use]
    pub fn line(&self, indent: &str) -> String {
        let literal = self.rendered.replace('\\', "\\\\").replace('\'', "\\'");
        format!("{indent}{} = '{literal}',\n", self.identifier())
    }
}

/// Probes `renderer` for named values.
#[must_use]
pub fn probe_members(renderer: &EnumRenderer) -> Vec<EnumMember> {
    (0..ENUM_PROBE_CEILING)
        .filter_map(|value| {
            let rendered = renderer.render(value);
            if rendered.contains(&format!("({value})")) {
                None
            } else {
                Some(EnumMember { value, rendered })
            }
        })
        .collect()
}

/// Converts a rendered value to an initial-capital identifier.
///
/// Digit runs become word boundaries, `_`, `-` and spaces capitalize the
/// following letter and any other character is dropped.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let spaced = NUMBER_SEQUENCE.replace_all(s, "$1 $2 $3");
    let mut result = String::with_capacity(spaced.len());
    let mut capitalize_next = true;

    for c in spaced.trim_matches(' ').chars() {
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            result.push(c);
        } else if c.is_ascii_lowercase() {
            result.push(if capitalize_next {
                c.to_ascii_uppercase()
            } else {
                c
            });
        }
        capitalize_next = matches!(c, '_' | ' ' | '-');
    }

    result
}
