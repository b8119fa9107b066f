//! Preservation of hand-written code inside generated files.
//!
//! Every generated type carries a region delimited by `//[<Name>:]` and
//! `//[end]`. Whatever is written between the markers is read back before
//! regeneration and echoed into the fresh output.

use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Hand-written code keyed by emitted type name.
pub type CustomCode = HashMap<String, String>;

/// End marker of a custom-code region.
pub const END_MARKER: &str = "//[end]";

/// Returns the start marker of the region of `type_name`.
#[must_use]
pub fn start_marker(type_name: &str) -> String {
    format!("//[{type_name}:]")
}

/// Extracts custom-code regions from generated text.
///
/// Interior lines are captured verbatim; trailing whitespace of the whole
/// region is trimmed.
#[must_use]
pub fn parse_custom_code(text: &str) -> CustomCode {
    let mut result = CustomCode::new();
    let mut current: Option<(String, String)> = None;

    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(name) = trimmed
            .strip_prefix("//[")
            .and_then(|rest| rest.strip_suffix(":]"))
        {
            current = Some((name.to_string(), String::new()));
        } else if trimmed == END_MARKER {
            if let Some((name, value)) = current.take() {
                result.insert(name, value.trim_end().to_string());
            }
        } else if let Some((_, value)) = current.as_mut() {
            value.push_str(line);
            value.push('\n');
        }
    }

    result
}

/// Loads custom-code regions from an existing generated file.
///
/// A missing file yields an empty mapping.
///
/// # Errors
/// Returns any IO error other than "not found".
pub fn load_custom_code(path: impl AsRef<Path>) -> io::Result<CustomCode> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_custom_code(&text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(CustomCode::new()),
        Err(err) => Err(err),
    }
}
