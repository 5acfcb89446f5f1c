//! Canonical JSON form: load (parse + check), dump (the JADN house layout
//! with one type definition per line), and file-extension dispatch.

use crate::ast::Schema;
use crate::check::check;
use crate::error::{Result, SchemaError};
use crate::jidl;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Parse a canonical JSON schema document and validate it.
pub fn loads(text: &str) -> Result<Schema> {
    let value: Value = serde_json::from_str(text)?;
    check(Schema::from_value(&value)?)
}

/// Load and validate a `.jadn` file.
pub fn load(path: &Path) -> Result<Schema> {
    loads(&fs::read_to_string(path)?)
}

/// Load and validate a schema file, dispatching the loader on the file
/// extension: `.jadn` is canonical JSON, `.jidl` the textual notation.
pub fn load_any(path: &Path) -> Result<Schema> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jadn") => load(path),
        Some("jidl") => check(jidl::loads(&fs::read_to_string(path)?)?),
        _ => Err(SchemaError::Lookup(path.display().to_string())),
    }
}

/// Serialize to canonical JSON text: scalars and field tuples inline, one
/// type definition per line, a blank line between top-level entries.
pub fn dumps(schema: &Schema) -> String {
    dumps_with(schema, false)
}

/// Like [`dumps`]; `strip` drops the blank separator lines.
pub fn dumps_with(schema: &Schema, strip: bool) -> String {
    dumps_rec(&schema.to_value(), 0, 2, strip)
}

/// Write canonical JSON to a file with a trailing newline.
pub fn dump(schema: &Schema, path: &Path) -> Result<()> {
    fs::write(path, dumps(schema) + "\n")?;
    Ok(())
}

fn dumps_rec(val: &Value, level: usize, indent: usize, strip: bool) -> String {
    let sep2 = if strip { ",\n" } else { ",\n\n" };
    match val {
        Value::Object(map) => {
            let sp = " ".repeat(level * indent);
            let sp2 = " ".repeat((level + 1) * indent);
            let sep = if level > 0 { ",\n" } else { sep2 };
            let lines: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    let key = Value::String(k.clone()).to_string();
                    format!("{sp2}{key}: {}", dumps_rec(v, level + 1, indent, strip))
                })
                .collect();
            format!("{{\n{}\n{sp}}}", lines.join(sep))
        }
        Value::Array(items) => {
            let sep = if level > 1 { ",\n" } else { sep2 };
            // A list of lists (the types array) goes one entry per line;
            // anything else stays on a single line.
            if items.first().is_some_and(Value::is_array) {
                let sp2 = " ".repeat((level + 1) * indent);
                let spn = " ".repeat(level * indent);
                let vals: Vec<String> = items
                    .iter()
                    .map(|v| format!("{sp2}{}", dumps_rec(v, level, indent, strip)))
                    .collect();
                format!("[\n{}\n{spn}]", vals.join(sep))
            } else {
                let vals: Vec<String> = items
                    .iter()
                    .map(|v| dumps_rec(v, level + 1, indent, strip))
                    .collect();
                format!("[{}]", vals.join(", "))
            }
        }
        scalar => scalar.to_string(),
    }
}
