//! JIDL converter: render a schema as the human-readable interface
//! definition language and parse it back.
//!
//! The emit direction lays fields out in fixed columns (id, name, type) with
//! the description as a trailing `//` comment. The parse direction is a
//! single-pass, line-oriented state machine: each line is classified as a
//! meta entry, a type definition, or a field/item of the most recently
//! opened type; a blank line, a `}` line, a non-field line, or end of input
//! closes the open field accumulator and runs the deferred tagid cleanup.
//!
//! ```text
//!    title: "Personnel"
//!    roots: ["Person"]
//!
//! Person = Record                                    // An individual
//!    1 name         String
//!    2 id           Integer                          // employee number
//!    3 email        String /email optional
//! ```
//!
//! For positional types (`Array`, or any type carrying the `id` option) the
//! name column is omitted and the field name travels in the description as
//! `name:: description`.

use crate::ast::{BaseType, FieldDef, Schema, TypeDefinition};
use crate::error::{Result, SchemaError};
use crate::options::{
    field_to_parts, parse_type_string, parts_to_field, resolve_tag_names, type_to_string,
    TypeOptions,
};
use crate::registry::META_ORDER;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

/// Column layout for [`dumps_with`]. Override individual fields over
/// [`Default`]; `page` truncates whole emitted lines to a hard character
/// count (no word wrapping).
#[derive(Debug, Clone)]
pub struct ColumnWidths {
    pub meta: usize,
    pub id: usize,
    pub name: usize,
    pub typestr: usize,
    pub page: Option<usize>,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        ColumnWidths {
            meta: 12,
            id: 4,
            name: 12,
            typestr: 35,
            page: None,
        }
    }
}

fn clip(s: String, page: Option<usize>) -> String {
    match page {
        Some(p) => s.chars().take(p).collect(),
        None => s,
    }
}

/// Render a schema as JIDL text with the default column layout.
pub fn dumps(schema: &Schema) -> Result<String> {
    dumps_with(schema, &ColumnWidths::default())
}

/// Render a schema as JIDL text. Meta entries come first, preferred keys in
/// fixed order and remaining keys in schema order; each type follows as a
/// header line plus one line per field.
pub fn dumps_with(schema: &Schema, w: &ColumnWidths) -> Result<String> {
    let mut text = String::new();
    for key in META_ORDER {
        if let Some(v) = schema.meta.get(key) {
            meta_line(&mut text, key, v, w)?;
        }
    }
    for (key, v) in &schema.meta {
        if !META_ORDER.contains(&key.as_str()) {
            meta_line(&mut text, key, v, w)?;
        }
    }

    let wt = w.id + w.name + w.typestr;
    for td in &schema.types {
        let tdef = format!("{} = {}", td.name, type_to_string(td.base_type, &td.type_options)?);
        let tdesc = if td.description.is_empty() {
            String::new()
        } else {
            format!("// {}", td.description)
        };
        let header = clip(format!("{tdef:<wt$}{tdesc}"), w.page);
        text.push('\n');
        text.push_str(header.trim_end());
        text.push('\n');

        let idt = td.base_type == BaseType::Array || TypeOptions::parse(&td.type_options)?.id;
        for fd in &td.fields {
            let (mut fname, mut fdef, fmult, mut fdesc) = field_to_parts(fd, td)?;
            let (fs, wf);
            if td.base_type == BaseType::Enumerated {
                if idt {
                    fdesc = embed_name(&fname, &fdesc);
                    fname.clear();
                }
                fs = format!("{:>iw$} {fname}", fd.id(), iw = w.id);
                wf = w.id + w.name + 2;
            } else {
                match fmult.as_str() {
                    "1" => {}
                    "0..1" => fdef.push_str(" optional"),
                    _ => fdef.push_str(&format!(" [{fmult}]")),
                }
                if idt {
                    fdesc = embed_name(&fname, &fdesc);
                    fname.clear();
                }
                let wn = if idt { 0 } else { w.name };
                fs = format!("{:>iw$} {fname:<wn$} {fdef}", fd.id(), iw = w.id);
                wf = if idt { w.id + w.typestr } else { wt };
            }
            let fdesc = if fdesc.is_empty() { fdesc } else { format!("// {fdesc}") };
            let line = clip(format!("{fs:<wf$}{fdesc}"), w.page);
            text.push_str(line.trim_end());
            text.push('\n');
        }
    }
    Ok(text)
}

fn meta_line(text: &mut String, key: &str, value: &Value, w: &ColumnWidths) -> Result<()> {
    let json = serde_json::to_string(value)?;
    text.push_str(&clip(format!("{key:>mw$}: {json}", mw = w.meta), w.page));
    text.push('\n');
    Ok(())
}

fn embed_name(name: &str, desc: &str) -> String {
    if name.is_empty() {
        desc.to_string()
    } else if desc.is_empty() {
        format!("{name}::")
    } else {
        format!("{name}:: {desc}")
    }
}

fn split_name(desc: &str) -> (String, String) {
    match desc.split_once("::") {
        Some((name, rest)) => (name.trim().to_string(), rest.trim().to_string()),
        None => (String::new(), desc.to_string()),
    }
}

lazy_static! {
    static ref META: Regex = Regex::new(r"^\s*([-\w]+):\s*(.+?)\s*$").expect("meta pattern");
    static ref TYPEDEF: Regex =
        Regex::new(r"^\s*([-$\w]+)\s*=\s*(.*?)\s*\{?(?:\s*//\s*(.*?)\s*)?$").expect("type pattern");
    static ref ENUM_ITEM: Regex =
        Regex::new(r"^\s*(\d+)(?:\s+([-.$\w]+))?\s*,?\s*(?://\s*(.*?)\s*)?$").expect("item pattern");
    static ref FIELD_NAMED: Regex = Regex::new(
        r"^\s*(\d+)\s+([-:$\w]+/?)?\s*(.*?),?\s*(?:\[([.*\d]+)\]|(optional))?,?\s*(?://\s*(.*?)\s*)?$"
    )
    .expect("field pattern");
    static ref FIELD_POSITIONAL: Regex = Regex::new(
        r"^\s*(\d+)()\s*(.*?),?\s*(?:\[([.*\d]+)\]|(optional))?,?\s*(?://\s*(.*?)\s*)?$"
    )
    .expect("positional field pattern");
}

enum JidlLine {
    Meta(String, Value),
    Type(TypeDefinition),
    Field(FieldDef),
}

fn classify(line: &str, line_no: usize, current: Option<&TypeDefinition>) -> Result<JidlLine> {
    if let Some(m) = META.captures(line) {
        let value: Value = serde_json::from_str(&m[2]).map_err(|e| {
            SchemaError::Grammar(format!("line {line_no}: bad meta value for {}: {e}", &m[1]))
        })?;
        return Ok(JidlLine::Meta(m[1].to_string(), value));
    }

    if let Some(m) = TYPEDEF.captures(line) {
        let (base_name, topts, fopts) = parse_type_string(&m[2])?;
        if !fopts.is_empty() {
            return Err(SchemaError::Grammar(format!(
                "line {line_no}: field options not allowed in a type definition"
            )));
        }
        let name = m[1].to_string();
        let base_type = BaseType::from_name(&base_name).ok_or_else(|| {
            SchemaError::Semantic(format!("invalid base type {name}: {base_name}"))
        })?;
        return Ok(JidlLine::Type(TypeDefinition {
            name,
            base_type,
            type_options: topts,
            description: m.get(3).map_or(String::new(), |d| d.as_str().to_string()),
            fields: Vec::new(),
        }));
    }

    let Some(td) = current else {
        return Err(SchemaError::Grammar(format!(
            "line {line_no}: field outside a type definition: {line:?}"
        )));
    };
    let idt = td.base_type == BaseType::Array || TypeOptions::parse(&td.type_options)?.id;

    if td.base_type == BaseType::Enumerated {
        if let Some(m) = ENUM_ITEM.captures(line) {
            let id: i64 = parse_id(&m[1], line_no)?;
            let mut value = m.get(2).map_or(String::new(), |v| v.as_str().to_string());
            let mut desc = m.get(3).map_or(String::new(), |d| d.as_str().to_string());
            if idt {
                let (name, rest) = split_name(&desc);
                if !name.is_empty() {
                    (value, desc) = (name, rest);
                }
            }
            return Ok(JidlLine::Field(parts_to_field(id, &value, "", "", &desc)?));
        }
    } else {
        let pattern: &Regex = if idt { &FIELD_POSITIONAL } else { &FIELD_NAMED };
        if let Some(m) = pattern.captures(line) {
            let id: i64 = parse_id(&m[1], line_no)?;
            let mut name = m.get(2).map_or(String::new(), |n| n.as_str().to_string());
            let typestr = m.get(3).map_or("", |t| t.as_str());
            let mult = if m.get(5).is_some() {
                "0..1".to_string()
            } else {
                m.get(4).map_or(String::new(), |r| r.as_str().to_string())
            };
            let mut desc = m.get(6).map_or(String::new(), |d| d.as_str().to_string());
            if idt {
                let (embedded, rest) = split_name(&desc);
                if !embedded.is_empty() {
                    (name, desc) = (embedded, rest);
                }
            }
            return Ok(JidlLine::Field(parts_to_field(id, &name, typestr, &mult, &desc)?));
        }
    }

    Err(SchemaError::Grammar(format!("line {line_no}: {line:?}")))
}

fn parse_id(digits: &str, line_no: usize) -> Result<i64> {
    digits
        .parse()
        .map_err(|_| SchemaError::Grammar(format!("line {line_no}: field id out of range")))
}

/// Parse JIDL text into a schema. Strictly sequential, no backtracking
/// across lines; the first unrecognized line aborts the whole parse.
/// The result is not checked; run it through [`crate::check`].
pub fn loads(text: &str) -> Result<Schema> {
    let mut meta = Map::new();
    let mut types: Vec<TypeDefinition> = Vec::new();
    let mut open = false;

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "}" {
            close_fields(&mut types, &mut open)?;
            continue;
        }
        match classify(line, line_no, types.last())? {
            JidlLine::Field(fd) => {
                if !open {
                    return Err(SchemaError::Grammar(format!(
                        "line {line_no}: field after the type definition was closed: {line:?}"
                    )));
                }
                // `open` implies a current type exists.
                if let Some(td) = types.last_mut() {
                    td.fields.push(fd);
                }
            }
            JidlLine::Meta(key, value) => {
                close_fields(&mut types, &mut open)?;
                meta.insert(key, value);
            }
            JidlLine::Type(td) => {
                close_fields(&mut types, &mut open)?;
                types.push(td);
                open = true;
            }
        }
    }
    close_fields(&mut types, &mut open)?;
    Ok(Schema { meta, types })
}

fn close_fields(types: &mut [TypeDefinition], open: &mut bool) -> Result<()> {
    if *open {
        if let Some(td) = types.last_mut() {
            resolve_tag_names(&mut td.fields)?;
        }
        *open = false;
    }
    Ok(())
}
