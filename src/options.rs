//! Compact option-string codec and type-expression converter.
//!
//! Type and field options are stored as one-character-marker strings
//! (`"{1"` = minv 1, `"*String"` = vtype String, `"[0"` = minc 0). This
//! module parses them into structured [`TypeOptions`] / [`FieldOptions`]
//! records, encodes them back, and converts whole type expressions and field
//! definitions to and from their JIDL string forms.
//!
//! Marker characters:
//!
//! | type option | marker | | field option | marker |
//! |-------------|--------|-|--------------|--------|
//! | id          | `=`    | | minc         | `[`    |
//! | vtype       | `*`    | | maxc         | `]`    |
//! | ktype       | `+`    | | tagid        | `&`    |
//! | enum        | `#`    | | dir          | `<`    |
//! | pointer     | `>`    | | key          | `K`    |
//! | format      | `/`    | | link         | `L`    |
//! | pattern     | `%`    |
//! | minf / maxf | `y` / `z` |
//! | minv / maxv | `{` / `}` |
//! | unique / set / unordered | `q` / `s` / `b` |
//! | extend      | `X`    |
//! | and / or    | `A` / `O` |

use crate::ast::{BaseType, FieldDef, GenFieldDef, ItemDef, TypeDefinition};
use crate::error::{Result, SchemaError};
use crate::registry::OptKey;
use lazy_static::lazy_static;
use regex::Regex;

/// Structured view of a type-option list. The raw strings remain the stored
/// form; this record exists to be checked and rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOptions {
    pub id: bool,
    pub vtype: Option<String>,
    pub ktype: Option<String>,
    pub enum_type: Option<String>,
    pub pointer_type: Option<String>,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub minf: Option<f64>,
    pub maxf: Option<f64>,
    pub minv: Option<i64>,
    pub maxv: Option<i64>,
    pub unique: bool,
    pub set: bool,
    pub unordered: bool,
    pub extend: bool,
    pub and_type: Option<String>,
    pub or_type: Option<String>,
}

/// Structured view of the field-only options of a field-option list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    pub minc: Option<i64>,
    pub maxc: Option<i64>,
    pub tagid: Option<i64>,
    pub dir: bool,
    pub key: bool,
    pub link: bool,
}

const FIELD_MARKERS: [char; 6] = ['[', ']', '&', '<', 'K', 'L'];

fn split_marker(opt: &str) -> Result<(char, &str)> {
    let mut chars = opt.chars();
    match chars.next() {
        Some(c) => Ok((c, chars.as_str())),
        None => Err(SchemaError::Semantic("empty option string".into())),
    }
}

fn int_value(opt: &str, rest: &str) -> Result<i64> {
    rest.parse()
        .map_err(|_| SchemaError::Semantic(format!("bad integer option value {opt:?}")))
}

fn float_value(opt: &str, rest: &str) -> Result<f64> {
    rest.parse()
        .map_err(|_| SchemaError::Semantic(format!("bad number option value {opt:?}")))
}

impl TypeOptions {
    /// Decode a compact option-string list. Unknown markers and duplicate
    /// keys are rejected.
    pub fn parse(opts: &[String]) -> Result<TypeOptions> {
        fn set_str(slot: &mut Option<String>, key: OptKey, v: &str) -> Result<()> {
            set(slot, key, v.to_string())
        }
        fn set<T>(slot: &mut Option<T>, key: OptKey, v: T) -> Result<()> {
            if slot.is_some() {
                return Err(SchemaError::Semantic(format!("duplicate type option: {key}")));
            }
            *slot = Some(v);
            Ok(())
        }
        fn set_flag(slot: &mut bool, key: OptKey) -> Result<()> {
            if *slot {
                return Err(SchemaError::Semantic(format!("duplicate type option: {key}")));
            }
            *slot = true;
            Ok(())
        }

        let mut o = TypeOptions::default();
        for opt in opts {
            let (marker, rest) = split_marker(opt)?;
            match marker {
                '=' => set_flag(&mut o.id, OptKey::Id)?,
                '*' => set_str(&mut o.vtype, OptKey::Vtype, rest)?,
                '+' => set_str(&mut o.ktype, OptKey::Ktype, rest)?,
                '#' => set_str(&mut o.enum_type, OptKey::Enum, rest)?,
                '>' => set_str(&mut o.pointer_type, OptKey::Pointer, rest)?,
                '/' => set_str(&mut o.format, OptKey::Format, rest)?,
                '%' => set_str(&mut o.pattern, OptKey::Pattern, rest)?,
                'y' => set(&mut o.minf, OptKey::Minf, float_value(opt, rest)?)?,
                'z' => set(&mut o.maxf, OptKey::Maxf, float_value(opt, rest)?)?,
                '{' => set(&mut o.minv, OptKey::Minv, int_value(opt, rest)?)?,
                '}' => set(&mut o.maxv, OptKey::Maxv, int_value(opt, rest)?)?,
                'q' => set_flag(&mut o.unique, OptKey::Unique)?,
                's' => set_flag(&mut o.set, OptKey::Set)?,
                'b' => set_flag(&mut o.unordered, OptKey::Unordered)?,
                'X' => set_flag(&mut o.extend, OptKey::Extend)?,
                'A' => set_str(&mut o.and_type, OptKey::And, rest)?,
                'O' => set_str(&mut o.or_type, OptKey::Or, rest)?,
                _ => {
                    return Err(SchemaError::Semantic(format!("unknown type option {opt:?}")));
                }
            }
        }
        Ok(o)
    }

    /// Keys present in this option set, in canonical marker-table order.
    pub fn keys(&self) -> Vec<OptKey> {
        let mut keys = Vec::new();
        let mut push = |cond: bool, key: OptKey| {
            if cond {
                keys.push(key);
            }
        };
        push(self.id, OptKey::Id);
        push(self.vtype.is_some(), OptKey::Vtype);
        push(self.ktype.is_some(), OptKey::Ktype);
        push(self.enum_type.is_some(), OptKey::Enum);
        push(self.pointer_type.is_some(), OptKey::Pointer);
        push(self.format.is_some(), OptKey::Format);
        push(self.pattern.is_some(), OptKey::Pattern);
        push(self.minf.is_some(), OptKey::Minf);
        push(self.maxf.is_some(), OptKey::Maxf);
        push(self.minv.is_some(), OptKey::Minv);
        push(self.maxv.is_some(), OptKey::Maxv);
        push(self.unique, OptKey::Unique);
        push(self.set, OptKey::Set);
        push(self.unordered, OptKey::Unordered);
        push(self.extend, OptKey::Extend);
        push(self.and_type.is_some(), OptKey::And);
        push(self.or_type.is_some(), OptKey::Or);
        keys
    }

    /// Encode back to compact strings, in canonical marker-table order.
    pub fn to_strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.id {
            out.push("=".into());
        }
        if let Some(v) = &self.vtype {
            out.push(format!("*{v}"));
        }
        if let Some(v) = &self.ktype {
            out.push(format!("+{v}"));
        }
        if let Some(v) = &self.enum_type {
            out.push(format!("#{v}"));
        }
        if let Some(v) = &self.pointer_type {
            out.push(format!(">{v}"));
        }
        if let Some(v) = &self.format {
            out.push(format!("/{v}"));
        }
        if let Some(v) = &self.pattern {
            out.push(format!("%{v}"));
        }
        if let Some(v) = self.minf {
            out.push(format!("y{v}"));
        }
        if let Some(v) = self.maxf {
            out.push(format!("z{v}"));
        }
        if let Some(v) = self.minv {
            out.push(format!("{{{v}"));
        }
        if let Some(v) = self.maxv {
            out.push(format!("}}{v}"));
        }
        if self.unique {
            out.push("q".into());
        }
        if self.set {
            out.push("s".into());
        }
        if self.unordered {
            out.push("b".into());
        }
        if self.extend {
            out.push("X".into());
        }
        if let Some(v) = &self.and_type {
            out.push(format!("A{v}"));
        }
        if let Some(v) = &self.or_type {
            out.push(format!("O{v}"));
        }
        out
    }
}

impl FieldOptions {
    /// Occurrence bounds with defaults applied (`maxc` 0 = unbounded).
    pub fn multiplicity(&self) -> (i64, i64) {
        (self.minc.unwrap_or(1), self.maxc.unwrap_or(1))
    }

    pub fn to_strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(v) = self.minc {
            out.push(format!("[{v}"));
        }
        if let Some(v) = self.maxc {
            out.push(format!("]{v}"));
        }
        if let Some(v) = self.tagid {
            out.push(format!("&{v}"));
        }
        if self.dir {
            out.push("<".into());
        }
        if self.key {
            out.push("K".into());
        }
        if self.link {
            out.push("L".into());
        }
        out
    }
}

/// Split a field-option list into its field-only part and its type-refining
/// part, decoding the former.
pub fn split_field_options(opts: &[String]) -> Result<(FieldOptions, TypeOptions)> {
    let (fopts, topts) = split_field_option_strings(opts)?;
    let mut fo = FieldOptions::default();
    for opt in &fopts {
        let (marker, rest) = split_marker(opt)?;
        match marker {
            '[' => fo.minc = Some(int_value(opt, rest)?),
            ']' => fo.maxc = Some(int_value(opt, rest)?),
            '&' => fo.tagid = Some(int_value(opt, rest)?),
            '<' => fo.dir = true,
            'K' => fo.key = true,
            'L' => fo.link = true,
            _ => unreachable!("split_field_option_strings only passes field markers"),
        }
    }
    Ok((fo, TypeOptions::parse(&topts)?))
}

/// Partition raw option strings by marker class without decoding values.
pub fn split_field_option_strings(opts: &[String]) -> Result<(Vec<String>, Vec<String>)> {
    let mut fopts = Vec::new();
    let mut topts = Vec::new();
    for opt in opts {
        let (marker, _) = split_marker(opt)?;
        if FIELD_MARKERS.contains(&marker) {
            fopts.push(opt.clone());
        } else {
            topts.push(opt.clone());
        }
    }
    Ok((fopts, topts))
}

fn deref_name(v: &str) -> String {
    if let Some(rest) = v.strip_prefix('#') {
        format!("Enum[{rest}]")
    } else if let Some(rest) = v.strip_prefix('>') {
        format!("Pointer[{rest}]")
    } else {
        v.to_string()
    }
}

fn ref_name(v: &str) -> String {
    let v = v.trim();
    if let Some(rest) = v.strip_prefix("Enum[").and_then(|r| r.strip_suffix(']')) {
        format!("#{rest}")
    } else if let Some(rest) = v.strip_prefix("Pointer[").and_then(|r| r.strip_suffix(']')) {
        format!(">{rest}")
    } else {
        v.to_string()
    }
}

fn escape_pattern(p: &str) -> String {
    p.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_pattern(p: &str) -> String {
    let mut out = String::with_capacity(p.len());
    let mut chars = p.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(e @ ('\\' | '"')) => out.push(e),
                Some(e) => {
                    out.push('\\');
                    out.push(e);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Render a type expression (`BaseTypeExpr` in JIDL) from a base type and
/// its option strings, e.g. `MapOf(Channel, String){1..*}` or
/// `String{pattern="^\\d+$"} /uri`.
pub fn type_to_string(base: BaseType, opts: &[String]) -> Result<String> {
    render_typestr(base.as_str(), opts)
}

/// Same as [`type_to_string`] but for any type-name string; field types may
/// name user-defined types that also carry refining options.
pub fn render_typestr(name: &str, opts: &[String]) -> Result<String> {
    let o = TypeOptions::parse(opts)?;
    let mut s = name.to_string();
    if o.id {
        s.push_str(".ID");
    }
    match (&o.ktype, &o.vtype) {
        (Some(k), Some(v)) => s.push_str(&format!("({}, {})", deref_name(k), deref_name(v))),
        (None, Some(v)) => s.push_str(&format!("({})", deref_name(v))),
        (Some(_), None) => {
            return Err(SchemaError::Semantic(format!("{name}: ktype option without vtype")))
        }
        (None, None) => {}
    }
    if let Some(e) = &o.enum_type {
        s.push_str(&format!("(Enum[{e}])"));
    }
    if let Some(p) = &o.pointer_type {
        s.push_str(&format!("(Pointer[{p}])"));
    }
    if let Some(p) = &o.pattern {
        s.push_str(&format!("{{pattern=\"{}\"}}", escape_pattern(p)));
    } else if name == "Number" {
        if o.minf.is_some() || o.maxf.is_some() {
            let lo = o.minf.map_or("*".to_string(), |v| v.to_string());
            let hi = o.maxf.map_or("*".to_string(), |v| v.to_string());
            s.push_str(&format!("{{{lo}..{hi}}}"));
        }
    } else if o.minv.is_some() || o.maxv.is_some() {
        let lo = o.minv.map_or("*".to_string(), |v| v.to_string());
        let hi = o.maxv.map_or("*".to_string(), |v| v.to_string());
        s.push_str(&format!("{{{lo}..{hi}}}"));
    }
    if let Some(f) = &o.format {
        s.push_str(&format!(" /{f}"));
    }
    for (flag, word) in [
        (o.unique, "unique"),
        (o.set, "set"),
        (o.unordered, "unordered"),
        (o.extend, "extend"),
    ] {
        if flag {
            s.push(' ');
            s.push_str(word);
        }
    }
    if let Some(t) = &o.and_type {
        s.push_str(&format!(" and {t}"));
    }
    if let Some(t) = &o.or_type {
        s.push_str(&format!(" or {t}"));
    }
    Ok(s)
}

lazy_static! {
    static ref TYPESTR: Regex = Regex::new(
        r"(?x)^\s*
          ([-$\w]+)                                  # type name
          (\.ID)?                                    # id option
          (?:\(([^)]*)\))?                           # functional option
          (?:\{(.*)\})?                              # range or pattern
          (?:\s*/([-\w]+))?                          # format
          ((?:\s+(?:unique|set|unordered|extend))*)  # keyword options
          (?:\s+(and|or)\s+([-$\w]+))?               # set composition
          \s*$"
    )
    .expect("typestr pattern");
}

/// Parse a type expression into `(type name, type options, field options)`.
/// Field options can only arise from a `TagId[...]` functional option; type
/// definition lines reject them.
pub fn parse_type_string(s: &str) -> Result<(String, Vec<String>, Vec<String>)> {
    let caps = TYPESTR
        .captures(s)
        .ok_or_else(|| SchemaError::Grammar(format!("bad type expression {s:?}")))?;
    let name = caps[1].to_string();
    let mut topts = Vec::new();
    let mut fopts = Vec::new();
    if caps.get(2).is_some() {
        topts.push("=".to_string());
    }
    if let Some(func) = caps.get(3) {
        let body = func.as_str().trim();
        if let Some(inner) = body.strip_prefix("Enum[").and_then(|r| r.strip_suffix(']')) {
            topts.push(format!("#{inner}"));
        } else if let Some(inner) = body.strip_prefix("Pointer[").and_then(|r| r.strip_suffix(']'))
        {
            topts.push(format!(">{inner}"));
        } else if let Some(inner) = body.strip_prefix("TagId[").and_then(|r| r.strip_suffix(']')) {
            fopts.push(format!("&{inner}"));
        } else if let Some((k, v)) = body.split_once(',') {
            topts.push(format!("+{}", ref_name(k)));
            topts.push(format!("*{}", ref_name(v)));
        } else if !body.is_empty() {
            topts.push(format!("*{}", ref_name(body)));
        } else {
            return Err(SchemaError::Grammar(format!("empty option group in {s:?}")));
        }
    }
    if let Some(braces) = caps.get(4) {
        let body = braces.as_str();
        if let Some(pat) = body.strip_prefix("pattern=\"").and_then(|r| r.strip_suffix('"')) {
            topts.push(format!("%{}", unescape_pattern(pat)));
        } else if let Some((lo, hi)) = body.split_once("..") {
            let float = name == "Number";
            let (lo, hi) = (lo.trim(), hi.trim());
            if lo != "*" {
                let marker = if float { 'y' } else { '{' };
                check_bound(s, lo, float)?;
                topts.push(format!("{marker}{lo}"));
            }
            if hi != "*" {
                let marker = if float { 'z' } else { '}' };
                check_bound(s, hi, float)?;
                topts.push(format!("{marker}{hi}"));
            }
        } else {
            return Err(SchemaError::Grammar(format!("bad range or pattern in {s:?}")));
        }
    }
    if let Some(fmt) = caps.get(5) {
        topts.push(format!("/{}", fmt.as_str()));
    }
    if let Some(kws) = caps.get(6) {
        for kw in kws.as_str().split_whitespace() {
            topts.push(
                match kw {
                    "unique" => "q",
                    "set" => "s",
                    "unordered" => "b",
                    "extend" => "X",
                    _ => unreachable!("keyword set fixed by the pattern"),
                }
                .to_string(),
            );
        }
    }
    if let Some(comb) = caps.get(7) {
        let target = &caps[8];
        let marker = if comb.as_str() == "and" { 'A' } else { 'O' };
        topts.push(format!("{marker}{target}"));
    }
    Ok((name, topts, fopts))
}

fn check_bound(expr: &str, bound: &str, float: bool) -> Result<()> {
    let ok = if float {
        bound.parse::<f64>().is_ok()
    } else {
        bound.parse::<i64>().is_ok()
    };
    if ok {
        Ok(())
    } else {
        Err(SchemaError::Grammar(format!("bad range bound {bound:?} in {expr:?}")))
    }
}

/// Convert a field definition to its JIDL display parts:
/// `(name, type expression, multiplicity, description)`. Enumerated items
/// yield an empty type expression and multiplicity. A `tagid` option is
/// rendered as `TagId[...]` naming the referenced sibling field.
pub fn field_to_parts(fd: &FieldDef, td: &TypeDefinition) -> Result<(String, String, String, String)> {
    match fd {
        FieldDef::Item(item) => Ok((item.value.clone(), String::new(), String::new(), item.description.clone())),
        FieldDef::Field(f) => {
            let (fo, _) = split_field_options(&f.options)?;
            let (_, topts) = split_field_option_strings(&f.options)?;
            let mut typestr = render_typestr(&f.field_type, &topts)?;
            if let Some(tag) = fo.tagid {
                let label = td
                    .field_by_id(tag)
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| tag.to_string());
                typestr.push_str(&format!("(TagId[{label}])"));
            }
            let name = if fo.dir { format!("{}/", f.name) } else { f.name.clone() };
            let (minc, maxc) = fo.multiplicity();
            // maxc 0 means unbounded, so it must be tested before the
            // exact-count case ((0,0) is zero-or-more, not exactly zero).
            let mult = if (minc, maxc) == (1, 1) {
                "1".to_string()
            } else if maxc == 0 {
                format!("{minc}..*")
            } else if minc == maxc {
                minc.to_string()
            } else {
                format!("{minc}..{maxc}")
            };
            Ok((name, typestr, mult, f.description.clone()))
        }
    }
}

/// Build a field definition from JIDL display parts. An empty type
/// expression builds an enumerated item whose value is `name`. The
/// multiplicity string accepts `""` (exactly one), `lo..hi` with `*` for
/// unbounded, or a single count.
pub fn parts_to_field(
    id: i64,
    name: &str,
    typestr: &str,
    mult: &str,
    desc: &str,
) -> Result<FieldDef> {
    if typestr.is_empty() {
        return Ok(FieldDef::Item(ItemDef {
            id,
            value: name.to_string(),
            description: desc.to_string(),
        }));
    }
    let (ftype, topts, tag_fopts) = parse_type_string(typestr)?;
    let (name, dir) = match name.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (name, false),
    };
    let (minc, maxc) = parse_multiplicity(mult)?;
    let mut options = Vec::new();
    if minc != 1 {
        options.push(format!("[{minc}"));
    }
    if maxc != 1 {
        options.push(format!("]{maxc}"));
    }
    options.extend(tag_fopts);
    if dir {
        options.push("<".to_string());
    }
    options.extend(topts);
    Ok(FieldDef::Field(GenFieldDef {
        id,
        name: name.to_string(),
        field_type: ftype,
        options,
        description: desc.to_string(),
    }))
}

fn parse_multiplicity(mult: &str) -> Result<(i64, i64)> {
    let mult = mult.trim();
    if mult.is_empty() || mult == "1" {
        return Ok((1, 1));
    }
    if let Some((lo, hi)) = mult.split_once("..") {
        let minc = lo
            .parse()
            .map_err(|_| SchemaError::Grammar(format!("bad multiplicity {mult:?}")))?;
        let maxc = if hi == "*" {
            0
        } else {
            hi.parse()
                .map_err(|_| SchemaError::Grammar(format!("bad multiplicity {mult:?}")))?
        };
        return Ok((minc, maxc));
    }
    let n = mult
        .parse()
        .map_err(|_| SchemaError::Grammar(format!("bad multiplicity {mult:?}")))?;
    Ok((n, n))
}

/// Deferred cleanup pass over a just-parsed field list: a `tagid` option
/// written as a field name is rewritten to the referenced sibling's id.
pub fn resolve_tag_names(fields: &mut [FieldDef]) -> Result<()> {
    let by_name: Vec<(String, i64)> = fields
        .iter()
        .filter_map(|f| match f {
            FieldDef::Field(g) => Some((g.name.clone(), g.id)),
            FieldDef::Item(_) => None,
        })
        .collect();
    for fd in fields.iter_mut() {
        let FieldDef::Field(g) = fd else { continue };
        for opt in g.options.iter_mut() {
            let Some(value) = opt.strip_prefix('&') else { continue };
            if value.parse::<i64>().is_ok() {
                continue;
            }
            match by_name.iter().find(|(n, _)| n == value) {
                Some((_, id)) => *opt = format!("&{id}"),
                None => {
                    return Err(SchemaError::Semantic(format!(
                        "{}: tagid {value:?} does not match any field",
                        g.name
                    )))
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_and_encode_type_options() {
        let raw = strs(&["{1", "}10", "/ipv4"]);
        let o = TypeOptions::parse(&raw).expect("parse");
        assert_eq!(o.minv, Some(1));
        assert_eq!(o.maxv, Some(10));
        assert_eq!(o.format.as_deref(), Some("ipv4"));
        assert_eq!(o.to_strings(), strs(&["/ipv4", "{1", "}10"]));
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let err = TypeOptions::parse(&strs(&["{1", "{2"])).unwrap_err();
        assert!(err.to_string().contains("duplicate type option: minv"), "{err}");
        let err = TypeOptions::parse(&strs(&["q", "q"])).unwrap_err();
        assert!(err.to_string().contains("duplicate type option: unique"), "{err}");
    }

    #[test]
    fn multiplicity_rendering_forms() {
        let td = TypeDefinition {
            name: "T".into(),
            base_type: BaseType::Record,
            type_options: vec![],
            description: String::new(),
            fields: vec![],
        };
        let mult = |opts: &[&str]| {
            let fd = FieldDef::Field(GenFieldDef {
                id: 1,
                name: "f".into(),
                field_type: "String".into(),
                options: strs(opts),
                description: String::new(),
            });
            field_to_parts(&fd, &td).expect("parts").2
        };
        assert_eq!(mult(&[]), "1");
        assert_eq!(mult(&["[0"]), "0..1");
        assert_eq!(mult(&["]0"]), "1..*");
        // maxc 0 is unbounded even when it equals minc.
        assert_eq!(mult(&["[0", "]0"]), "0..*");
        assert_eq!(mult(&["[2", "]2"]), "2");
        assert_eq!(mult(&["[1", "]5"]), "1..5");
    }

    #[test]
    fn unknown_option_marker_is_rejected() {
        let err = TypeOptions::parse(&strs(&["?what"])).unwrap_err();
        assert!(err.to_string().contains("?what"), "{err}");
    }

    #[test]
    fn field_option_split() {
        let raw = strs(&["[0", "&3", "{1"]);
        let (fo, to) = split_field_options(&raw).expect("split");
        assert_eq!(fo.multiplicity(), (0, 1));
        assert_eq!(fo.tagid, Some(3));
        assert_eq!(to.minv, Some(1));
    }

    #[test]
    fn typestr_round_trip() {
        for (base, opts) in [
            (BaseType::Record, vec![]),
            (BaseType::Integer, strs(&["{0", "}255"])),
            (BaseType::ArrayOf, strs(&["*String", "{1", "q"])),
            (BaseType::MapOf, strs(&["+Channel", "*String"])),
            (BaseType::Enumerated, strs(&["#Department"])),
            (BaseType::String, strs(&["/email"])),
            (BaseType::Number, strs(&["y0.5", "z2.5"])),
            (BaseType::Map, strs(&["=", "{1"])),
        ] {
            let s = type_to_string(base, &opts).expect("render");
            let (name, topts, fopts) = parse_type_string(&s).expect(&s);
            assert_eq!(name, base.as_str(), "{s}");
            assert_eq!(topts, opts, "{s}");
            assert!(fopts.is_empty(), "{s}");
        }
    }

    #[test]
    fn typestr_pattern_round_trip() {
        let opts = strs(&[r"%^\d{3}-\d{4}$"]);
        let s = type_to_string(BaseType::String, &opts).expect("render");
        let (_, topts, _) = parse_type_string(&s).expect("parse");
        assert_eq!(topts, opts, "{s}");
    }

    #[test]
    fn tagid_parses_to_field_option() {
        let (name, topts, fopts) = parse_type_string("Payload(TagId[msg_type])").expect("parse");
        assert_eq!(name, "Payload");
        assert!(topts.is_empty());
        assert_eq!(fopts, strs(&["&msg_type"]));
    }

    #[test]
    fn multiplicity_forms() {
        assert_eq!(parse_multiplicity("").unwrap(), (1, 1));
        assert_eq!(parse_multiplicity("0..1").unwrap(), (0, 1));
        assert_eq!(parse_multiplicity("1..*").unwrap(), (1, 0));
        assert_eq!(parse_multiplicity("3").unwrap(), (3, 3));
        assert!(parse_multiplicity("x..y").is_err());
    }

    #[test]
    fn tag_names_resolve_to_ids() {
        let mut fields = vec![
            FieldDef::Field(GenFieldDef {
                id: 1,
                name: "kind".into(),
                field_type: "Integer".into(),
                options: vec![],
                description: String::new(),
            }),
            FieldDef::Field(GenFieldDef {
                id: 2,
                name: "payload".into(),
                field_type: "Payload".into(),
                options: strs(&["&kind"]),
                description: String::new(),
            }),
        ];
        resolve_tag_names(&mut fields).expect("resolve");
        let FieldDef::Field(g) = &fields[1] else { panic!("general field") };
        assert_eq!(g.options, strs(&["&1"]));

        let mut bad = vec![FieldDef::Field(GenFieldDef {
            id: 1,
            name: "payload".into(),
            field_type: "Payload".into(),
            options: strs(&["&nope"]),
            description: String::new(),
        })];
        assert!(resolve_tag_names(&mut bad).is_err());
    }
}
