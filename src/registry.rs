//! Static base-type knowledge: which options each base type requires and
//! allows, how many elements its field tuples carry, and which format tags
//! are recognized. Pure lookup tables, read-only for the process lifetime.

use crate::ast::BaseType;

/// Keys of the type-option micro-format (see [`crate::options`] for the
/// marker characters and value types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptKey {
    Id,
    Vtype,
    Ktype,
    Enum,
    Pointer,
    Format,
    Pattern,
    Minf,
    Maxf,
    Minv,
    Maxv,
    Unique,
    Set,
    Unordered,
    Extend,
    And,
    Or,
}

impl OptKey {
    pub fn as_str(self) -> &'static str {
        match self {
            OptKey::Id => "id",
            OptKey::Vtype => "vtype",
            OptKey::Ktype => "ktype",
            OptKey::Enum => "enum",
            OptKey::Pointer => "pointer",
            OptKey::Format => "format",
            OptKey::Pattern => "pattern",
            OptKey::Minf => "minf",
            OptKey::Maxf => "maxf",
            OptKey::Minv => "minv",
            OptKey::Maxv => "maxv",
            OptKey::Unique => "unique",
            OptKey::Set => "set",
            OptKey::Unordered => "unordered",
            OptKey::Extend => "extend",
            OptKey::And => "and",
            OptKey::Or => "or",
        }
    }
}

impl std::fmt::Display for OptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options that must be present on a type of the given base type.
pub fn required_type_options(base: BaseType) -> &'static [OptKey] {
    match base {
        BaseType::ArrayOf => &[OptKey::Vtype],
        BaseType::MapOf => &[OptKey::Ktype, OptKey::Vtype],
        _ => &[],
    }
}

/// Options that may be present on a type of the given base type
/// (superset of the required options).
pub fn allowed_type_options(base: BaseType) -> &'static [OptKey] {
    use OptKey::*;
    match base {
        BaseType::Binary => &[Format, Minv, Maxv, And, Or],
        BaseType::Boolean => &[And, Or],
        BaseType::Integer => &[Format, Minv, Maxv, And, Or],
        BaseType::Number => &[Format, Minf, Maxf, And, Or],
        BaseType::String => &[Format, Pattern, Minv, Maxv, And, Or],
        BaseType::Enumerated => &[Id, Enum, Pointer, Extend, And, Or],
        BaseType::Choice => &[Id, Extend, And, Or],
        BaseType::Array => &[Extend, Format, Minv, Maxv, And, Or],
        BaseType::ArrayOf => &[Vtype, Minv, Maxv, Unique, Set, Unordered, And, Or],
        BaseType::Map => &[Id, Extend, Minv, Maxv, And, Or],
        BaseType::MapOf => &[Ktype, Vtype, Minv, Maxv, And, Or],
        BaseType::Record => &[Extend, Minv, Maxv, And, Or],
    }
}

/// Number of elements in a field tuple of the given base type:
/// 3 for Enumerated items, 5 for general fields, 0 for types that carry
/// no explicit fields.
pub fn field_arity(base: BaseType) -> usize {
    match base {
        BaseType::Enumerated => 3,
        BaseType::Choice | BaseType::Array | BaseType::Map | BaseType::Record => 5,
        _ => 0,
    }
}

/// Base type a recognized format tag applies to, or `None` for unknown tags.
pub fn format_base_type(name: &str) -> Option<BaseType> {
    match name {
        // JSON Schema semantic validation keywords
        "date-time" | "date" | "time" | "duration" | "email" | "idn-email" | "hostname"
        | "idn-hostname" | "ipv4" | "ipv6" | "uri" | "uri-reference" | "iri" | "iri-reference"
        | "uri-template" | "json-pointer" | "relative-json-pointer" | "regex" | "uuid" => {
            Some(BaseType::String)
        }
        // JADN-defined binary and address formats
        "eui" | "ipv4-addr" | "ipv6-addr" | "x" | "b" => Some(BaseType::Binary),
        "ipv4-net" | "ipv6-net" => Some(BaseType::Array),
        // Bounded machine-word formats
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" => Some(BaseType::Integer),
        "f16" | "f32" | "f64" => Some(BaseType::Number),
        _ => None,
    }
}

/// Preferred display order for meta keys; keys not listed here follow, in
/// schema order.
pub const META_ORDER: [&str; 11] = [
    "title",
    "package",
    "version",
    "description",
    "comment",
    "copyright",
    "license",
    "namespaces",
    "roots",
    "exports",
    "config",
];
