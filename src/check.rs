//! Schema validator: structural conversion happens in [`crate::ast`]; this
//! module enforces the semantic invariants over type and field definitions
//! and hosts the optional meta-schema self-check.

use crate::ast::{is_builtin, BaseType, FieldDef, Schema, TypeDefinition};
use crate::error::{Result, SchemaError};
use crate::options::{split_field_options, TypeOptions};
use crate::registry::{
    allowed_type_options, field_arity, format_base_type, required_type_options, OptKey,
};
use serde_json::Value;
use std::collections::BTreeSet;

/// Capability for encoding a document against the JADN meta-schema.
/// Implemented by an instance codec outside this crate; the validator only
/// needs the one round-trip in [`check_with`].
pub trait MetaSchemaCodec {
    fn encode(&self, type_name: &str, document: &Value) -> Result<Value>;
}

/// Validate a schema. Fail-fast: the first violated invariant aborts
/// checking with an error naming the offending type (and field, when
/// applicable). On success the schema is returned unchanged; normalization
/// (empty field lists, canonical list shapes) already happened during
/// structural conversion.
pub fn check(schema: Schema) -> Result<Schema> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for td in &schema.types {
        if !names.insert(&td.name) {
            return Err(SchemaError::Semantic(format!(
                "colliding type definitions: {}",
                td.name
            )));
        }
        if is_builtin(&td.name) {
            return Err(SchemaError::Semantic(format!("reserved type name: {}", td.name)));
        }
        let topts = TypeOptions::parse(&td.type_options)?;
        check_type_options(&td.name, td.base_type, &topts)?;
        check_fields(td, &topts)?;
    }
    Ok(schema)
}

/// Validate after proving the meta-schema and the hand-written checks agree:
/// encoding the document against the meta-schema must reproduce it exactly.
/// A mismatch is an internal-consistency fault, not a user-schema fault.
pub fn check_with(schema: Schema, codec: &dyn MetaSchemaCodec) -> Result<Schema> {
    let doc = schema.to_value();
    let encoded = codec.encode("Schema", &doc)?;
    if encoded != doc {
        return Err(SchemaError::MetaSchema(
            "encoding the schema document against the meta-schema did not reproduce it".into(),
        ));
    }
    check(schema)
}

fn keys_str(keys: &[OptKey]) -> String {
    keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}

/// Check one option set against a base type: required present, nothing
/// outside the allowed set, numeric ranges ordered, and the mutual-exclusion
/// rules between pattern/size, enum/pointer, and and/or.
pub fn check_type_options(label: &str, base: BaseType, topts: &TypeOptions) -> Result<()> {
    let present = topts.keys();
    let missing: Vec<OptKey> = required_type_options(base)
        .iter()
        .copied()
        .filter(|k| !present.contains(k))
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::Semantic(format!(
            "missing type option {label}: {}",
            keys_str(&missing)
        )));
    }
    let unsupported: Vec<OptKey> = present
        .iter()
        .copied()
        .filter(|k| !allowed_type_options(base).contains(k))
        .collect();
    if !unsupported.is_empty() {
        return Err(SchemaError::Semantic(format!(
            "unsupported type option {label} ({base}): {}",
            keys_str(&unsupported)
        )));
    }
    if let (Some(minv), Some(maxv)) = (topts.minv, topts.maxv) {
        if maxv < minv {
            return Err(SchemaError::Semantic(format!(
                "bad value range {label} ({base}): [{minv}..{maxv}]"
            )));
        }
    }
    if let (Some(minf), Some(maxf)) = (topts.minf, topts.maxf) {
        if maxf < minf {
            return Err(SchemaError::Semantic(format!(
                "bad value range {label} ({base}): [{minf}..{maxf}]"
            )));
        }
    }
    if (topts.minv.is_some() || topts.maxv.is_some()) && topts.pattern.is_some() {
        return Err(SchemaError::Semantic(format!(
            "{label} cannot have both pattern and size constraints"
        )));
    }
    if let Some(fmt) = &topts.format {
        if format_base_type(fmt) != Some(base) {
            return Err(SchemaError::Semantic(format!(
                "unsupported format {fmt} in {label} {base}"
            )));
        }
    }
    if topts.enum_type.is_some() && topts.pointer_type.is_some() {
        return Err(SchemaError::Semantic(format!(
            "{label} ({base}) cannot be both enum and pointer"
        )));
    }
    if topts.and_type.is_some() && topts.or_type.is_some() {
        return Err(SchemaError::Semantic(format!(
            "unsupported union+intersection in {label} ({base})"
        )));
    }
    Ok(())
}

fn check_fields(td: &TypeDefinition, topts: &TypeOptions) -> Result<()> {
    let tname = &td.name;
    let base = td.base_type;

    // Types derived via enum/pointer have implicit fields only.
    if (topts.enum_type.is_some() || topts.pointer_type.is_some()) && !td.fields.is_empty() {
        return Err(SchemaError::Semantic(format!(
            "{tname}({base}) must not define fields with the enum/pointer option"
        )));
    }

    // Field shape must match the enclosing base type.
    let expected = field_arity(base);
    if expected == 0 && !td.fields.is_empty() {
        return Err(SchemaError::Semantic(format!("{tname}({base}) must not have fields")));
    }
    for fd in &td.fields {
        let actual = match fd {
            FieldDef::Item(_) => 3,
            FieldDef::Field(_) => 5,
        };
        if actual != expected {
            return Err(SchemaError::Semantic(format!(
                "bad field id={} in {tname}: {actual} elements, should be {expected}"
            , fd.id())));
        }
    }

    // Container types must be named, not inlined as a field type.
    for fd in &td.fields {
        if let FieldDef::Field(f) = fd {
            if BaseType::from_name(&f.field_type).is_some_and(BaseType::has_fields) {
                return Err(SchemaError::Semantic(format!(
                    "{tname}/{}({}): invalid anonymous type {:?}",
                    f.name, f.id, f.field_type
                )));
            }
        }
    }

    let mut ids = BTreeSet::new();
    let mut fnames = BTreeSet::new();
    for fd in &td.fields {
        if !ids.insert(fd.id()) {
            return Err(SchemaError::Semantic(format!(
                "duplicate field id in {tname}: {}",
                fd.id()
            )));
        }
        if !fnames.insert(fd.name()) {
            return Err(SchemaError::Semantic(format!(
                "duplicate field name in {tname}: {}",
                fd.name()
            )));
        }
    }

    // Array and Record field ids are ordinal positions, not tags.
    if matches!(base, BaseType::Array | BaseType::Record) {
        for (n, fd) in td.fields.iter().enumerate() {
            let expected_id = n as i64 + 1;
            if fd.id() != expected_id {
                return Err(SchemaError::Semantic(format!(
                    "item tag error: {tname}({base}) [{}] -- {} should be {expected_id}",
                    fd.name(),
                    fd.id()
                )));
            }
        }
    }

    for fd in &td.fields {
        let FieldDef::Field(f) = fd else { continue };
        let (fo, ftopts) = split_field_options(&f.options)?;
        let (minc, maxc) = fo.multiplicity();
        if minc < 0 || maxc < 0 || (maxc > 0 && maxc < minc) {
            return Err(SchemaError::Semantic(format!(
                "{tname}/{}: bad multiplicity {minc} {maxc}",
                f.name
            )));
        }
        if let Some(tag) = fo.tagid {
            if td.field_by_id(tag).is_none() {
                return Err(SchemaError::Semantic(format!(
                    "{tname}/{}({}): choice has bad external tag {tag}",
                    f.name, f.field_type
                )));
            }
        }
        match BaseType::from_name(&f.field_type) {
            Some(fbase) => {
                check_type_options(&format!("{tname}/{}", f.name), fbase, &ftopts)?;
            }
            None => {
                // A repeated field of a user type may carry `unique` (it moves
                // to the generated ArrayOf); nothing else is allowed.
                let allowed: &[OptKey] = if maxc != 1 { &[OptKey::Unique] } else { &[] };
                let illegal: Vec<OptKey> = ftopts
                    .keys()
                    .into_iter()
                    .filter(|k| !allowed.contains(k))
                    .collect();
                if !illegal.is_empty() {
                    return Err(SchemaError::Semantic(format!(
                        "{tname}/{}({}) cannot have type options: {}",
                        f.name,
                        f.field_type,
                        keys_str(&illegal)
                    )));
                }
            }
        }
        if fo.dir {
            if let Some(fbase) = BaseType::from_name(&f.field_type) {
                if !fbase.has_fields() {
                    return Err(SchemaError::Semantic(format!(
                        "{tname}/{}: {} cannot be dir",
                        f.name, f.field_type
                    )));
                }
            }
        }
    }
    Ok(())
}
