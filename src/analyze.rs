//! Dependency analysis over a schema's type-reference graph.

use crate::ast::{is_builtin, FieldDef, Schema};
use crate::error::Result;
use crate::options::TypeOptions;
use std::collections::BTreeSet;

/// Result of [`analyze`]: declared-but-unreachable and referenced-but-missing
/// type names, relative to the declared roots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    pub unreferenced: Vec<String>,
    pub undefined: Vec<String>,
    /// Reserved for cycle detection; currently always empty.
    pub cycles: Vec<String>,
}

fn strip_deref(name: &str) -> &str {
    name.strip_prefix('#')
        .or_else(|| name.strip_prefix('>'))
        .unwrap_or(name)
}

fn option_refs(topts: &TypeOptions, out: &mut Vec<String>) {
    for value in [
        topts.ktype.as_deref(),
        topts.vtype.as_deref(),
        topts.enum_type.as_deref(),
        topts.pointer_type.as_deref(),
        topts.and_type.as_deref(),
        topts.or_type.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        let name = strip_deref(value);
        if !is_builtin(name) && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
}

/// Direct (one-level) type references per declared type, in declaration and
/// occurrence order. References come from type options (`ktype`, `vtype`,
/// `enum`, `pointer`, `and`, `or`), from field types, and from field-level
/// type-refining options.
pub fn build_deps(schema: &Schema) -> Result<Vec<(String, Vec<String>)>> {
    let mut deps = Vec::with_capacity(schema.types.len());
    for td in &schema.types {
        let mut refs = Vec::new();
        option_refs(&TypeOptions::parse(&td.type_options)?, &mut refs);
        for fd in &td.fields {
            let FieldDef::Field(f) = fd else { continue };
            if !is_builtin(&f.field_type) && !refs.iter().any(|n| *n == f.field_type) {
                refs.push(f.field_type.clone());
            }
            let (_, ftopts) = crate::options::split_field_options(&f.options)?;
            option_refs(&ftopts, &mut refs);
        }
        deps.push((td.name.clone(), refs));
    }
    Ok(deps)
}

/// Compute unreferenced and undefined type names. Declared roots (meta
/// `roots`, falling back to the deprecated `exports` key) need not be
/// referenced by anything else.
pub fn analyze(schema: &Schema) -> Result<Analysis> {
    let deps = build_deps(schema)?;
    let roots: Vec<String> = schema
        .meta
        .get("roots")
        .or_else(|| schema.meta.get("exports"))
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    let declared: BTreeSet<&str> = deps.iter().map(|(n, _)| n.as_str()).collect();
    let mut referenced: BTreeSet<&str> = deps
        .iter()
        .flat_map(|(_, refs)| refs.iter().map(String::as_str))
        .collect();
    referenced.extend(roots.iter().map(String::as_str));

    let unreferenced = deps
        .iter()
        .map(|(n, _)| n)
        .filter(|n| !referenced.contains(n.as_str()))
        .cloned()
        .collect();
    let mut undefined: Vec<String> = Vec::new();
    for (_, refs) in &deps {
        for r in refs {
            if !declared.contains(r.as_str()) && !undefined.iter().any(|n| n == r) {
                undefined.push(r.clone());
            }
        }
    }
    Ok(Analysis {
        unreferenced,
        undefined,
        cycles: Vec::new(),
    })
}
