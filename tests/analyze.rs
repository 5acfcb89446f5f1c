//! Dependency analysis tests over the type-reference graph.

use jadn::{analyze, build_deps, Schema};
use serde_json::{json, Value};

fn schema(v: Value) -> Schema {
    Schema::from_value(&v).expect("structural conversion")
}

#[test]
fn unreferenced_and_undefined_are_relative_to_roots() {
    let s = schema(json!({
        "meta": {"roots": ["A"]},
        "types": [
            ["A", "Record", [], "", [[1, "b", "B", [], ""]]],
            ["B", "String", [], ""],
            ["C", "Integer", [], ""]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    assert_eq!(report.unreferenced, vec!["C"]);
    assert!(report.undefined.is_empty());
    assert!(report.cycles.is_empty());
}

#[test]
fn references_to_missing_types_are_undefined() {
    let s = schema(json!({
        "meta": {"roots": ["A"]},
        "types": [
            ["A", "Record", [], "", [
                [1, "x", "Missing", [], ""],
                [2, "y", "AlsoMissing", [], ""]
            ]]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    assert_eq!(report.undefined, vec!["Missing", "AlsoMissing"]);
}

#[test]
fn type_options_contribute_references() {
    let s = schema(json!({
        "meta": {"roots": ["Registry"]},
        "types": [
            ["Registry", "MapOf", ["+Key", "*Entry"], ""],
            ["Key", "String", [], ""],
            ["Entry", "Record", [], "", [[1, "tags", "Tags", [], ""]]],
            ["Tags", "ArrayOf", ["*String"], ""],
            ["KeyNames", "Enumerated", ["#Key"], ""]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    // KeyNames references Key via the enum option but nothing reaches it.
    assert_eq!(report.unreferenced, vec!["KeyNames"]);
    assert!(report.undefined.is_empty());

    let deps = build_deps(&s).expect("deps");
    assert_eq!(deps[0], ("Registry".to_string(), vec!["Key".to_string(), "Entry".to_string()]));
    assert_eq!(deps[4].1, vec!["Key".to_string()]);
}

#[test]
fn deref_markers_are_stripped_from_references() {
    let s = schema(json!({
        "meta": {"roots": ["Menu"]},
        "types": [
            ["Menu", "ArrayOf", ["*#Dish"], ""],
            ["Dish", "Record", [], "", [[1, "name", "String", [], ""]]]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    assert!(report.unreferenced.is_empty(), "{report:?}");
    assert!(report.undefined.is_empty(), "{report:?}");
}

#[test]
fn field_option_references_are_collected() {
    let s = schema(json!({
        "meta": {"roots": ["A"]},
        "types": [
            ["A", "Record", [], "", [
                [1, "names", "Enumerated", ["#B"], ""]
            ]],
            ["B", "Record", [], "", [[1, "x", "String", [], ""]]]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    assert!(report.unreferenced.is_empty(), "{report:?}");
    assert!(report.undefined.is_empty(), "{report:?}");
}

#[test]
fn exports_is_honored_when_roots_is_absent() {
    let s = schema(json!({
        "meta": {"exports": ["A"]},
        "types": [["A", "String", [], ""]]
    }));
    let report = analyze(&s).expect("analyze");
    assert!(report.unreferenced.is_empty(), "{report:?}");
}

#[test]
fn without_roots_every_top_type_is_unreferenced() {
    let s = schema(json!({
        "types": [
            ["A", "Record", [], "", [[1, "b", "B", [], ""]]],
            ["B", "String", [], ""]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    assert_eq!(report.unreferenced, vec!["A"]);
}

#[test]
fn duplicate_references_are_reported_once() {
    let s = schema(json!({
        "meta": {"roots": ["A"]},
        "types": [
            ["A", "Record", [], "", [
                [1, "x", "Missing", [], ""],
                [2, "y", "Missing", [], ""]
            ]],
            ["B", "ArrayOf", ["*Missing"], ""]
        ]
    }));
    let report = analyze(&s).expect("analyze");
    assert_eq!(report.undefined, vec!["Missing"]);
    assert_eq!(report.unreferenced, vec!["B"]);
}
