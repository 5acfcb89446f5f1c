//! Validator tests: structural conversion, semantic invariants, and the
//! meta-schema self-check hook.

use jadn::{check, check_with, MetaSchemaCodec, Result, Schema, SchemaError};
use serde_json::{json, Value};

fn schema(v: Value) -> Schema {
    Schema::from_value(&v).expect("structural conversion")
}

fn personnel() -> Value {
    json!({
        "meta": {
            "package": "https://example.com/personnel",
            "roots": ["Person"]
        },
        "types": [
            ["Person", "Record", [], "An individual", [
                [1, "name", "String", [], ""],
                [2, "id", "Integer", [], "employee number"],
                [3, "email", "String", ["[0", "/email"], ""],
                [4, "dept", "Department", ["[0"], ""]
            ]],
            ["Department", "Enumerated", [], "", [
                [1, "HR", ""],
                [2, "Engineering", ""]
            ]]
        ]
    })
}

#[test]
fn valid_schema_passes_unchanged() {
    let s = schema(personnel());
    let checked = check(s.clone()).expect("check");
    assert_eq!(checked, s);
    // A checked schema checks again.
    check(checked).expect("recheck");
}

#[test]
fn colliding_type_names_are_rejected() {
    let err = check(schema(json!({"types": [
        ["Color", "String", [], ""],
        ["Color", "Integer", [], ""]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("colliding"), "{err}");
    assert!(err.to_string().contains("Color"), "{err}");
}

#[test]
fn builtin_names_are_reserved() {
    let err = check(schema(json!({"types": [["String", "String", [], ""]]}))).unwrap_err();
    assert!(err.to_string().contains("reserved"), "{err}");
}

#[test]
fn record_field_ids_are_ordinal() {
    let err = check(schema(json!({"types": [
        ["Person", "Record", [], "", [
            [1, "name", "String", [], ""],
            [3, "email", "String", [], ""]
        ]]
    ]})))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("item tag error"), "{msg}");
    assert!(msg.contains("email"), "{msg}");
    assert!(msg.contains("3 should be 2"), "{msg}");
}

#[test]
fn map_field_ids_need_not_be_ordinal() {
    check(schema(json!({"types": [
        ["Headers", "Map", [], "", [
            [10, "from", "String", [], ""],
            [42, "to", "String", [], ""]
        ]]
    ]})))
    .expect("check");
}

#[test]
fn pattern_and_size_options_conflict() {
    let err = check(schema(json!({"types": [
        ["Phone", "String", ["%^\\d+$", "{1", "}32"], ""]
    ]})))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Phone"), "{msg}");
    assert!(msg.contains("pattern and size"), "{msg}");
}

#[test]
fn missing_required_option_is_reported() {
    let err = check(schema(json!({"types": [["Tags", "ArrayOf", [], ""]]}))).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("missing type option Tags"), "{msg}");
    assert!(msg.contains("vtype"), "{msg}");
}

#[test]
fn option_outside_the_allowed_set_is_reported() {
    let err = check(schema(json!({"types": [
        ["Count", "Integer", ["%^\\d+$"], ""]
    ]})))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unsupported type option Count (Integer)"), "{msg}");
    assert!(msg.contains("pattern"), "{msg}");
}

#[test]
fn inverted_value_range_is_rejected() {
    let err = check(schema(json!({"types": [
        ["Count", "Integer", ["{10", "}1"], ""]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("bad value range Count (Integer): [10..1]"), "{err}");
}

#[test]
fn format_must_match_the_base_type() {
    check(schema(json!({"types": [["Addr", "String", ["/ipv4"], ""]]}))).expect("check");
    let err = check(schema(json!({"types": [["Addr", "Integer", ["/ipv4"], ""]]}))).unwrap_err();
    assert!(err.to_string().contains("unsupported format ipv4 in Addr Integer"), "{err}");
}

#[test]
fn duplicate_field_ids_and_names_are_rejected() {
    let err = check(schema(json!({"types": [
        ["Pair", "Map", [], "", [
            [1, "a", "String", [], ""],
            [1, "b", "String", [], ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("duplicate field id in Pair: 1"), "{err}");

    let err = check(schema(json!({"types": [
        ["Pair", "Map", [], "", [
            [1, "a", "String", [], ""],
            [2, "a", "String", [], ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("duplicate field name in Pair: a"), "{err}");
}

#[test]
fn enumerated_rejects_general_field_shape() {
    let err = check(schema(json!({"types": [
        ["Color", "Enumerated", [], "", [
            [1, "red", "String", [], ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("5 elements, should be 3"), "{err}");
}

#[test]
fn record_rejects_item_shape() {
    let err = check(schema(json!({"types": [
        ["Person", "Record", [], "", [
            [1, "name", ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("3 elements, should be 5"), "{err}");
}

#[test]
fn primitive_types_must_not_have_fields() {
    let err = check(schema(json!({"types": [
        ["Name", "String", [], "", [[1, "x", "String", [], ""]]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("must not have fields"), "{err}");
}

#[test]
fn enum_derivation_forbids_explicit_fields() {
    let err = check(schema(json!({"types": [
        ["Fields", "Enumerated", ["#Person"], "", [[1, "extra", ""]]],
        ["Person", "Record", [], "", [[1, "name", "String", [], ""]]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("enum/pointer"), "{err}");
}

#[test]
fn anonymous_container_field_types_are_rejected() {
    let err = check(schema(json!({"types": [
        ["Person", "Record", [], "", [
            [1, "tags", "Record", [], ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("invalid anonymous type"), "{err}");
}

#[test]
fn choice_tagid_must_name_a_sibling() {
    let base = |tag: &str| {
        json!({"types": [
            ["Message", "Record", [], "", [
                [1, "msg_type", "Integer", [], ""],
                [2, "payload", "Payload", [tag], ""]
            ]],
            ["Payload", "Choice", [], "", [
                [1, "text", "String", [], ""]
            ]]
        ]})
    };
    check(schema(base("&1"))).expect("tag refers to msg_type");
    let err = check(schema(base("&9"))).unwrap_err();
    assert!(err.to_string().contains("bad external tag 9"), "{err}");
}

#[test]
fn user_type_fields_take_no_type_options() {
    let err = check(schema(json!({"types": [
        ["Person", "Record", [], "", [
            [1, "dept", "Department", ["{1"], ""]
        ]],
        ["Department", "Enumerated", [], "", [[1, "HR", ""]]]
    ]})))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Person/dept(Department) cannot have type options"), "{msg}");
    assert!(msg.contains("minv"), "{msg}");
}

#[test]
fn unique_is_allowed_on_repeated_user_type_fields() {
    check(schema(json!({"types": [
        ["Roster", "Record", [], "", [
            [1, "members", "Person", ["]0", "q"], ""]
        ]],
        ["Person", "Record", [], "", [[1, "name", "String", [], ""]]]
    ]})))
    .expect("unique moves to the generated ArrayOf");

    // Not on a singular field though.
    let err = check(schema(json!({"types": [
        ["Roster", "Record", [], "", [
            [1, "leader", "Person", ["q"], ""]
        ]],
        ["Person", "Record", [], "", [[1, "name", "String", [], ""]]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("cannot have type options"), "{err}");
}

#[test]
fn bad_multiplicity_is_rejected() {
    let err = check(schema(json!({"types": [
        ["Person", "Record", [], "", [
            [1, "name", "String", ["[3", "]2"], ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("bad multiplicity 3 2"), "{err}");
}

#[test]
fn dir_requires_a_container_field_type() {
    let err = check(schema(json!({"types": [
        ["Index", "Map", [], "", [
            [1, "leaf", "String", ["<"], ""]
        ]]
    ]})))
    .unwrap_err();
    assert!(err.to_string().contains("cannot be dir"), "{err}");
}

#[test]
fn structural_faults_are_reported_before_semantics() {
    let err = Schema::from_value(&json!({"types": [["Name", "String", []]]})).unwrap_err();
    assert!(matches!(err, SchemaError::Structural(_)), "{err}");

    let err = Schema::from_value(&json!({"meta": {}, "types": [], "extra": 1})).unwrap_err();
    assert!(err.to_string().contains("unexpected schema key: extra"), "{err}");
}

struct IdentityCodec;

impl MetaSchemaCodec for IdentityCodec {
    fn encode(&self, _type_name: &str, document: &Value) -> Result<Value> {
        Ok(document.clone())
    }
}

struct LossyCodec;

impl MetaSchemaCodec for LossyCodec {
    fn encode(&self, _type_name: &str, document: &Value) -> Result<Value> {
        let mut doc = document.clone();
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("meta");
        }
        Ok(doc)
    }
}

#[test]
fn meta_schema_round_trip_gates_checking() {
    let s = schema(personnel());
    check_with(s.clone(), &IdentityCodec).expect("faithful codec");
    let err = check_with(s, &LossyCodec).unwrap_err();
    assert!(matches!(err, SchemaError::MetaSchema(_)), "{err}");
}
