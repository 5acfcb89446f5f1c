//! In-memory model for JADN schemas.
//!
//! The canonical on-disk form is JSON: an optional `meta` object plus a
//! `types` array of 5-element arrays. In memory the overloaded tuples become
//! explicit types: a closed [`BaseType`] enum and a [`FieldDef`] tagged
//! variant (enumerated item vs. general field), so that "wrong tuple length"
//! is unrepresentable once a document has passed structural conversion.

use crate::error::{Result, SchemaError};
use serde_json::{Map, Value};

/// The closed set of built-in base types. User-defined types are never used
/// as a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Binary,
    Boolean,
    Integer,
    Number,
    String,
    Enumerated,
    Choice,
    Array,
    ArrayOf,
    Map,
    MapOf,
    Record,
}

impl BaseType {
    pub const ALL: [BaseType; 12] = [
        BaseType::Binary,
        BaseType::Boolean,
        BaseType::Integer,
        BaseType::Number,
        BaseType::String,
        BaseType::Enumerated,
        BaseType::Choice,
        BaseType::Array,
        BaseType::ArrayOf,
        BaseType::Map,
        BaseType::MapOf,
        BaseType::Record,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Binary => "Binary",
            BaseType::Boolean => "Boolean",
            BaseType::Integer => "Integer",
            BaseType::Number => "Number",
            BaseType::String => "String",
            BaseType::Enumerated => "Enumerated",
            BaseType::Choice => "Choice",
            BaseType::Array => "Array",
            BaseType::ArrayOf => "ArrayOf",
            BaseType::Map => "Map",
            BaseType::MapOf => "MapOf",
            BaseType::Record => "Record",
        }
    }

    pub fn from_name(name: &str) -> Option<BaseType> {
        BaseType::ALL.iter().copied().find(|b| b.as_str() == name)
    }

    /// True for base types whose instances carry explicit field definitions.
    pub fn has_fields(self) -> bool {
        matches!(
            self,
            BaseType::Enumerated
                | BaseType::Choice
                | BaseType::Array
                | BaseType::Map
                | BaseType::Record
        )
    }
}

impl std::fmt::Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `name` is a reserved built-in base-type name.
pub fn is_builtin(name: &str) -> bool {
    BaseType::from_name(name).is_some()
}

/// One schema document: ordered `meta` entries plus type definitions in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub meta: Map<String, Value>,
    pub types: Vec<TypeDefinition>,
}

/// One type definition: the canonical `(TypeName, BaseType, TypeOptions,
/// TypeDesc, Fields)` tuple. The raw option strings are authoritative for
/// storage; [`crate::options`] parses them on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub base_type: BaseType,
    pub type_options: Vec<String>,
    pub description: String,
    pub fields: Vec<FieldDef>,
}

/// A field slot, shaped by the enclosing base type: Enumerated types hold
/// 3-element items, Array/Choice/Map/Record hold 5-element fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDef {
    Item(ItemDef),
    Field(GenFieldDef),
}

/// Enumerated item: `(ItemID, ItemValue, ItemDesc)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDef {
    pub id: i64,
    pub value: String,
    pub description: String,
}

/// General field: `(FieldID, FieldName, FieldType, FieldOptions, FieldDesc)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenFieldDef {
    pub id: i64,
    pub name: String,
    pub field_type: String,
    pub options: Vec<String>,
    pub description: String,
}

impl FieldDef {
    pub fn id(&self) -> i64 {
        match self {
            FieldDef::Item(i) => i.id,
            FieldDef::Field(f) => f.id,
        }
    }

    /// Item value or field name, whichever names this slot.
    pub fn name(&self) -> &str {
        match self {
            FieldDef::Item(i) => &i.value,
            FieldDef::Field(f) => &f.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            FieldDef::Item(i) => &i.description,
            FieldDef::Field(f) => &f.description,
        }
    }
}

fn as_str(v: &Value, what: &str) -> Result<String> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::Structural(format!("{what} must be a string, got {v}")))
}

fn as_i64(v: &Value, what: &str) -> Result<i64> {
    v.as_i64()
        .ok_or_else(|| SchemaError::Structural(format!("{what} must be an integer, got {v}")))
}

fn as_str_list(v: &Value, what: &str) -> Result<Vec<String>> {
    let arr = v
        .as_array()
        .ok_or_else(|| SchemaError::Structural(format!("{what} must be an array, got {v}")))?;
    arr.iter().map(|s| as_str(s, what)).collect()
}

impl Schema {
    /// Structural conversion from the canonical JSON form. Rejects malformed
    /// shapes (wrong arity, wrong JSON types) before any semantic checking;
    /// a missing trailing `Fields` element is materialized as an empty list.
    pub fn from_value(value: &Value) -> Result<Schema> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::Structural("schema must be a JSON object".into()))?;
        for key in obj.keys() {
            if key != "meta" && key != "types" {
                return Err(SchemaError::Structural(format!("unexpected schema key: {key}")));
            }
        }
        let meta = match obj.get("meta") {
            None => Map::new(),
            Some(Value::Object(m)) => m.clone(),
            Some(v) => {
                return Err(SchemaError::Structural(format!("meta must be an object, got {v}")))
            }
        };
        let raw_types = obj
            .get("types")
            .ok_or_else(|| SchemaError::Structural("schema missing required key: types".into()))?
            .as_array()
            .ok_or_else(|| SchemaError::Structural("types must be an array".into()))?;
        let types = raw_types
            .iter()
            .map(TypeDefinition::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema { meta, types })
    }

    /// Canonical JSON form: `meta` (omitted when empty) plus `types` as
    /// arrays of arrays.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        if !self.meta.is_empty() {
            obj.insert("meta".into(), Value::Object(self.meta.clone()));
        }
        obj.insert(
            "types".into(),
            Value::Array(self.types.iter().map(TypeDefinition::to_value).collect()),
        );
        Value::Object(obj)
    }
}

impl TypeDefinition {
    pub fn from_value(value: &Value) -> Result<TypeDefinition> {
        let t = value.as_array().ok_or_else(|| {
            SchemaError::Structural(format!("type definition must be an array, got {value}"))
        })?;
        if t.len() < 4 || t.len() > 5 {
            return Err(SchemaError::Structural(format!(
                "type definition must have 4 or 5 elements, got {}",
                t.len()
            )));
        }
        let name = as_str(&t[0], "TypeName")?;
        let base_name = as_str(&t[1], "BaseType")?;
        let base_type = BaseType::from_name(&base_name)
            .ok_or_else(|| SchemaError::Semantic(format!("invalid base type {name}: {base_name}")))?;
        let type_options = as_str_list(&t[2], "TypeOptions")?;
        let description = as_str(&t[3], "TypeDesc")?;
        let fields = match t.get(4) {
            None => Vec::new(),
            Some(v) => v
                .as_array()
                .ok_or_else(|| SchemaError::Structural(format!("Fields of {name} must be an array")))?
                .iter()
                .map(|f| FieldDef::from_value(f, &name))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(TypeDefinition {
            name,
            base_type,
            type_options,
            description,
            fields,
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::String(self.name.clone()),
            Value::String(self.base_type.as_str().into()),
            Value::Array(self.type_options.iter().cloned().map(Value::String).collect()),
            Value::String(self.description.clone()),
            Value::Array(self.fields.iter().map(FieldDef::to_value).collect()),
        ])
    }

    pub fn field_by_id(&self, id: i64) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id() == id)
    }
}

impl FieldDef {
    /// Shape is selected by arity: 3-element arrays are enumerated items,
    /// 5-element arrays are general fields. Whether the shape is legal for
    /// the enclosing base type is a semantic question left to the validator.
    pub fn from_value(value: &Value, type_name: &str) -> Result<FieldDef> {
        let f = value.as_array().ok_or_else(|| {
            SchemaError::Structural(format!("field of {type_name} must be an array, got {value}"))
        })?;
        match f.len() {
            3 => Ok(FieldDef::Item(ItemDef {
                id: as_i64(&f[0], "ItemID")?,
                value: as_str(&f[1], "ItemValue")?,
                description: as_str(&f[2], "ItemDesc")?,
            })),
            5 => Ok(FieldDef::Field(GenFieldDef {
                id: as_i64(&f[0], "FieldID")?,
                name: as_str(&f[1], "FieldName")?,
                field_type: as_str(&f[2], "FieldType")?,
                options: as_str_list(&f[3], "FieldOptions")?,
                description: as_str(&f[4], "FieldDesc")?,
            })),
            n => Err(SchemaError::Structural(format!(
                "field of {type_name} must have 3 or 5 elements, got {n}"
            ))),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            FieldDef::Item(i) => Value::Array(vec![
                Value::from(i.id),
                Value::String(i.value.clone()),
                Value::String(i.description.clone()),
            ]),
            FieldDef::Field(f) => Value::Array(vec![
                Value::from(f.id),
                Value::String(f.name.clone()),
                Value::String(f.field_type.clone()),
                Value::Array(f.options.iter().cloned().map(Value::String).collect()),
                Value::String(f.description.clone()),
            ]),
        }
    }
}
