//! JSON adapter: turn untyped JSON documents into tagged comparator inputs.
//!
//! # Mapping
//! - string            → `String`
//! - integer in i32    → `Int32`
//! - null              → `Null`
//! - array of scalars  → `Array` (strings, integers, booleans)
//! - everything else   → `Unsupported` (booleans, floats, large integers,
//!   objects, arrays holding nested arrays/objects/floats)
//!
//! Int16 is never inferred from JSON; callers that know a field is 16-bit
//! build the value directly.
//!
//! Declared documents must be JSON objects; any other top-level shape is a
//! [`CompareError::InputType`].

use serde_json::{Map, Value};

use crate::{
    ArrayElement, BoundParameters, CompareError, ConfigMap, DeclaredConfig, FieldValue,
    PropertyBag,
};

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "int64",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn element_from_json(v: &Value) -> Option<ArrayElement> {
    match v {
        Value::String(s) => Some(ArrayElement::Str(s.clone())),
        Value::Bool(b) => Some(ArrayElement::Bool(*b)),
        Value::Number(n) => n.as_i64().map(ArrayElement::Int),
        _ => None,
    }
}

impl FieldValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => FieldValue::Null,
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                Some(i) => FieldValue::Int32(i),
                None => FieldValue::unsupported(json_type_name(v), n.to_string()),
            },
            Value::Array(items) => {
                let elements: Option<Vec<ArrayElement>> =
                    items.iter().map(element_from_json).collect();
                match elements {
                    Some(elements) => FieldValue::Array(elements),
                    None => FieldValue::unsupported("array", v.to_string()),
                }
            }
            Value::Bool(_) | Value::Object(_) => {
                FieldValue::unsupported(json_type_name(v), v.to_string())
            }
        }
    }
}

/// Convert a JSON object into a [`ConfigMap`].
pub fn config_map_from_json(v: &Value) -> Result<ConfigMap, CompareError> {
    let obj = v.as_object().ok_or_else(|| CompareError::InputType {
        found: json_type_name(v).to_string(),
    })?;
    Ok(obj
        .iter()
        .map(|(k, vv)| (k.clone(), FieldValue::from_json(vv)))
        .collect())
}

/// A JSON object exposed only through the [`PropertyBag`] capability.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonProperties {
    fields: Map<String, Value>,
}

impl JsonProperties {
    pub fn from_json(v: &Value) -> Result<Self, CompareError> {
        match v {
            Value::Object(fields) => Ok(Self {
                fields: fields.clone(),
            }),
            other => Err(CompareError::InputType {
                found: json_type_name(other).to_string(),
            }),
        }
    }
}

impl PropertyBag for JsonProperties {
    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).map(FieldValue::from_json)
    }
}

/// Owned declared configuration built from an untyped document.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclaredInput {
    Map(ConfigMap),
    Bound(BoundParameters),
    Properties(JsonProperties),
}

impl DeclaredInput {
    /// Map shape from a JSON object.
    pub fn map_from_json(v: &Value) -> Result<Self, CompareError> {
        config_map_from_json(v).map(DeclaredInput::Map)
    }

    /// Bound-parameter shape from a JSON object.
    pub fn bound_from_json(v: &Value) -> Result<Self, CompareError> {
        config_map_from_json(v).map(|m| DeclaredInput::Bound(m.into()))
    }

    /// Property-bag shape from a JSON object.
    pub fn properties_from_json(v: &Value) -> Result<Self, CompareError> {
        JsonProperties::from_json(v).map(DeclaredInput::Properties)
    }

    pub fn as_declared(&self) -> DeclaredConfig<'_> {
        match self {
            DeclaredInput::Map(m) => DeclaredConfig::Map(m),
            DeclaredInput::Bound(b) => DeclaredConfig::Bound(b),
            DeclaredInput::Properties(p) => DeclaredConfig::Properties(p),
        }
    }
}
