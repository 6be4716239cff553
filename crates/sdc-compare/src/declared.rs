//! Declared-configuration shapes.
//!
//! A declared configuration reaches the comparator in one of three shapes,
//! chosen by the caller:
//!
//! - [`DeclaredConfig::Map`]: an ordered map; every key is enumerable.
//! - [`DeclaredConfig::Bound`]: the parameters a caller actually bound
//!   ([`BoundParameters`]); enumerable like a map, but only holds what was
//!   supplied.
//! - [`DeclaredConfig::Properties`]: a structured object behind the
//!   [`PropertyBag`] capability. It can answer "has field X" but cannot list
//!   its fields, so a key filter is mandatory.

use std::collections::BTreeMap;

use crate::{ConfigMap, FieldValue};

/// Named-field capability of a structured configuration object.
pub trait PropertyBag {
    fn has_field(&self, name: &str) -> bool;

    /// Value of a field. A field that exists but has no value reads as `None`
    /// and is treated as [`FieldValue::Null`].
    fn get_field(&self, name: &str) -> Option<FieldValue>;
}

/// Parameters explicitly bound by a caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundParameters {
    values: ConfigMap,
}

impl BoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<ConfigMap> for BoundParameters {
    fn from(values: ConfigMap) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, FieldValue)> for BoundParameters {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

/// Declared configuration as seen by the comparator.
#[derive(Clone, Copy)]
pub enum DeclaredConfig<'a> {
    Map(&'a ConfigMap),
    Bound(&'a BoundParameters),
    Properties(&'a dyn PropertyBag),
}

impl<'a> DeclaredConfig<'a> {
    pub fn shape_name(&self) -> &'static str {
        match self {
            DeclaredConfig::Map(_) => "map",
            DeclaredConfig::Bound(_) => "bound_parameters",
            DeclaredConfig::Properties(_) => "property_bag",
        }
    }

    /// Every declared key, or `None` for a property bag.
    pub fn enumerable_keys(&self) -> Option<Vec<String>> {
        match self {
            DeclaredConfig::Map(map) => Some(map.keys().cloned().collect()),
            DeclaredConfig::Bound(bound) => Some(bound.keys().cloned().collect()),
            DeclaredConfig::Properties(_) => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        match self {
            DeclaredConfig::Map(map) => map.contains_key(key),
            DeclaredConfig::Bound(bound) => bound.contains(key),
            DeclaredConfig::Properties(bag) => bag.has_field(key),
        }
    }

    pub fn get(&self, key: &str) -> Option<FieldValue> {
        match self {
            DeclaredConfig::Map(map) => map.get(key).cloned(),
            DeclaredConfig::Bound(bound) => bound.get(key).cloned(),
            DeclaredConfig::Properties(bag) => bag.get_field(key),
        }
    }
}

impl std::fmt::Debug for DeclaredConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredConfig::Map(map) => f.debug_tuple("Map").field(map).finish(),
            DeclaredConfig::Bound(bound) => f.debug_tuple("Bound").field(bound).finish(),
            DeclaredConfig::Properties(_) => f.write_str("Properties(..)"),
        }
    }
}

impl<'a> From<&'a ConfigMap> for DeclaredConfig<'a> {
    fn from(map: &'a ConfigMap) -> Self {
        DeclaredConfig::Map(map)
    }
}

impl<'a> From<&'a BoundParameters> for DeclaredConfig<'a> {
    fn from(bound: &'a BoundParameters) -> Self {
        DeclaredConfig::Bound(bound)
    }
}
