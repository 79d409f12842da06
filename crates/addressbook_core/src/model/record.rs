//! Storage-shaped record model.
//!
//! # Responsibility
//! - Define the attribute map persisted by the item store.
//! - Define the key shape addressing one stored record.
//!
//! # Invariants
//! - Attribute values are scalars only.
//! - Records persisted by services always carry `id` and `deleted`.
//! - `deleted == true` marks a soft-deleted (tombstoned) record.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Primary identifier attribute name.
pub const ID_ATTRIBUTE: &str = "id";
/// Soft-delete flag attribute name.
pub const DELETED_ATTRIBUTE: &str = "deleted";

/// Scalar attribute value.
///
/// Equality is strict: `Integer(1)` and `Float(1.0)` are different values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Attribute map representing one stored entity row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for literals in services and tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns the text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn id(&self) -> Option<&str> {
        self.text(ID_ATTRIBUTE)
    }

    /// Returns whether the soft-delete flag is set.
    ///
    /// A missing or non-boolean `deleted` attribute counts as live.
    pub fn is_deleted(&self) -> bool {
        self.get(DELETED_ATTRIBUTE)
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false)
    }

    pub fn set_deleted(&mut self, deleted: bool) {
        self.attributes
            .insert(DELETED_ATTRIBUTE.to_string(), AttributeValue::Bool(deleted));
    }
}

impl FromIterator<(String, AttributeValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

/// Primary identifier attribute(s) addressing exactly one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey {
    attributes: BTreeMap<String, AttributeValue>,
}

impl RecordKey {
    /// Creates the common single-attribute `{ "id": <id> }` key.
    pub fn id(id: impl Into<String>) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(ID_ATTRIBUTE.to_string(), AttributeValue::Text(id.into()));
        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.attributes.iter()
    }

    /// Stable text form used as the physical row key.
    ///
    /// Attribute order is deterministic because keys are held in a `BTreeMap`.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.attributes)
    }
}

impl FromIterator<(String, AttributeValue)> for RecordKey {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, value) in &self.attributes {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
