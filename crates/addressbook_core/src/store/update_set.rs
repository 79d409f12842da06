//! Minimal update sets for conditional item updates.
//!
//! An `UpdateSet` is the list of attributes whose values must change,
//! each bound to generated name and value placeholders:
//!
//! ```text
//! SET #attr0 = :val0, #attr1 = :val1
//! ```
//!
//! # Invariants
//! - Placeholders are unique within one set and numbered in insertion order.
//! - An attribute appears at most once.

use crate::model::record::{AttributeValue, Record};
use std::collections::BTreeMap;

/// One `attribute = value` assignment with its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEntry {
    pub attribute: String,
    /// Attribute name placeholder, e.g. `#attr0`.
    pub name_placeholder: String,
    /// Value placeholder, e.g. `:val0`.
    pub value_placeholder: String,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    entries: Vec<UpdateEntry>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the attributes of `partial` whose values differ from `current`.
    ///
    /// Comparison is strict equality per attribute. An attribute missing from
    /// `current` counts as different. Attributes absent from `partial` are
    /// never included.
    pub fn diff(current: &Record, partial: &Record) -> Self {
        let mut set = Self::new();
        for (attribute, value) in partial {
            if current.get(attribute) != Some(value) {
                set.set(attribute.clone(), value.clone());
            }
        }
        set
    }

    /// Adds or replaces the assignment for `attribute`.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) {
        let attribute = attribute.into();
        let value = value.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.attribute == attribute)
        {
            entry.value = value;
            return;
        }

        let index = self.entries.len();
        self.entries.push(UpdateEntry {
            attribute,
            name_placeholder: format!("#attr{index}"),
            value_placeholder: format!(":val{index}"),
            value,
        });
    }

    pub fn entries(&self) -> &[UpdateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names touched by this set, in assignment order.
    pub fn attributes(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.attribute.as_str())
            .collect()
    }

    /// Renders the update expression, e.g. `SET #attr0 = :val0`.
    ///
    /// Returns an empty string for an empty set.
    pub fn expression(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let assignments = self
            .entries
            .iter()
            .map(|entry| format!("{} = {}", entry.name_placeholder, entry.value_placeholder))
            .collect::<Vec<_>>();
        format!("SET {}", assignments.join(", "))
    }

    pub fn expression_attribute_names(&self) -> BTreeMap<&str, &str> {
        self.entries
            .iter()
            .map(|entry| (entry.name_placeholder.as_str(), entry.attribute.as_str()))
            .collect()
    }

    pub fn expression_attribute_values(&self) -> BTreeMap<&str, &AttributeValue> {
        self.entries
            .iter()
            .map(|entry| (entry.value_placeholder.as_str(), &entry.value))
            .collect()
    }

    /// Returns `record` with every assignment applied.
    pub fn apply_to(&self, record: &Record) -> Record {
        let mut updated = record.clone();
        for entry in &self.entries {
            updated.insert(entry.attribute.clone(), entry.value.clone());
        }
        updated
    }
}
