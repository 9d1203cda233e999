// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message instances as seen by the descriptor builder.
//!
//! [`MessageInstance`] is the capability interface a registry hands out:
//! ordered `(name, declared type, value)` slots, a runtime identity and the
//! raw attribute enumeration from which constants are extracted.
//! [`DynamicMessage`] is the concrete, type-erased implementation used by
//! [`DefinitionRegistry`](crate::registry::DefinitionRegistry) and for nested
//! field values.

use crate::names::qualified_name;
use crate::value::FieldValue;
use std::fmt;

/// One declared field of an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot<'a> {
    /// Field identifier.
    pub name: &'a str,
    /// Declared type, possibly array-suffixed (`geometry_msgs/Point[]`).
    pub declared_type: &'a str,
    /// Current (default or zero) value.
    pub value: &'a FieldValue,
}

/// Introspection surface of a live message instance.
pub trait MessageInstance {
    /// Runtime namespace of the instance's type (`geometry_msgs::msg`).
    fn namespace(&self) -> &str;

    /// Runtime class name (`Point`, `AddTwoIntsRequest`).
    fn class_name(&self) -> &str;

    /// Declared fields in declaration order.
    fn slots(&self) -> Vec<Slot<'_>>;

    /// Every non-callable attribute, in the registry's enumeration order.
    ///
    /// May include fields, reserved `__dunder__` names and registry
    /// bookkeeping; the descriptor builder filters those out.
    fn attributes(&self) -> Vec<(&str, &FieldValue)>;

    /// `<package>/<ClassName>` derived from the runtime identity.
    fn runtime_type_name(&self) -> String {
        qualified_name(self.namespace(), self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FieldSlot {
    name: String,
    declared_type: String,
    value: FieldValue,
}

/// Type-erased message instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    namespace: String,
    class_name: String,
    fields: Vec<FieldSlot>,
    attributes: Vec<(String, FieldValue)>,
}

impl DynamicMessage {
    /// Create an instance with no fields.
    pub fn new(namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
            fields: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Append a field.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        declared_type: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        self.push_field(name, declared_type, value);
        self
    }

    /// Append a non-field attribute (constant or bookkeeping entry).
    pub fn with_attribute(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.push_attribute(name, value);
        self
    }

    pub fn push_field(
        &mut self,
        name: impl Into<String>,
        declared_type: impl Into<String>,
        value: FieldValue,
    ) {
        self.fields.push(FieldSlot {
            name: name.into(),
            declared_type: declared_type.into(),
            value,
        });
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: FieldValue) {
        self.attributes.push((name.into(), value));
    }

    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| &slot.value)
    }

    /// Replace a field value. Returns `false` if the field does not exist.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        match self.fields.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => {
                slot.value = value;
                true
            }
            None => false,
        }
    }

    /// Get a non-field attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&FieldValue> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl MessageInstance for DynamicMessage {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn slots(&self) -> Vec<Slot<'_>> {
        self.fields
            .iter()
            .map(|slot| Slot {
                name: &slot.name,
                declared_type: &slot.declared_type,
                value: &slot.value,
            })
            .collect()
    }

    fn attributes(&self) -> Vec<(&str, &FieldValue)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .chain(
                self.fields
                    .iter()
                    .map(|slot| (slot.name.as_str(), &slot.value)),
            )
            .collect()
    }
}

impl fmt::Display for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, slot) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", slot.name, slot.value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> DynamicMessage {
        DynamicMessage::new("geometry_msgs::msg", "Point")
            .with_field("x", "float64", FieldValue::Float(1.0))
            .with_field("y", "float64", FieldValue::Float(2.0))
            .with_attribute("_type", FieldValue::String("geometry_msgs/Point".into()))
    }

    #[test]
    fn test_slots_preserve_order() {
        let msg = point();
        let names: Vec<_> = msg.slots().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(msg.runtime_type_name(), "geometry_msgs/Point");
    }

    #[test]
    fn test_attributes_include_fields_after_extras() {
        let msg = point();
        let names: Vec<_> = msg.attributes().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["_type", "x", "y"]);
    }

    #[test]
    fn test_set_field() {
        let mut msg = point();
        assert!(msg.set_field("x", FieldValue::Float(5.0)));
        assert!(!msg.set_field("z", FieldValue::Float(5.0)));
        assert_eq!(msg.field("x"), Some(&FieldValue::Float(5.0)));
        assert_eq!(msg.field_count(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(point().to_string(), "{x: 1.0, y: 2.0}");
        assert_eq!(DynamicMessage::new("a::msg", "Empty").to_string(), "{}");
    }
}
