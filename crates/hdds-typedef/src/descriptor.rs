// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Flat type descriptors and the single-type descriptor builder.
//!
//! A [`TypeDescriptor`] describes one composite type: its fields (name,
//! fully qualified base type, array arity, example value) and its named
//! constants. Building one never recurses; see
//! [`Introspector`](crate::introspect::Introspector) for the closure.

use crate::error::TypedefError;
use crate::field_type::{FieldArity, FieldType};
use crate::instance::MessageInstance;
use crate::names::{is_builtin, is_dunder, is_special, RESERVED_ATTRIBUTES};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// Example shown for array fields of any length.
pub const EMPTY_SEQUENCE_EXAMPLE: &str = "[]";
/// Example shown for scalar nested-message fields.
pub const EMPTY_MAPPING_EXAMPLE: &str = "{}";

/// Order in which constants are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantOrder {
    /// Sorted by constant name.
    #[default]
    Lexicographic,
    /// As enumerated by the registry.
    Declaration,
}

/// Handling of declared field types whose array suffix cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedFieldPolicy {
    /// Fail with [`TypedefError::MalformedFieldType`].
    #[default]
    Reject,
    /// Keep the raw declared string as a scalar base type.
    Scalar,
}

/// Knobs for the descriptor builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescriptorOptions {
    pub constant_order: ConstantOrder,
    pub malformed_field_type: MalformedFieldPolicy,
}

/// Normalized description of one composite type.
///
/// Field sequences are parallel: entry `i` of `field_names`, `field_types`,
/// `field_array_arity` and `field_examples` all describe the same field.
/// Serialized names follow the schema-query `TypeDef` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// `<package>/<Name>`, or the bare name for special types.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "fieldnames")]
    pub field_names: Vec<String>,
    /// Fully qualified base types (array suffix stripped).
    #[serde(rename = "fieldtypes")]
    pub field_types: Vec<String>,
    #[serde(rename = "fieldarraylen")]
    pub field_array_arity: Vec<FieldArity>,
    #[serde(rename = "examples")]
    pub field_examples: Vec<String>,
    #[serde(rename = "constnames")]
    pub const_names: Vec<String>,
    #[serde(rename = "constvalues")]
    pub const_values: Vec<String>,
}

/// Borrowed view of one field of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    pub arity: FieldArity,
    pub example: &'a str,
}

impl TypeDescriptor {
    /// Create a descriptor with no fields or constants.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_names: Vec::new(),
            field_types: Vec::new(),
            field_array_arity: Vec::new(),
            field_examples: Vec::new(),
            const_names: Vec::new(),
            const_values: Vec::new(),
        }
    }

    /// Fixed descriptor for `time` and `duration`; `None` for anything else.
    pub fn special(type_name: &str) -> Option<Self> {
        if !is_special(type_name) {
            return None;
        }
        let mut descriptor = Self::new(type_name);
        descriptor.push_field("secs", "int32", FieldArity::Scalar, "0");
        descriptor.push_field("nsecs", "int32", FieldArity::Scalar, "0");
        Some(descriptor)
    }

    /// Append a field, keeping the field sequences parallel.
    pub fn push_field(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        arity: FieldArity,
        example: impl Into<String>,
    ) {
        self.field_names.push(name.into());
        self.field_types.push(type_name.into());
        self.field_array_arity.push(arity);
        self.field_examples.push(example.into());
    }

    /// Append a constant.
    pub fn push_constant(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.const_names.push(name.into());
        self.const_values.push(value.into());
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }

    /// Iterate over fields.
    pub fn fields(&self) -> impl Iterator<Item = FieldInfo<'_>> {
        self.field_names
            .iter()
            .zip(&self.field_types)
            .zip(&self.field_array_arity)
            .zip(&self.field_examples)
            .map(|(((name, type_name), arity), example)| FieldInfo {
                name,
                type_name,
                arity: *arity,
                example,
            })
    }

    /// Iterate over `(name, value)` constant pairs.
    pub fn constants(&self) -> impl Iterator<Item = (&str, &str)> {
        self.const_names
            .iter()
            .zip(&self.const_values)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Check that the parallel sequences have matching lengths.
    pub fn is_consistent(&self) -> bool {
        let n = self.field_names.len();
        self.field_types.len() == n
            && self.field_array_arity.len() == n
            && self.field_examples.len() == n
            && self.const_names.len() == self.const_values.len()
    }
}

/// Build the descriptor of a single live instance.
///
/// Field types are resolved to their canonical names, examples are
/// synthesized, and every attribute that is neither a field, a
/// `__dunder__` name nor registry bookkeeping is reported as a constant.
pub fn describe_instance<I>(
    instance: &I,
    options: &DescriptorOptions,
) -> Result<TypeDescriptor, TypedefError>
where
    I: MessageInstance + ?Sized,
{
    let mut descriptor = TypeDescriptor::new(instance.runtime_type_name());
    let slots = instance.slots();

    for slot in &slots {
        let field_type = match FieldType::parse(slot.declared_type) {
            Some(field_type) => field_type,
            None => match options.malformed_field_type {
                MalformedFieldPolicy::Reject => {
                    return Err(TypedefError::MalformedFieldType {
                        field: format!("{}.{}", descriptor.type_name, slot.name),
                        declared: slot.declared_type.to_string(),
                    });
                }
                MalformedFieldPolicy::Scalar => {
                    tracing::warn!(
                        "{}.{}: malformed field type '{}', treating as scalar",
                        descriptor.type_name,
                        slot.name,
                        slot.declared_type
                    );
                    FieldType::raw_scalar(slot.declared_type)
                }
            },
        };

        let type_name = canonical_type_name(field_type.base, slot.value);
        let example = example_for(&field_type, slot.value);
        tracing::trace!(
            "{}.{}: {} -> {} (arity {})",
            descriptor.type_name,
            slot.name,
            slot.declared_type,
            type_name,
            field_type.arity.as_i64()
        );
        descriptor.push_field(slot.name, type_name, field_type.arity, example);
    }

    let mut constants: Vec<(&str, String)> = instance
        .attributes()
        .into_iter()
        .filter(|(name, _)| {
            !is_dunder(name)
                && !RESERVED_ATTRIBUTES.contains(name)
                && !slots.iter().any(|slot| slot.name == *name)
        })
        .map(|(name, value)| (name, value.to_string()))
        .collect();

    if options.constant_order == ConstantOrder::Lexicographic {
        constants.sort_by(|a, b| a.0.cmp(b.0));
    }
    for (name, value) in constants {
        descriptor.push_constant(name, value);
    }

    tracing::debug!(
        "described {} ({} fields, {} constants)",
        descriptor.type_name,
        descriptor.field_count(),
        descriptor.const_names.len()
    );
    Ok(descriptor)
}

/// Canonical name of a field's base type.
fn canonical_type_name(base: &str, value: &FieldValue) -> String {
    if is_builtin(base) {
        return base.to_string();
    }
    // Arrays carry no instance identity; declared types are already qualified.
    if value.is_sequence() {
        return base.to_string();
    }
    match value.as_message() {
        Some(msg) => msg.runtime_type_name(),
        None => {
            tracing::warn!(
                "field of type '{}' holds a non-message value, keeping declared name",
                base
            );
            base.to_string()
        }
    }
}

fn example_for(field_type: &FieldType<'_>, value: &FieldValue) -> String {
    if field_type.arity.is_array() {
        EMPTY_SEQUENCE_EXAMPLE.to_string()
    } else if !is_builtin(field_type.base) {
        EMPTY_MAPPING_EXAMPLE.to_string()
    } else {
        value.to_string()
    }
}
