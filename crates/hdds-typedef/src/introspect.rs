// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single descriptors and transitive descriptor closures.
//!
//! The [`Introspector`] owns all recursion: it asks the registry for
//! instances, hands each one to the descriptor builder, and walks field
//! types depth-first while a per-call "types seen" set stops cycles.

use crate::descriptor::{describe_instance, DescriptorOptions, TypeDescriptor};
use crate::error::{LookupKind, TypedefError};
use crate::names::is_atomic;
use crate::registry::TypeRegistry;
use std::collections::HashSet;

/// Descriptor queries over a [`TypeRegistry`].
///
/// # Example
///
/// ```rust
/// use hdds_typedef::{DefinitionRegistry, Introspector};
///
/// let mut registry = DefinitionRegistry::new();
/// registry.add_message("geometry_msgs/Point", "float64 x\nfloat64 y\n").unwrap();
/// registry.add_message("geometry_msgs/Polygon", "Point[] points\n").unwrap();
///
/// let introspector = Introspector::new(registry);
/// let closure = introspector.type_descriptor_closure("geometry_msgs/Polygon").unwrap();
/// let names: Vec<_> = closure.iter().map(|d| d.type_name.as_str()).collect();
/// assert_eq!(names, ["geometry_msgs/Polygon", "geometry_msgs/Point"]);
/// ```
#[derive(Debug, Clone)]
pub struct Introspector<R> {
    registry: R,
    options: DescriptorOptions,
}

impl<R: TypeRegistry> Introspector<R> {
    /// Create an introspector with default builder options.
    pub fn new(registry: R) -> Self {
        Self::with_options(registry, DescriptorOptions::default())
    }

    /// Create an introspector with explicit builder options.
    pub fn with_options(registry: R, options: DescriptorOptions) -> Self {
        Self { registry, options }
    }

    /// Underlying registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn options(&self) -> &DescriptorOptions {
        &self.options
    }

    /// Descriptor of a message type.
    ///
    /// Returns `Ok(None)` for atomic types, the fixed shape for `time` and
    /// `duration`, and fails with `UnknownType` if the registry has no such
    /// type.
    pub fn type_descriptor(&self, type_name: &str) -> Result<Option<TypeDescriptor>, TypedefError> {
        if is_atomic(type_name) {
            return Ok(None);
        }
        if let Some(special) = TypeDescriptor::special(type_name) {
            return Ok(Some(special));
        }

        let instance = self
            .registry
            .message_instance(type_name)
            .ok_or_else(|| TypedefError::unknown(LookupKind::Message, type_name))?;
        describe_instance(&instance, &self.options).map(Some)
    }

    /// Descriptor of a service's request type.
    pub fn service_request_descriptor(
        &self,
        service_type: &str,
    ) -> Result<TypeDescriptor, TypedefError> {
        let instance = self
            .registry
            .service_request_instance(service_type)
            .ok_or_else(|| TypedefError::unknown(LookupKind::ServiceRequest, service_type))?;
        describe_instance(&instance, &self.options)
    }

    /// Descriptor of a service's response type.
    pub fn service_response_descriptor(
        &self,
        service_type: &str,
    ) -> Result<TypeDescriptor, TypedefError> {
        let instance = self
            .registry
            .service_response_instance(service_type)
            .ok_or_else(|| TypedefError::unknown(LookupKind::ServiceResponse, service_type))?;
        describe_instance(&instance, &self.options)
    }

    /// Descriptors of a type and every type reachable through its fields.
    ///
    /// Depth-first pre-order: the root comes first, then each field type
    /// fully expanded in declaration order. Every type appears once, at
    /// its first position. Atomic roots yield an empty list.
    pub fn type_descriptor_closure(
        &self,
        type_name: &str,
    ) -> Result<Vec<TypeDescriptor>, TypedefError> {
        let mut seen = HashSet::new();
        let mut closure = Vec::new();
        self.expand(type_name, &mut seen, &mut closure)?;
        Ok(closure)
    }

    /// Closure of a service's request type.
    pub fn service_request_descriptor_closure(
        &self,
        service_type: &str,
    ) -> Result<Vec<TypeDescriptor>, TypedefError> {
        let root = self.service_request_descriptor(service_type)?;
        self.closure_from(root)
    }

    /// Closure of a service's response type.
    pub fn service_response_descriptor_closure(
        &self,
        service_type: &str,
    ) -> Result<Vec<TypeDescriptor>, TypedefError> {
        let root = self.service_response_descriptor(service_type)?;
        self.closure_from(root)
    }

    fn closure_from(&self, root: TypeDescriptor) -> Result<Vec<TypeDescriptor>, TypedefError> {
        let mut seen = HashSet::new();
        seen.insert(root.type_name.clone());
        let mut closure = Vec::new();
        self.emit(root, &mut seen, &mut closure)?;
        Ok(closure)
    }

    fn expand(
        &self,
        type_name: &str,
        seen: &mut HashSet<String>,
        closure: &mut Vec<TypeDescriptor>,
    ) -> Result<(), TypedefError> {
        if !seen.insert(type_name.to_string()) {
            tracing::trace!("{} already seen, skipping", type_name);
            return Ok(());
        }

        match self.type_descriptor(type_name)? {
            Some(descriptor) => self.emit(descriptor, seen, closure),
            None => Ok(()),
        }
    }

    /// Push `descriptor`, then expand its field types in order.
    fn emit(
        &self,
        descriptor: TypeDescriptor,
        seen: &mut HashSet<String>,
        closure: &mut Vec<TypeDescriptor>,
    ) -> Result<(), TypedefError> {
        let field_types = descriptor.field_types.clone();
        tracing::debug!(
            "closure[{}] = {} ({} field types)",
            closure.len(),
            descriptor.type_name,
            field_types.len()
        );
        closure.push(descriptor);

        for field_type in &field_types {
            self.expand(field_type, seen, closure)?;
        }
        Ok(())
    }
}
