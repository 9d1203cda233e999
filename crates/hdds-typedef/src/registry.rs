// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registries: the boundary that turns type names into live instances.

use crate::definition::{FieldDef, MessageDefinition, ServiceDefinition};
use crate::error::TypedefError;
use crate::field_type::FieldArity;
use crate::instance::DynamicMessage;
use crate::instance::MessageInstance;
use crate::names::split_qualified;
use crate::value::FieldValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ---------------------------------------------------------------------------
// TypeRegistry trait
// ---------------------------------------------------------------------------

/// Source of representative instances for message and service types.
///
/// Implementations return an instance with every field populated (default
/// or zero values), or `None` when the name is unknown.
pub trait TypeRegistry {
    type Instance: MessageInstance;

    /// Instance of a message type (`geometry_msgs/Point`).
    fn message_instance(&self, type_name: &str) -> Option<Self::Instance>;

    /// Instance of a service's request half.
    fn service_request_instance(&self, service_type: &str) -> Option<Self::Instance>;

    /// Instance of a service's response half.
    fn service_response_instance(&self, service_type: &str) -> Option<Self::Instance>;
}

impl<R: TypeRegistry + ?Sized> TypeRegistry for &R {
    type Instance = R::Instance;

    fn message_instance(&self, type_name: &str) -> Option<Self::Instance> {
        (**self).message_instance(type_name)
    }

    fn service_request_instance(&self, service_type: &str) -> Option<Self::Instance> {
        (**self).service_request_instance(service_type)
    }

    fn service_response_instance(&self, service_type: &str) -> Option<Self::Instance> {
        (**self).service_response_instance(service_type)
    }
}

// ---------------------------------------------------------------------------
// DefinitionRegistry
// ---------------------------------------------------------------------------

/// In-memory registry built from `.msg` / `.srv` definition text.
#[derive(Debug, Default, Clone)]
pub struct DefinitionRegistry {
    messages: BTreeMap<String, MessageDefinition>,
    services: BTreeMap<String, ServiceDefinition>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a message type from its definition text.
    pub fn add_message(&mut self, full_name: &str, text: &str) -> Result<(), TypedefError> {
        let definition = MessageDefinition::parse(full_name, text)?;
        self.messages.insert(full_name.to_string(), definition);
        Ok(())
    }

    /// Register (or replace) a service type from its definition text.
    pub fn add_service(&mut self, full_name: &str, text: &str) -> Result<(), TypedefError> {
        let definition = ServiceDefinition::parse(full_name, text)?;
        self.services.insert(full_name.to_string(), definition);
        Ok(())
    }

    /// Load every package found under the given directories.
    ///
    /// Types already known (from an earlier path or an explicit `add_*`
    /// call) are kept. Returns the number of newly loaded types.
    pub fn load_package_paths<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<usize, TypedefError> {
        let mut loaded = 0;
        for path in paths {
            loaded += self.load_package_path(path.as_ref())?;
        }
        Ok(loaded)
    }

    /// Load packages from one directory.
    ///
    /// `path` may itself be a package (containing `msg/` or `srv/`), or a
    /// directory whose children are packages.
    pub fn load_package_path(&mut self, path: &Path) -> Result<usize, TypedefError> {
        if is_package_dir(path) {
            return self.load_package(path);
        }

        let mut loaded = 0;
        for package_dir in sorted_entries(path)? {
            if is_package_dir(&package_dir) {
                loaded += self.load_package(&package_dir)?;
            }
        }
        tracing::debug!("loaded {} types from {}", loaded, path.display());
        Ok(loaded)
    }

    fn load_package(&mut self, package_dir: &Path) -> Result<usize, TypedefError> {
        let Some(package) = package_dir.file_name().and_then(|n| n.to_str()) else {
            return Ok(0);
        };

        let mut loaded = 0;
        for (subdir, extension) in [("msg", "msg"), ("srv", "srv")] {
            let dir = package_dir.join(subdir);
            if !dir.is_dir() {
                continue;
            }
            for file in sorted_entries(&dir)? {
                if file.extension().and_then(|e| e.to_str()) != Some(extension) {
                    continue;
                }
                let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let full_name = format!("{}/{}", package, stem);
                let known = match extension {
                    "msg" => self.messages.contains_key(&full_name),
                    _ => self.services.contains_key(&full_name),
                };
                if known {
                    tracing::debug!("{} already loaded, skipping {}", full_name, file.display());
                    continue;
                }

                let text = fs::read_to_string(&file)?;
                match extension {
                    "msg" => self.add_message(&full_name, &text)?,
                    _ => self.add_service(&full_name, &text)?,
                }
                tracing::trace!("loaded {} from {}", full_name, file.display());
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Known message type names, sorted.
    pub fn message_types(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Known service type names, sorted.
    pub fn service_types(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Parsed definition of a message type.
    pub fn message_definition(&self, type_name: &str) -> Option<&MessageDefinition> {
        self.messages.get(type_name)
    }

    /// Parsed definition of a service type.
    pub fn service_definition(&self, service_type: &str) -> Option<&ServiceDefinition> {
        self.services.get(service_type)
    }

    /// Total number of message and service types.
    pub fn len(&self) -> usize {
        self.messages.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.services.is_empty()
    }

    /// Default-construct an instance of `definition`.
    ///
    /// `stack` holds the message types currently under construction; a
    /// nested field whose type is already on it becomes an unpopulated
    /// shell so that self-referencing types terminate.
    fn instantiate(&self, definition: &MessageDefinition, stack: &mut Vec<String>) -> DynamicMessage {
        stack.push(definition.full_name.clone());

        let mut msg = DynamicMessage::new(&definition.namespace, &definition.class_name);
        msg.push_attribute(
            "__slots__",
            FieldValue::Names(definition.fields.iter().map(|f| f.name.clone()).collect()),
        );
        msg.push_attribute("_md5sum", FieldValue::String(definition.md5sum()));
        msg.push_attribute("_type", FieldValue::String(definition.full_name.clone()));
        msg.push_attribute("_has_header", FieldValue::Bool(definition.has_header()));
        msg.push_attribute("_full_text", FieldValue::String(definition.text.clone()));
        msg.push_attribute(
            "_slot_types",
            FieldValue::Names(definition.fields.iter().map(FieldDef::declared_type).collect()),
        );
        for constant in &definition.constants {
            msg.push_attribute(&constant.name, constant.value.clone());
        }

        for field in &definition.fields {
            let value = self.zero_value(field, stack);
            msg.push_field(&field.name, field.declared_type(), value);
        }

        stack.pop();
        msg
    }

    fn zero_value(&self, field: &FieldDef, stack: &mut Vec<String>) -> FieldValue {
        match field.arity {
            FieldArity::Unbounded => FieldValue::Sequence(Vec::new()),
            FieldArity::Fixed(n) => FieldValue::Sequence(
                (0..n)
                    .map(|_| self.scalar_zero(&field.base_type, stack))
                    .collect(),
            ),
            FieldArity::Scalar => self.scalar_zero(&field.base_type, stack),
        }
    }

    fn scalar_zero(&self, base_type: &str, stack: &mut Vec<String>) -> FieldValue {
        if let Some(value) = FieldValue::zero_of(base_type) {
            return value;
        }

        let nested = match self.messages.get(base_type) {
            Some(definition) if !stack.iter().any(|t| t == base_type) => {
                self.instantiate(definition, stack)
            }
            Some(definition) => {
                DynamicMessage::new(&definition.namespace, &definition.class_name)
            }
            // Unknown here; the lookup fails once the type itself is requested.
            None => match split_qualified(base_type) {
                Some((package, name)) => DynamicMessage::new(format!("{}::msg", package), name),
                None => DynamicMessage::new(base_type, base_type),
            },
        };
        FieldValue::Message(Box::new(nested))
    }
}

impl TypeRegistry for DefinitionRegistry {
    type Instance = DynamicMessage;

    fn message_instance(&self, type_name: &str) -> Option<DynamicMessage> {
        let definition = self.messages.get(type_name)?;
        Some(self.instantiate(definition, &mut Vec::new()))
    }

    fn service_request_instance(&self, service_type: &str) -> Option<DynamicMessage> {
        let definition = self.services.get(service_type)?;
        Some(self.instantiate(&definition.request, &mut Vec::new()))
    }

    fn service_response_instance(&self, service_type: &str) -> Option<DynamicMessage> {
        let definition = self.services.get(service_type)?;
        Some(self.instantiate(&definition.response, &mut Vec::new()))
    }
}

fn is_package_dir(path: &Path) -> bool {
    path.join("msg").is_dir() || path.join("srv").is_dir()
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>, TypedefError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Stamp;

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry
            .add_message("std_msgs/Header", "uint32 seq\ntime stamp\nstring frame_id\n")
            .unwrap();
        registry
            .add_message("geometry_msgs/Point", "float64 x\nfloat64 y\nfloat64 z\n")
            .unwrap();
        registry
            .add_message(
                "geometry_msgs/PointStamped",
                "Header header\nPoint point\nPoint[2] corners\n",
            )
            .unwrap();
        registry
            .add_service("rospy_tutorials/AddTwoInts", "int64 a\nint64 b\n---\nint64 sum\n")
            .unwrap();
        registry
    }

    #[test]
    fn test_message_instance_zero_values() {
        let registry = registry();
        let msg = registry.message_instance("geometry_msgs/PointStamped").unwrap();
        assert_eq!(msg.runtime_type_name(), "geometry_msgs/PointStamped");

        let header = msg.field("header").and_then(FieldValue::as_message).unwrap();
        assert_eq!(header.runtime_type_name(), "std_msgs/Header");
        assert_eq!(header.field("stamp"), Some(&FieldValue::Time(Stamp::default())));

        match msg.field("corners") {
            Some(FieldValue::Sequence(items)) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(|v| v.as_message().is_some()));
            }
            other => panic!("unexpected corners value: {other:?}"),
        }
        assert_eq!(msg.attribute("_has_header"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_service_halves() {
        let registry = registry();
        let req = registry
            .service_request_instance("rospy_tutorials/AddTwoInts")
            .unwrap();
        assert_eq!(req.runtime_type_name(), "rospy_tutorials/AddTwoIntsRequest");
        assert_eq!(req.field_count(), 2);

        let resp = registry
            .service_response_instance("rospy_tutorials/AddTwoInts")
            .unwrap();
        assert_eq!(resp.runtime_type_name(), "rospy_tutorials/AddTwoIntsResponse");
        assert!(registry.service_request_instance("nope/Nope").is_none());
    }

    #[test]
    fn test_self_reference_builds_shell() {
        let mut registry = DefinitionRegistry::new();
        registry.add_message("test_msgs/Node", "Node next\nint32 value\n").unwrap();

        let msg = registry.message_instance("test_msgs/Node").unwrap();
        let next = msg.field("next").and_then(FieldValue::as_message).unwrap();
        assert_eq!(next.runtime_type_name(), "test_msgs/Node");
        assert_eq!(next.field_count(), 0);
    }

    #[test]
    fn test_unknown_nested_type_keeps_identity() {
        let mut registry = DefinitionRegistry::new();
        registry.add_message("test_msgs/Outer", "missing_msgs/Gone inner\n").unwrap();

        let msg = registry.message_instance("test_msgs/Outer").unwrap();
        let inner = msg.field("inner").and_then(FieldValue::as_message).unwrap();
        assert_eq!(inner.runtime_type_name(), "missing_msgs/Gone");
    }

    #[test]
    fn test_listing() {
        let registry = registry();
        let messages: Vec<_> = registry.message_types().collect();
        assert_eq!(
            messages,
            vec!["geometry_msgs/Point", "geometry_msgs/PointStamped", "std_msgs/Header"]
        );
        assert_eq!(registry.service_types().count(), 1);
        assert_eq!(registry.len(), 4);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_load_package_paths() {
        let dir = tempfile::tempdir().unwrap();
        let msg_dir = dir.path().join("demo_msgs").join("msg");
        let srv_dir = dir.path().join("demo_msgs").join("srv");
        fs::create_dir_all(&msg_dir).unwrap();
        fs::create_dir_all(&srv_dir).unwrap();
        fs::write(msg_dir.join("Point.msg"), "float64 x\nfloat64 y\n").unwrap();
        fs::write(msg_dir.join("README.txt"), "ignored").unwrap();
        fs::write(srv_dir.join("Reset.srv"), "---\nbool ok\n").unwrap();
        fs::create_dir_all(dir.path().join("not_a_package")).unwrap();

        let mut registry = DefinitionRegistry::new();
        let loaded = registry.load_package_paths([dir.path()]).unwrap();
        assert_eq!(loaded, 2);
        assert!(registry.message_definition("demo_msgs/Point").is_some());
        assert!(registry.service_definition("demo_msgs/Reset").is_some());

        // Package directory given directly; everything is already known.
        let again = registry
            .load_package_path(&dir.path().join("demo_msgs"))
            .unwrap();
        assert_eq!(again, 0);
    }

    #[test]
    fn test_load_reports_bad_definition() {
        let dir = tempfile::tempdir().unwrap();
        let msg_dir = dir.path().join("bad_msgs").join("msg");
        fs::create_dir_all(&msg_dir).unwrap();
        fs::write(msg_dir.join("Bad.msg"), "int32\n").unwrap();

        let mut registry = DefinitionRegistry::new();
        let err = registry.load_package_paths([dir.path()]).unwrap_err();
        assert!(matches!(err, TypedefError::Definition { .. }));
    }
}
