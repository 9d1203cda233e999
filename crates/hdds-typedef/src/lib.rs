// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HDDS Type Introspection
//!
//! Extracts normalized type descriptors for message, service-request and
//! service-response types from a type registry, and expands them into the
//! deduplicated closure of every type reachable through their fields.
//!
//! # Features
//!
//! - **TypeDescriptor**: flat description of one type (fields, base types,
//!   array arity, example values, constants)
//! - **Introspector**: single descriptors and depth-first closures with cycle
//!   detection
//! - **TypeRegistry**: boundary trait for any source of live instances
//! - **DefinitionRegistry**: in-memory registry built from `.msg` / `.srv` text
//!
//! # Architecture
//!
//! ```text
//!   caller
//!     |
//!     v
//!   Introspector  (recursion, "types seen" set)
//!     |
//!     v
//!   TypeRegistry -> MessageInstance -> describe_instance -> TypeDescriptor
//! ```
//!
//! # Example
//!
//! ```rust
//! use hdds_typedef::{DefinitionRegistry, FieldArity, Introspector};
//!
//! let mut registry = DefinitionRegistry::new();
//! registry.add_message("test_msgs/Ids", "int32[3] ids\n").unwrap();
//!
//! let introspector = Introspector::new(registry);
//! let desc = introspector.type_descriptor("test_msgs/Ids").unwrap().unwrap();
//! assert_eq!(desc.field_types, ["int32"]);
//! assert_eq!(desc.field_array_arity, [FieldArity::Fixed(3)]);
//! ```

pub mod config;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod field_type;
pub mod instance;
pub mod introspect;
pub mod names;
pub mod registry;
pub mod value;

pub use config::{ConfigError, TypedefConfig};
pub use definition::{MessageDefinition, ServiceDefinition};
pub use descriptor::{
    describe_instance, ConstantOrder, DescriptorOptions, FieldInfo, MalformedFieldPolicy,
    TypeDescriptor,
};
pub use error::{LookupKind, TypedefError};
pub use field_type::{FieldArity, FieldType};
pub use instance::{DynamicMessage, MessageInstance, Slot};
pub use introspect::Introspector;
pub use registry::{DefinitionRegistry, TypeRegistry};
pub use value::{FieldValue, Stamp};
