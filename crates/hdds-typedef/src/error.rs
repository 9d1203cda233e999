// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for type introspection.

use std::fmt;
use thiserror::Error;

/// Which half of the registry a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Message,
    ServiceRequest,
    ServiceResponse,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Message => write!(f, "message"),
            LookupKind::ServiceRequest => write!(f, "service request"),
            LookupKind::ServiceResponse => write!(f, "service response"),
        }
    }
}

/// Introspection errors.
#[derive(Debug, Error)]
pub enum TypedefError {
    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: LookupKind, name: String },

    #[error("Malformed field type for '{field}': {declared}")]
    MalformedFieldType { field: String, declared: String },

    #[error("Invalid definition for {type_name} (line {line}): {reason}")]
    Definition {
        type_name: String,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TypedefError {
    pub(crate) fn unknown(kind: LookupKind, name: impl Into<String>) -> Self {
        Self::UnknownType {
            kind,
            name: name.into(),
        }
    }
}
