// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Live field values carried by message instances.

use crate::instance::DynamicMessage;
use std::fmt;

/// A `time` or `duration` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stamp {
    pub secs: i32,
    pub nsecs: i32,
}

impl Stamp {
    pub fn new(secs: i32, nsecs: i32) -> Self {
        Self { secs, nsecs }
    }

    /// Total nanoseconds.
    pub fn to_nanos(&self) -> i64 {
        i64::from(self.secs) * 1_000_000_000 + i64::from(self.nsecs)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_nanos())
    }
}

/// The current value of a field or constant.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Time(Stamp),
    Duration(Stamp),
    /// Any array, variable or fixed length.
    Sequence(Vec<FieldValue>),
    /// A nested message instance.
    Message(Box<DynamicMessage>),
    /// A list of strings (registry bookkeeping such as `_slot_types`).
    Names(Vec<String>),
}

impl FieldValue {
    /// Check if this value is an array.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Nested message, if any.
    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Self::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// Zero value for an atomic or special type name.
    pub fn zero_of(type_name: &str) -> Option<Self> {
        let value = match type_name {
            "bool" => Self::Bool(false),
            "int8" | "int16" | "int32" | "int64" | "byte" => Self::Int(0),
            "uint8" | "uint16" | "uint32" | "uint64" | "char" => Self::UInt(0),
            "float32" | "float64" => Self::Float(0.0),
            "string" => Self::String(String::new()),
            "time" => Self::Time(Stamp::default()),
            "duration" => Self::Duration(Stamp::default()),
            _ => return None,
        };
        Some(value)
    }

    /// Parse a constant literal declared with an atomic type.
    pub fn parse_literal(type_name: &str, literal: &str) -> Option<Self> {
        let literal = literal.trim();
        let value = match type_name {
            "bool" => match literal {
                "True" | "true" | "1" => Self::Bool(true),
                "False" | "false" | "0" => Self::Bool(false),
                _ => return None,
            },
            "int8" | "int16" | "int32" | "int64" | "byte" => Self::Int(literal.parse().ok()?),
            "uint8" | "uint16" | "uint32" | "uint64" | "char" => Self::UInt(literal.parse().ok()?),
            "float32" | "float64" => Self::Float(literal.parse().ok()?),
            "string" => Self::String(literal.to_string()),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::String(v) => f.write_str(v),
            Self::Time(stamp) | Self::Duration(stamp) => write!(f, "{}", stamp),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Self::String(s) => write!(f, "{:?}", s)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                f.write_str("]")
            }
            Self::Message(msg) => write!(f, "{}", msg),
            Self::Names(names) => write!(f, "{:?}", names),
        }
    }
}
