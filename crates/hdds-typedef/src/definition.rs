// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parser for `.msg` / `.srv` definition text.
//!
//! ```text
//! # comment
//! Header header
//! int32 ADD=0              # constant
//! string LABEL=raw # text  # string constants keep the whole remainder
//! geometry_msgs/Point[] points
//! float64[36] covariance
//! ```
//!
//! Field types are resolved the way message generators do: atomic and
//! special types stay as-is, `Header` becomes `std_msgs/Header`, other
//! unqualified names are taken from the definition's own package.

use crate::error::TypedefError;
use crate::field_type::{FieldArity, FieldType};
use crate::names::{is_atomic, is_builtin, split_qualified};
use crate::value::FieldValue;
use md5::{Digest, Md5};

/// Line separating request and response in a `.srv` definition.
pub const SERVICE_SEPARATOR: &str = "---";

/// Largest accepted fixed array size (`T[N]`).
///
/// Registry instances hold one zero element per slot.
pub const MAX_FIXED_ARRAY_LEN: usize = 65_536;

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// Fully qualified base type.
    pub base_type: String,
    pub arity: FieldArity,
}

impl FieldDef {
    /// Declared type as it appears in the slot list (`geometry_msgs/Point[]`).
    pub fn declared_type(&self) -> String {
        format!("{}{}", self.base_type, self.arity)
    }
}

/// A declared constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDef {
    pub name: String,
    pub type_name: String,
    pub value: FieldValue,
}

/// One parsed message (or service half).
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// `<package>/<ClassName>`.
    pub full_name: String,
    /// Runtime namespace (`<package>::msg` or `<package>::srv`).
    pub namespace: String,
    pub class_name: String,
    pub fields: Vec<FieldDef>,
    pub constants: Vec<ConstantDef>,
    /// Original definition text.
    pub text: String,
}

impl MessageDefinition {
    /// Parse a `.msg` definition for `package/Name`.
    pub fn parse(full_name: &str, text: &str) -> Result<Self, TypedefError> {
        let (package, name) = split_full_name(full_name)?;
        Self::parse_part(package, format!("{}::msg", package), name.to_string(), text, 0)
    }

    fn parse_part(
        package: &str,
        namespace: String,
        class_name: String,
        text: &str,
        line_offset: usize,
    ) -> Result<Self, TypedefError> {
        let full_name = format!("{}/{}", package, class_name);
        let mut fields = Vec::new();
        let mut constants = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = line_offset + index + 1;
            let invalid = |reason: String| TypedefError::Definition {
                type_name: full_name.clone(),
                line: line_no,
                reason,
            };

            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let (type_token, rest) = content
                .split_once(char::is_whitespace)
                .ok_or_else(|| invalid(format!("missing field name after '{}'", content)))?;
            let rest = rest.trim();

            if let Some((name, _)) = rest.split_once('=') {
                let name = name.trim();
                check_identifier(name).map_err(&invalid)?;
                if !is_atomic(type_token) {
                    return Err(invalid(format!(
                        "constant '{}' must have an atomic type, got '{}'",
                        name, type_token
                    )));
                }
                // String constants take the raw remainder, comment markers included.
                let literal = if type_token == "string" {
                    raw_constant_literal(line)
                } else {
                    rest.split_once('=').map(|(_, v)| v.trim()).unwrap_or("")
                };
                let value = FieldValue::parse_literal(type_token, literal).ok_or_else(|| {
                    invalid(format!(
                        "invalid {} literal '{}' for constant '{}'",
                        type_token, literal, name
                    ))
                })?;
                constants.push(ConstantDef {
                    name: name.to_string(),
                    type_name: type_token.to_string(),
                    value,
                });
                continue;
            }

            let mut tokens = rest.split_whitespace();
            let name = tokens.next().unwrap_or("");
            if let Some(extra) = tokens.next() {
                return Err(invalid(format!("unexpected token '{}'", extra)));
            }
            check_identifier(name).map_err(&invalid)?;

            let field_type = FieldType::parse(type_token)
                .ok_or_else(|| invalid(format!("malformed field type '{}'", type_token)))?;
            if let FieldArity::Fixed(n) = field_type.arity {
                if n > MAX_FIXED_ARRAY_LEN {
                    return Err(invalid(format!(
                        "fixed array size {} exceeds {}",
                        n, MAX_FIXED_ARRAY_LEN
                    )));
                }
            }
            fields.push(FieldDef {
                name: name.to_string(),
                base_type: resolve_type(package, field_type.base),
                arity: field_type.arity,
            });
        }

        Ok(Self {
            full_name,
            namespace,
            class_name,
            fields,
            constants,
            text: text.to_string(),
        })
    }

    /// Check if the first field is a `std_msgs/Header` named `header`.
    pub fn has_header(&self) -> bool {
        self.fields.first().is_some_and(|f| {
            f.name == "header" && f.base_type == "std_msgs/Header" && f.arity == FieldArity::Scalar
        })
    }

    /// MD5 over this definition's own normalized text (comments and blank
    /// lines dropped).
    ///
    /// Nested types are hashed by name only, so this is a local change
    /// detector and not the ROS wire checksum.
    pub fn md5sum(&self) -> String {
        let mut hasher = Md5::new();
        for constant in &self.constants {
            hasher.update(
                format!("{} {}={}\n", constant.type_name, constant.name, constant.value)
                    .as_bytes(),
            );
        }
        for field in &self.fields {
            hasher.update(format!("{} {}\n", field.declared_type(), field.name).as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// A parsed `.srv` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    /// `<package>/<Name>`.
    pub full_name: String,
    pub request: MessageDefinition,
    pub response: MessageDefinition,
}

impl ServiceDefinition {
    /// Parse a `.srv` definition for `package/Name`.
    pub fn parse(full_name: &str, text: &str) -> Result<Self, TypedefError> {
        let (package, name) = split_full_name(full_name)?;

        let mut lines = text.lines();
        let request_text: Vec<&str> = lines
            .by_ref()
            .take_while(|line| line.trim() != SERVICE_SEPARATOR)
            .collect();
        let response_text: Vec<&str> = lines.collect();

        if request_text.len() == text.lines().count() {
            return Err(TypedefError::Definition {
                type_name: full_name.to_string(),
                line: request_text.len(),
                reason: format!("missing '{}' separator", SERVICE_SEPARATOR),
            });
        }

        let namespace = format!("{}::srv", package);
        let request = MessageDefinition::parse_part(
            package,
            namespace.clone(),
            format!("{}Request", name),
            &request_text.join("\n"),
            0,
        )?;
        let response = MessageDefinition::parse_part(
            package,
            namespace,
            format!("{}Response", name),
            &response_text.join("\n"),
            request_text.len() + 1,
        )?;

        Ok(Self {
            full_name: full_name.to_string(),
            request,
            response,
        })
    }
}

/// Resolve a base type against the definition's package.
pub fn resolve_type(package: &str, base: &str) -> String {
    if is_builtin(base) || base.contains('/') {
        base.to_string()
    } else if base == "Header" {
        "std_msgs/Header".to_string()
    } else {
        format!("{}/{}", package, base)
    }
}

fn split_full_name(full_name: &str) -> Result<(&str, &str), TypedefError> {
    split_qualified(full_name).ok_or_else(|| TypedefError::Definition {
        type_name: full_name.to_string(),
        line: 0,
        reason: "type name must be <package>/<Name>".to_string(),
    })
}

fn raw_constant_literal(line: &str) -> &str {
    line.split_once('=').map(|(_, v)| v.trim()).unwrap_or("")
}

fn check_identifier(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(format!("invalid name '{}'", name))
    }
}
