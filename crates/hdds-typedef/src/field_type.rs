// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Classification of declared field types (`int32`, `Point[]`, `float64[9]`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Array arity of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldArity {
    /// Plain field.
    Scalar,
    /// Variable-length array (`T[]`).
    Unbounded,
    /// Fixed-length array (`T[N]`, `N > 0`).
    Fixed(usize),
}

impl FieldArity {
    /// Integer encoding: `-1` scalar, `0` variable-length, `N` fixed-length.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Scalar => -1,
            Self::Unbounded => 0,
            Self::Fixed(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }

    /// Inverse of [`FieldArity::as_i64`]; `None` below `-1`.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            -1 => Some(Self::Scalar),
            0 => Some(Self::Unbounded),
            n if n > 0 => Some(Self::Fixed(n as usize)),
            _ => None,
        }
    }

    /// Check if this is an array of any length.
    pub fn is_array(self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

impl fmt::Display for FieldArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => Ok(()),
            Self::Unbounded => write!(f, "[]"),
            Self::Fixed(n) => write!(f, "[{}]", n),
        }
    }
}

impl Serialize for FieldArity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for FieldArity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::from_i64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid array arity {}", value)))
    }
}

/// A declared field type split into base type and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType<'a> {
    /// Type with the array suffix stripped.
    pub base: &'a str,
    pub arity: FieldArity,
}

impl<'a> FieldType<'a> {
    /// Parse a declared field type.
    ///
    /// Returns `None` for malformed suffixes: stray or unbalanced brackets,
    /// more than one bracket pair, an empty base type, a non-decimal size,
    /// a size of zero (which would be indistinguishable from `T[]`), or a
    /// size above `i64::MAX`.
    pub fn parse(declared: &'a str) -> Option<Self> {
        let open = declared.find('[');
        let close = declared.find(']');

        let (open, close) = match (open, close) {
            (None, None) if !declared.is_empty() => {
                return Some(Self {
                    base: declared,
                    arity: FieldArity::Scalar,
                })
            }
            (Some(open), Some(close)) => (open, close),
            _ => return None,
        };

        // Exactly one pair, closing bracket last.
        if close != declared.len() - 1
            || close < open
            || declared.rfind('[') != Some(open)
            || open == 0
        {
            return None;
        }

        let base = &declared[..open];
        let size = &declared[open + 1..close];

        let arity = if size.is_empty() {
            FieldArity::Unbounded
        } else if size.bytes().all(|b| b.is_ascii_digit()) {
            // Sizes must survive the i64 encoding.
            match size.parse::<usize>() {
                Ok(n) if n > 0 && i64::try_from(n).is_ok() => FieldArity::Fixed(n),
                _ => return None,
            }
        } else {
            return None;
        };

        Some(Self { base, arity })
    }

    /// Fallback used by the lenient policy: keep the raw string as a scalar.
    pub fn raw_scalar(declared: &'a str) -> Self {
        Self {
            base: declared,
            arity: FieldArity::Scalar,
        }
    }
}

impl fmt::Display for FieldType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.arity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let ft = FieldType::parse("float64").unwrap();
        assert_eq!(ft.base, "float64");
        assert_eq!(ft.arity, FieldArity::Scalar);
        assert_eq!(ft.arity.as_i64(), -1);
    }

    #[test]
    fn test_variable_length() {
        let ft = FieldType::parse("geometry_msgs/Point[]").unwrap();
        assert_eq!(ft.base, "geometry_msgs/Point");
        assert_eq!(ft.arity, FieldArity::Unbounded);
        assert_eq!(ft.arity.as_i64(), 0);
    }

    #[test]
    fn test_fixed_length() {
        let ft = FieldType::parse("int32[3]").unwrap();
        assert_eq!(ft.base, "int32");
        assert_eq!(ft.arity, FieldArity::Fixed(3));
        assert_eq!(ft.arity.as_i64(), 3);

        let ft = FieldType::parse("float64[36]").unwrap();
        assert_eq!(ft.arity, FieldArity::Fixed(36));
    }

    #[test]
    fn test_malformed_suffixes() {
        for bad in [
            "", "int32]", "int32[", "int32[3", "[3]", "[]", "int32[a]", "int32[-1]", "int32[0]",
            "int32[3]]", "int32[[3]", "int32[3][4]", "int32[3]x", "int32]3[",
        ] {
            assert!(FieldType::parse(bad).is_none(), "{bad:?} should be malformed");
        }
    }

    #[test]
    fn test_oversized_fixed_length() {
        let max = format!("int32[{}]", i64::MAX);
        let ft = FieldType::parse(&max).unwrap();
        assert_eq!(ft.arity.as_i64(), i64::MAX);

        assert!(FieldType::parse("int32[9223372036854775808]").is_none());
        assert!(FieldType::parse("int32[18446744073709551616]").is_none());
    }

    #[test]
    fn test_arity_json_roundtrip_at_limit() {
        let arity = FieldType::parse(&format!("uint8[{}]", i64::MAX)).unwrap().arity;
        let json = serde_json::to_string(&arity).unwrap();
        assert_eq!(json, i64::MAX.to_string());
        assert_eq!(serde_json::from_str::<FieldArity>(&json).unwrap(), arity);
    }

    #[test]
    fn test_raw_scalar_keeps_input() {
        let ft = FieldType::raw_scalar("int32[");
        assert_eq!(ft.base, "int32[");
        assert_eq!(ft.arity, FieldArity::Scalar);
    }

    #[test]
    fn test_display_restores_declaration() {
        for declared in ["uint8", "string[]", "float64[9]"] {
            assert_eq!(FieldType::parse(declared).unwrap().to_string(), declared);
        }
    }

    #[test]
    fn test_arity_from_i64() {
        assert_eq!(FieldArity::from_i64(-1), Some(FieldArity::Scalar));
        assert_eq!(FieldArity::from_i64(0), Some(FieldArity::Unbounded));
        assert_eq!(FieldArity::from_i64(4), Some(FieldArity::Fixed(4)));
        assert_eq!(FieldArity::from_i64(-2), None);
    }
}
