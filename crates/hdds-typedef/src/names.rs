// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static type-name tables and qualified-name derivation.

/// Primitive types with no field structure.
///
/// `byte` and `char` are the legacy aliases of `int8` / `uint8`.
pub const ATOMIC_TYPES: &[&str] = &[
    "bool", "byte", "char", "int8", "uint8", "int16", "uint16", "int32", "uint32", "int64",
    "uint64", "float32", "float64", "string",
];

/// Temporal types described by a fixed `secs` / `nsecs` shape.
pub const SPECIAL_TYPES: &[&str] = &["time", "duration"];

/// Registry bookkeeping attributes that are never reported as constants.
pub const RESERVED_ATTRIBUTES: &[&str] =
    &["_md5sum", "_has_header", "_type", "_full_text", "_slot_types"];

/// Check if `type_name` is an atomic primitive.
pub fn is_atomic(type_name: &str) -> bool {
    ATOMIC_TYPES.contains(&type_name)
}

/// Check if `type_name` is one of the special temporal types.
pub fn is_special(type_name: &str) -> bool {
    SPECIAL_TYPES.contains(&type_name)
}

/// Check if `type_name` is atomic or special (kept verbatim when qualifying).
pub fn is_builtin(type_name: &str) -> bool {
    is_atomic(type_name) || is_special(type_name)
}

/// Check if an attribute name is reserved (`__dunder__` style).
pub fn is_dunder(name: &str) -> bool {
    name.len() >= 4 && name.starts_with("__") && name.ends_with("__")
}

/// Build `<package>/<ClassName>` from a runtime namespace and class name.
///
/// Only the top-level segment of the namespace is kept; both `::` and `.`
/// are accepted as separators (`geometry_msgs::msg` and `geometry_msgs.msg`
/// both yield `geometry_msgs`).
pub fn qualified_name(namespace: &str, class_name: &str) -> String {
    format!("{}/{}", top_namespace(namespace), class_name)
}

fn top_namespace(namespace: &str) -> &str {
    let end = [namespace.find("::"), namespace.find('.')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(namespace.len());
    &namespace[..end]
}

/// Split `package/Name` into its parts.
pub fn split_qualified(type_name: &str) -> Option<(&str, &str)> {
    let (package, name) = type_name.split_once('/')?;
    if package.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((package, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_and_special_tables() {
        for name in ["bool", "int8", "uint64", "float32", "string", "byte"] {
            assert!(is_atomic(name), "{name} should be atomic");
        }
        assert!(!is_atomic("time"));
        assert!(is_special("time"));
        assert!(is_special("duration"));
        assert!(!is_special("std_msgs/Time"));
        assert!(is_builtin("duration"));
        assert!(!is_builtin("geometry_msgs/Point"));
    }

    #[test]
    fn test_qualified_name_takes_top_segment() {
        assert_eq!(
            qualified_name("geometry_msgs::msg", "Point"),
            "geometry_msgs/Point"
        );
        assert_eq!(
            qualified_name("geometry_msgs.msg._Point", "Point"),
            "geometry_msgs/Point"
        );
        assert_eq!(
            qualified_name("rospy_tutorials::srv", "AddTwoIntsRequest"),
            "rospy_tutorials/AddTwoIntsRequest"
        );
        assert_eq!(qualified_name("flat", "Thing"), "flat/Thing");
    }

    #[test]
    fn test_dunder() {
        assert!(is_dunder("__slots__"));
        assert!(!is_dunder("_md5sum"));
        assert!(!is_dunder("___"));
        assert!(!is_dunder("FOO"));
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("std_msgs/Header"), Some(("std_msgs", "Header")));
        assert_eq!(split_qualified("Header"), None);
        assert_eq!(split_qualified("a/b/c"), None);
        assert_eq!(split_qualified("/b"), None);
    }
}
