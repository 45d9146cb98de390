//! Expression contexts
//!
//! What an expression evaluates to is derived from the shape of its
//! element: literal type, or the key naming a map node. Nothing is stored
//! on the node itself.

use keaconv_core::{Element, Value};
use std::fmt;

/// Type of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Any,
    Boolean,
    Data,
    Numeric,
    /// Parse hint only, never returned by [`classify`]
    DataOrNumeric,
}

impl Context {
    pub fn as_str(self) -> &'static str {
        match self {
            Context::Any => "any",
            Context::Boolean => "boolean",
            Context::Data => "data",
            Context::Numeric => "numeric",
            Context::DataOrNumeric => "data or numeric",
        }
    }

    /// An expression of context `actual` is acceptable where `self` is
    /// expected
    pub fn accepts(self, actual: Context) -> bool {
        match self {
            Context::Any => true,
            Context::DataOrNumeric => {
                matches!(actual, Context::Data | Context::Numeric | Context::Any)
            }
            expected => actual == expected || actual == Context::Any,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BOOLEAN_KEYS: &[&str] = &[
    "check",
    "exists",
    "variable-exists",
    "equal",
    "not-equal",
    "regex-match",
    "iregex-match",
    "and",
    "or",
    "not",
    "known",
    "static",
];

const DATA_KEYS: &[&str] = &[
    "substring",
    "suffix",
    "lowercase",
    "uppercase",
    "option",
    "hardware",
    "packet",
    "concat",
    "encapsulate",
    "encode-int8",
    "encode-int16",
    "encode-int32",
    "gethostbyname",
    "binary-to-ascii",
    "filename",
    "server-name",
    "reverse",
    "pick-first-value",
    "host-decl-name",
    "leased-address",
    "config-option",
    "null",
    "gethostname",
    "v6relay",
];

const NUMERIC_KEYS: &[&str] = &[
    "extract-int8",
    "extract-int16",
    "extract-int32",
    "lease-time",
    "add",
    "subtract",
    "multiply",
    "divide",
    "remainder",
    "binary-and",
    "binary-or",
    "binary-xor",
    "client-state",
];

fn has_key(element: &Element, keys: &[&str]) -> bool {
    element
        .as_map()
        .is_some_and(|map| map.iter().any(|(k, _)| keys.contains(&k)))
}

pub fn is_boolean_expression(element: &Element) -> bool {
    matches!(element.value, Value::Boolean(_)) || has_key(element, BOOLEAN_KEYS)
}

pub fn is_data_expression(element: &Element) -> bool {
    matches!(element.value, Value::String(_) | Value::Integer(_)) || has_key(element, DATA_KEYS)
}

pub fn is_numeric_expression(element: &Element) -> bool {
    matches!(element.value, Value::Integer(_)) || has_key(element, NUMERIC_KEYS)
}

/// Context of an expression element
pub fn classify(element: &Element) -> Context {
    if is_numeric_expression(element) {
        Context::Numeric
    } else if is_data_expression(element) {
        Context::Data
    } else if is_boolean_expression(element) {
        Context::Boolean
    } else {
        Context::Any
    }
}
