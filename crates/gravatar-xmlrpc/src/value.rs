//! XML-RPC value model.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// Wire format of `<dateTime.iso8601>` values.
pub const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Struct members, ordered by name.
pub type Members = BTreeMap<String, Value>;

/// A single XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<int>`, `<i4>` or `<i8>`.
    Int(i64),
    /// `<boolean>`.
    Boolean(bool),
    /// `<string>` or untyped text.
    String(String),
    /// `<double>`.
    Double(f64),
    /// `<dateTime.iso8601>` (no timezone on the wire).
    DateTime(NaiveDateTime),
    /// `<base64>`, already decoded.
    Base64(Vec<u8>),
    /// `<struct>`.
    Struct(Members),
    /// `<array>`.
    Array(Vec<Self>),
    /// `<nil/>` extension.
    Nil,
}

impl Value {
    /// Returns the XML-RPC type name of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
            Self::Double(_) => "double",
            Self::DateTime(_) => "dateTime.iso8601",
            Self::Base64(_) => "base64",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
            Self::Nil => "nil",
        }
    }

    /// Returns the string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an int.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the struct members, if this is a struct.
    #[must_use]
    pub const fn as_struct(&self) -> Option<&Members> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Returns the array items, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes the value and returns the struct members, if this is a struct.
    #[must_use]
    pub fn into_struct(self) -> Option<Members> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Returns true unless the value is nil, `false`, zero, or empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(i) => *i != 0,
            Self::Boolean(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::Double(d) => *d != 0.0,
            Self::DateTime(_) => true,
            Self::Base64(data) => !data.is_empty(),
            Self::Struct(members) => !members.is_empty(),
            Self::Array(items) => !items.is_empty(),
            Self::Nil => false,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Members> for Value {
    fn from(value: Members) -> Self {
        Self::Struct(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(!Value::Array(Vec::new()).is_truthy());
        assert!(!Value::Struct(Members::new()).is_truthy());
        assert!(!Value::Double(0.0).is_truthy());

        assert!(Value::Int(1).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::from("abc123").is_truthy());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Int(3).as_str(), None);
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::from(vec!["a", "b"]).as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_from_vec() {
        let value = Value::from(vec!["a@x.com".to_string()]);
        assert_eq!(
            value,
            Value::Array(vec![Value::String("a@x.com".to_string())])
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Struct(Members::new()).type_name(), "struct");
    }
}
