//! Bencode value types.
//!
//! A [`Value`] is a closed sum of the four bencode productions. Trees are
//! exclusively owned: every list and dictionary owns its children, and byte
//! strings are copied out of the input buffer so a decoded tree never borrows
//! from it.
//!
//! Dictionaries are stored in a `BTreeMap` keyed by raw bytes. `Vec<u8>`
//! orders byte-wise with shorter-is-less on common prefixes, which is exactly
//! the canonical key order, so every in-memory dictionary is already sorted
//! and duplicate-free.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DecodeError, DecodeResult};

/// Dictionary payload: keys in canonical byte-wise order.
pub type Dictionary = BTreeMap<Vec<u8>, Value>;

/// A decoded bencode value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed 64-bit integer (`i<digits>e`)
    Integer(i64),
    /// Opaque byte string (`<len>:<bytes>`)
    ByteString(Vec<u8>),
    /// Ordered list of values (`l...e`)
    List(Vec<Value>),
    /// Byte-string keyed map in canonical order (`d...e`)
    Dictionary(Dictionary),
}

/// Discriminant of a [`Value`], used in type mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Integer`]
    Integer,
    /// [`Value::ByteString`]
    ByteString,
    /// [`Value::List`]
    List,
    /// [`Value::Dictionary`]
    Dictionary,
}

impl ValueKind {
    /// Returns the kind name as a string for error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::ByteString => "byte string",
            ValueKind::List => "list",
            ValueKind::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Build a byte string value.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::ByteString(bytes.into())
    }

    /// Build a dictionary from key/value pairs. Later duplicates win.
    pub fn dictionary<K, I>(entries: I) -> Self
    where
        K: Into<Vec<u8>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Dictionary(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Which variant this value holds.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::ByteString(_) => ValueKind::ByteString,
            Value::List(_) => ValueKind::List,
            Value::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    /// Returns true if this is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns true if this is a byte string.
    pub fn is_byte_string(&self) -> bool {
        matches!(self, Value::ByteString(_))
    }

    /// Returns true if this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns true if this is a dictionary.
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Value::Dictionary(_))
    }

    /// Returns the integer if this is an Integer, None otherwise.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the bytes if this is a ByteString, None otherwise.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the bytes as text if this is a ByteString holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Returns the elements if this is a List, None otherwise.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a Dictionary, None otherwise.
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Extract the integer, failing with `TypeMismatch` on any other variant.
    pub fn try_as_integer(&self) -> DecodeResult<i64> {
        self.as_integer().ok_or_else(|| self.mismatch(ValueKind::Integer))
    }

    /// Extract the byte string, failing with `TypeMismatch` on any other variant.
    pub fn try_as_bytes(&self) -> DecodeResult<&[u8]> {
        self.as_bytes().ok_or_else(|| self.mismatch(ValueKind::ByteString))
    }

    /// Extract the list, failing with `TypeMismatch` on any other variant.
    pub fn try_as_list(&self) -> DecodeResult<&[Value]> {
        self.as_list().ok_or_else(|| self.mismatch(ValueKind::List))
    }

    /// Extract the dictionary, failing with `TypeMismatch` on any other variant.
    pub fn try_as_dictionary(&self) -> DecodeResult<&Dictionary> {
        self.as_dictionary()
            .ok_or_else(|| self.mismatch(ValueKind::Dictionary))
    }

    /// Get a value from a dictionary by key.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        match self {
            Value::Dictionary(map) => map.get(key.as_ref()),
            _ => None,
        }
    }

    /// Get a value from a list by index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    fn mismatch(&self, expected: ValueKind) -> DecodeError {
        DecodeError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::ByteString(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::ByteString(bytes.to_vec())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::ByteString(s.as_bytes().to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Dictionary> for Value {
    fn from(map: Dictionary) -> Self {
        Value::Dictionary(map)
    }
}

/// Diagnostic rendering. Not a wire format and never parsed back.
///
/// Byte strings are quoted with non-printable bytes escaped, lists render as
/// `[a, b]` and dictionaries as `{"key": value}` in key order, so the output is
/// deterministic for equal values.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::ByteString(b) => write_quoted(f, b),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Dictionary(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "\"{}\"", bytes.escape_ascii())
}
