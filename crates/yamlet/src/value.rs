//! Parsed value types.
//!
//! This module defines the [`Value`] enum, the in-memory tree a successful
//! parse produces, and helpers for rendering it as compact JSON.
//!
//! Mappings preserve insertion order: a document's keys come back in the order
//! they appeared in the source, which is why [`Mapping`] is an
//! [`indexmap::IndexMap`] rather than a sorted or hashed std map.

use core::fmt;

/// An insertion-ordered mapping from string keys to values.
pub type Mapping = indexmap::IndexMap<String, Value>;

/// An ordered sequence of values.
pub type Sequence = Vec<Value>;

/// A value produced by the parser.
///
/// Scalars are one of null, boolean, 64-bit float, or string; collections are
/// insertion-ordered mappings and sequences.
///
/// # Examples
///
/// ```
/// use yamlet::{Mapping, Value};
///
/// let mut map = Mapping::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Mapping(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The explicit `null` scalar.
    Null,
    /// A boolean scalar.
    Boolean(bool),
    /// A numeric scalar; all numbers are 64-bit floats.
    Number(f64),
    /// A string scalar.
    String(String),
    /// An ordered sequence of values.
    Sequence(Sequence),
    /// An insertion-ordered mapping.
    Mapping(Mapping),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Sequence> for Value {
    fn from(v: Sequence) -> Self {
        Self::Sequence(v)
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Self::Mapping(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Sequence`].
    ///
    /// [`Sequence`]: Value::Sequence
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(..))
    }

    /// Returns `true` if the value is [`Mapping`].
    ///
    /// [`Mapping`]: Value::Mapping
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(..))
    }

    /// Returns the boolean if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequence if the value is [`Sequence`].
    ///
    /// [`Sequence`]: Value::Sequence
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping if the value is [`Mapping`].
    ///
    /// [`Mapping`]: Value::Mapping
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` if the value is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

/// Escapes control characters in a string for inclusion in a JSON string
/// literal.
fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

pub(crate) fn escape_string(src: &str) -> String {
    let mut result = String::with_capacity(src.len() + 2);
    write_escaped_string(src, &mut result).expect("string escaping cannot fail");
    result
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                write!(f, "\"{}\"", escape_string(s))
            }
            Value::Sequence(seq) => {
                f.write_str("[")?;
                let mut first = true;
                for v in seq {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Mapping(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "\"{}\":{}", escape_string(k), v)?;
                }
                f.write_str("}")
            }
        }
    }
}
