//! # yamlet
//!
//! A single-pass parser for a small, indentation-structured configuration
//! language in the YAML family. It reads the input character by character,
//! builds the hierarchy from leading spaces alone, and produces a [`Value`]
//! tree of insertion-ordered mappings, sequences, and scalars.
//!
//! The dialect is deliberately restricted: no anchors, aliases, tags, flow
//! (`[...]`/`{...}`) syntax, or multi-document streams. What it does support:
//!
//! - nested mappings and sequences by indentation, to arbitrary depth;
//! - plain and quoted (`'`/`"`) keys and values, with backslash escapes
//!   inside quotes;
//! - scalar coercion of unquoted values (`null`, the `y`/`yes`/`true`/`on`
//!   and `n`/`no`/`false`/`off` boolean families, decimal numbers);
//! - block scalars `|` and `>` with `-`/`+` chomping indicators;
//! - `#` comments and CRLF line endings.
//!
//! Parsing is strict: the first offending character aborts with a
//! [`ParserError`] carrying a stable reason and the 1-based source position.
//! There is no partial output and no recovery.
//!
//! ```
//! use yamlet::Value;
//!
//! let value = yamlet::parse(
//!     "lastname: Doe\n\
//!      age: 30\n\
//!      nicknames:\n\
//!      \x20 - JD\n",
//! )?;
//! assert_eq!(value.get("lastname").and_then(Value::as_str), Some("Doe"));
//! assert_eq!(value.get("age").and_then(Value::as_f64), Some(30.0));
//! assert_eq!(
//!     value.to_string(),
//!     r#"{"lastname":"Doe","age":30,"nicknames":["JD"]}"#
//! );
//! # Ok::<(), yamlet::ParserError>(())
//! ```
//!
//! For diagnostics, [`parse_with_log`] additionally records every structural
//! [`Node`] the scanner emits, in source order.

mod collector;
mod error;
mod node;
mod scalar;
mod scanner;
mod value;

#[cfg(test)]
mod tests;

pub use error::{ErrorReason, ParserError};
pub use node::{Chomp, FoldStyle, Node, NodeKind, Payload};
pub use value::{Mapping, Sequence, Value};

/// Parses a complete document into a [`Value`] tree.
///
/// Empty input (or input containing only blank and comment lines) parses to
/// an empty mapping.
///
/// # Errors
///
/// Returns a [`ParserError`] with the reason and 1-based position of the
/// first offending character.
pub fn parse(source: &str) -> Result<Value, ParserError> {
    scanner::parse_text(source, None)
}

/// Parses a complete document, appending every scanned [`Node`] to `log` in
/// source order.
///
/// The log is an observation channel for testing and diagnostics; it does not
/// affect the result. Nodes emitted before a failure stay in the log.
///
/// # Errors
///
/// Returns a [`ParserError`] with the reason and 1-based position of the
/// first offending character.
pub fn parse_with_log(source: &str, log: &mut Vec<Node>) -> Result<Value, ParserError> {
    scanner::parse_text(source, Some(log))
}

/// Either raw text to parse or an already-parsed value.
///
/// Lets callers that accept configuration from multiple sources funnel both
/// through one entry point: [`parse_input`] parses text and passes a parsed
/// value through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<'a> {
    /// Document text still to be parsed.
    Text(&'a str),
    /// A value that needs no further parsing.
    Parsed(Value),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for Input<'_> {
    fn from(value: Value) -> Self {
        Self::Parsed(value)
    }
}

/// Resolves an [`Input`] to a [`Value`], parsing only when given text.
///
/// # Errors
///
/// Returns a [`ParserError`] if the input is text and fails to parse.
pub fn parse_input(input: Input<'_>) -> Result<Value, ParserError> {
    match input {
        Input::Text(text) => parse(text),
        Input::Parsed(value) => Ok(value),
    }
}
