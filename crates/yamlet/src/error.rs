//! Parse error type: a stable reason plus the 1-based source position.

use thiserror::Error;

/// The error returned when parsing fails.
///
/// Carries a machine-stable [`ErrorReason`] and the 1-based line and column of
/// the offending character. Parsing never yields a partial tree: the first
/// error aborts the whole call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at {line}:{column}")]
pub struct ParserError {
    /// What went wrong.
    pub reason: ErrorReason,
    /// 1-based source line.
    pub line: usize,
    /// 1-based source column.
    pub column: usize,
}

impl ParserError {
    pub(crate) fn new(reason: ErrorReason, line: usize, column: usize) -> Self {
        Self {
            reason,
            line,
            column,
        }
    }
}

/// The failure taxonomy. Display strings are stable and intended for
/// programmatic matching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorReason {
    /// A character is illegal in the current scanner state.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A node's depth does not align with any open frame, or a container was
    /// opened and immediately closed without content.
    #[error("invalid indentation")]
    InvalidIndentation,
    /// A lone `\r`, or a line ending where only non-whitespace may appear.
    #[error("invalid linebreak")]
    InvalidLinebreak,
    /// A `#` where a key or colon was expected.
    #[error("invalid comment")]
    InvalidComment,
    /// Indentation implies closing more frames than exist.
    #[error("invalid depth of hierarchy")]
    InvalidHierarchyDepth,
    /// A key would overwrite an existing entry. Reserved; never raised.
    #[error("replacing existing property of same object")]
    ReplacedProperty,
    /// A node's property/item kind conflicts with a populated container.
    #[error("invalid mix of collections")]
    CollectionMix,
    /// A scalar arrived with neither a key nor a sequence marker.
    #[error("collection expected, but got scalar")]
    ExpectedCollection,
    /// Input ended inside a quoted key or value.
    #[error("missing closing quote")]
    MissingClosingQuote,
    /// Input ended in a scanner state that is not a valid stopping point.
    #[error("unexpected end of file")]
    UnexpectedEndOfFile,
}
