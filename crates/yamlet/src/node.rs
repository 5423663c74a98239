//! The transient record the scanner hands to the collector, one per fully
//! scanned unit of input. Callers can capture the stream of nodes through
//! [`parse_with_log`](crate::parse_with_log) for diagnostics and testing.

/// One fully-scanned unit of input: a key/value pair, a sequence item, or a
/// container-opening marker, before integration into the result tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Indentation column (0-based) at which the node's key or item marker
    /// began; the primary hierarchy signal.
    pub depth: usize,
    /// 1-based source line of the node's first character.
    pub line: usize,
    /// 1-based source column of the node's first character.
    pub column: usize,
    /// Whether the node is a mapping entry, a sequence element, or neither.
    pub kind: NodeKind,
    /// The scanned payload.
    pub payload: Payload,
}

/// How a node attaches to its enclosing container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Neither a keyed property nor a sequence item. Only a scalar can end up
    /// bare (e.g. a negative number on its own line), and storing one is an
    /// error.
    Bare,
    /// A `-`-marked sequence element.
    SequenceItem,
    /// A keyed mapping entry; the key is already unescaped and trimmed.
    Property(String),
}

/// The value portion of a scanned node.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single-line scalar. `quoted` scalars skip type coercion.
    Scalar {
        /// Raw trimmed text (unescaped if quoted).
        text: String,
        /// The value came from a quoted scalar.
        quoted: bool,
    },
    /// A multi-line block scalar awaiting fold post-processing. `text` holds
    /// the block with common indentation stripped and one `\n` per line.
    Folded {
        /// Indentation-stripped block content.
        text: String,
        /// Literal (`|`) or folded (`>`).
        style: FoldStyle,
        /// Trailing-newline policy.
        chomp: Chomp,
    },
    /// The node opens a nested mapping (or a container whose concrete kind is
    /// not yet known).
    OpenMapping,
    /// The node opens a nested sequence.
    OpenSequence,
}

/// Block scalar style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldStyle {
    /// `|`: internal newlines are preserved verbatim.
    Literal,
    /// `>`: single newlines fold to spaces, blank lines become newlines.
    Folded,
}

/// Trailing-newline handling for a block scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chomp {
    /// No modifier: keep exactly one trailing newline.
    Clip,
    /// `-`: strip all trailing newlines.
    Strip,
    /// `+`: keep trailing newlines verbatim.
    Keep,
}
