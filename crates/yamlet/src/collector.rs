//! Hierarchy collector: integrates scanned nodes into the result tree.
//!
//! The collector keeps one [`Frame`] per active indentation level on an
//! explicit stack (never recursion, so nesting depth is bounded only by
//! memory). Each frame owns the container it is filling; its parent holds a
//! placeholder value that is overwritten through the frame's selector when
//! the frame closes. A container starts [`Container::Undetermined`] and
//! commits to mapping or sequence on its first entry; until then a single
//! kind flip is allowed.

use crate::error::{ErrorReason, ParserError};
use crate::node::{Node, NodeKind, Payload};
use crate::scalar;
use crate::value::{Mapping, Sequence, Value};

/// A container whose concrete kind may still be undecided.
#[derive(Debug)]
enum Container {
    Undetermined,
    Mapping(Mapping),
    Sequence(Sequence),
}

impl Container {
    fn into_value(self) -> Value {
        match self {
            // A frame still open at end of input stands for the empty mapping
            // placeholder its parent already holds.
            Container::Undetermined => Value::Mapping(Mapping::new()),
            Container::Mapping(m) => Value::Mapping(m),
            Container::Sequence(s) => Value::Sequence(s),
        }
    }
}

/// The slot in the parent container where a frame's finished value lands.
#[derive(Debug)]
enum Selector {
    Key(String),
    Index(usize),
}

/// One active nesting level. `depth` is `None` between opening a container
/// and seeing its first child, which defines the level's indentation.
#[derive(Debug)]
struct Frame {
    depth: Option<usize>,
    selector: Option<Selector>,
    container: Container,
}

pub(crate) struct Collector<'log> {
    frames: Vec<Frame>,
    log: Option<&'log mut Vec<Node>>,
}

impl<'log> Collector<'log> {
    pub(crate) fn new(log: Option<&'log mut Vec<Node>>) -> Self {
        Self {
            frames: vec![Frame {
                depth: Some(0),
                selector: None,
                container: Container::Undetermined,
            }],
            log,
        }
    }

    /// Integrates one completed node into the tree.
    pub(crate) fn push_node(&mut self, node: Node) -> Result<(), ParserError> {
        self.align(&node)?;
        match node.payload {
            Payload::OpenMapping | Payload::OpenSequence => self.open_container(&node)?,
            Payload::Scalar { .. } | Payload::Folded { .. } => self.place_scalar(&node)?,
        }
        if let Some(log) = &mut self.log {
            log.push(node);
        }
        Ok(())
    }

    /// Closes every remaining frame and returns the root's container. Frames
    /// still open at end of input materialize as empty mappings.
    pub(crate) fn finish(mut self) -> Value {
        while self.frames.len() > 1 {
            let frame = self.frames.pop().expect("frame stack is never empty");
            let value = frame.container.into_value();
            self.store(frame.selector, value);
        }
        let root = self.frames.pop().expect("frame stack is never empty");
        root.container.into_value()
    }

    /// Pops frames deeper than the node, or resolves a just-opened frame to
    /// the node's depth, until the top frame accepts the node.
    fn align(&mut self, node: &Node) -> Result<(), ParserError> {
        loop {
            match self.top().depth {
                Some(d) if d == node.depth => return Ok(()),
                Some(d) if d > node.depth => self.close_top(node.line, node.column)?,
                // Over-indented: deeper than the innermost resolved frame
                // without an open slot to adopt it.
                Some(_) => {
                    return Err(ParserError::new(
                        ErrorReason::InvalidIndentation,
                        node.line,
                        node.column,
                    ));
                }
                None => {
                    let below = self.frames[self.frames.len() - 2].depth.unwrap_or(0);
                    if node.depth > below {
                        // First child of a just-opened container defines the
                        // level's indentation.
                        self.top_mut().depth = Some(node.depth);
                        return Ok(());
                    }
                    self.close_top(node.line, node.column)?;
                }
            }
        }
    }

    fn close_top(&mut self, line: usize, column: usize) -> Result<(), ParserError> {
        if self.frames.len() == 1 {
            return Err(ParserError::new(
                ErrorReason::InvalidHierarchyDepth,
                line,
                column,
            ));
        }
        let frame = self.frames.pop().expect("frame stack is never empty");
        if matches!(frame.container, Container::Undetermined) {
            // The container was opened and is being closed by a node before
            // receiving any content.
            return Err(ParserError::new(
                ErrorReason::InvalidIndentation,
                line,
                column,
            ));
        }
        let value = frame.container.into_value();
        self.store(frame.selector, value);
        Ok(())
    }

    /// Writes a closed frame's value into its parent's slot.
    fn store(&mut self, selector: Option<Selector>, value: Value) {
        let parent = self.top_mut();
        match (&mut parent.container, selector) {
            (Container::Mapping(map), Some(Selector::Key(key))) => {
                map.insert(key, value);
            }
            (Container::Sequence(seq), Some(Selector::Index(index))) => seq[index] = value,
            _ => unreachable!("child selector does not match parent container"),
        }
    }

    /// Commits (or flips) the top container's kind to match the node.
    fn ensure_kind(&mut self, node: &Node) -> Result<(), ParserError> {
        let top = self.top_mut();
        match &node.kind {
            NodeKind::Property(_) => match &mut top.container {
                Container::Undetermined => top.container = Container::Mapping(Mapping::new()),
                Container::Mapping(_) => {}
                Container::Sequence(seq) if seq.is_empty() => {
                    top.container = Container::Mapping(Mapping::new());
                }
                Container::Sequence(_) => {
                    return Err(ParserError::new(
                        ErrorReason::CollectionMix,
                        node.line,
                        node.column,
                    ));
                }
            },
            NodeKind::SequenceItem => match &mut top.container {
                Container::Undetermined => top.container = Container::Sequence(Sequence::new()),
                Container::Sequence(_) => {}
                Container::Mapping(map) if map.is_empty() => {
                    top.container = Container::Sequence(Sequence::new());
                }
                Container::Mapping(_) => {
                    return Err(ParserError::new(
                        ErrorReason::CollectionMix,
                        node.line,
                        node.column,
                    ));
                }
            },
            NodeKind::Bare => {
                return Err(ParserError::new(
                    ErrorReason::ExpectedCollection,
                    node.line,
                    node.column,
                ));
            }
        }
        Ok(())
    }

    /// Opens a nested container: stores a placeholder in the parent slot and
    /// pushes a depth-unresolved frame that owns the real container.
    fn open_container(&mut self, node: &Node) -> Result<(), ParserError> {
        self.ensure_kind(node)?;
        let top = self.top_mut();
        let selector = match (&node.kind, &mut top.container) {
            (NodeKind::Property(name), Container::Mapping(map)) => {
                map.insert(name.clone(), Value::Mapping(Mapping::new()));
                Selector::Key(name.clone())
            }
            (NodeKind::SequenceItem, Container::Sequence(seq)) => {
                seq.push(Value::Mapping(Mapping::new()));
                Selector::Index(seq.len() - 1)
            }
            _ => unreachable!("container kind was just aligned with the node kind"),
        };
        self.frames.push(Frame {
            depth: None,
            selector: Some(selector),
            container: Container::Undetermined,
        });
        Ok(())
    }

    /// Stores a terminal scalar under the node's key or appends it.
    fn place_scalar(&mut self, node: &Node) -> Result<(), ParserError> {
        self.ensure_kind(node)?;
        let value = match &node.payload {
            Payload::Scalar { text, quoted } => {
                if *quoted {
                    Value::String(text.clone())
                } else {
                    scalar::coerce(text)
                }
            }
            Payload::Folded { text, style, chomp } => {
                Value::String(scalar::apply_fold(text, *style, *chomp))
            }
            _ => unreachable!("sentinel payloads are handled by open_container"),
        };
        let top = self.top_mut();
        match (&node.kind, &mut top.container) {
            (NodeKind::Property(name), Container::Mapping(map)) => {
                map.insert(name.clone(), value);
            }
            (NodeKind::SequenceItem, Container::Sequence(seq)) => seq.push(value),
            _ => unreachable!("container kind was just aligned with the node kind"),
        }
        Ok(())
    }

    fn top(&self) -> &Frame {
        self.frames.last().expect("frame stack is never empty")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("frame stack is never empty")
    }
}
