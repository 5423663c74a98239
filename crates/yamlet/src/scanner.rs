//! The character-at-a-time scanner.
//!
//! One pass over the input, no token stream and no lexer pre-pass: a [`Mode`]
//! enum plus a per-character `match` classifies every character, and the
//! in-flight [`NodeBuilder`] becomes a [`Node`] the moment its boundary is
//! seen. Completed nodes go straight to the [`Collector`]; the only state
//! carried between lines is the builder, the mode, and an optional pending
//! folded block.
//!
//! Indentation is measured in columns: a node's `depth` is the 0-based column
//! of its first character, and the collector's frame stack interprets it. A
//! dash is ambiguous until the next character (sequence marker vs. minus
//! sign), which is what the dedicated `GotDash` mode resolves. Folded blocks
//! (`|`, `>`, with `-`/`+` chomping) are collected line-by-line here and
//! post-processed in `scalar` when the block ends.
//!
//! End of input is a mode table rather than a sentinel character: quoted
//! modes fail with `missing closing quote`, half-finished keys with
//! `unexpected end of file`, and a value still open on the last line is
//! flushed by feeding one synthetic `\n`.

use crate::collector::Collector;
use crate::error::{ErrorReason, ParserError};
use crate::node::{Chomp, FoldStyle, Node, NodeKind, Payload};
use crate::scalar::decode_escape;
use crate::value::Value;

/// Scanner modes, one per character class context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Consuming indentation at the start of a line.
    LeadingSpace,
    /// Saw a `-`; sequence marker or minus sign, decided by the next char.
    GotDash,
    /// Saw a `\r`; the next character must be `\n`.
    Lf,
    /// Accumulating an unquoted key.
    Name,
    /// Accumulating a quoted key.
    QuotedName,
    /// One escaped character inside a quoted key.
    EscapedQuotedName,
    /// Key finished; skipping blanks until the mandatory `:`.
    Colon,
    /// Accumulating an unquoted value.
    Value,
    /// Accumulating a quoted value.
    QuotedValue,
    /// One escaped character inside a quoted value.
    EscapedQuotedValue,
    /// Inside one content line of a folded block.
    FoldedValue,
    /// Discarding characters until end of line.
    Comment,
    /// After a closing quote; only blanks may precede the line end.
    Linebreak,
}

/// The node currently being scanned.
#[derive(Debug)]
struct NodeBuilder {
    depth: usize,
    line: usize,
    column: usize,
    kind: NodeKind,
    /// Key text while scanning a name, raw value text afterwards.
    buf: String,
    /// A non-blank value character has been seen.
    value_seen: bool,
    /// 0-based column of the first non-blank value character.
    value_start: usize,
    /// Active quote character for quoted keys/values.
    quote: char,
    /// The accumulated value currently equals a fold marker.
    fold: Option<(FoldStyle, Chomp)>,
}

impl NodeBuilder {
    fn new(depth: usize, line: usize, column: usize) -> Self {
        Self {
            depth,
            line,
            column,
            kind: NodeKind::Bare,
            buf: String::new(),
            value_seen: false,
            value_start: 0,
            quote: '"',
            fold: None,
        }
    }

    fn into_node(self, payload: Payload) -> Node {
        Node {
            depth: self.depth,
            line: self.line,
            column: self.column,
            kind: self.kind,
            payload,
        }
    }
}

/// A folded block whose content lines are still being read.
#[derive(Debug)]
struct PendingFold {
    depth: usize,
    line: usize,
    column: usize,
    kind: NodeKind,
    style: FoldStyle,
    chomp: Chomp,
    lines: Vec<FoldLine>,
}

#[derive(Debug)]
struct FoldLine {
    indent: usize,
    text: String,
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Guard for the one-line `key: nested: value` shorthand. Deliberately
/// narrower than the key charset: word characters only, no dash.
fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn fold_header(text: &str) -> Option<(FoldStyle, Chomp)> {
    match text {
        ">" => Some((FoldStyle::Folded, Chomp::Clip)),
        ">-" => Some((FoldStyle::Folded, Chomp::Strip)),
        ">+" => Some((FoldStyle::Folded, Chomp::Keep)),
        "|" => Some((FoldStyle::Literal, Chomp::Clip)),
        "|-" => Some((FoldStyle::Literal, Chomp::Strip)),
        "|+" => Some((FoldStyle::Literal, Chomp::Keep)),
        _ => None,
    }
}

pub(crate) struct Scanner<'log> {
    mode: Mode,
    line: usize,
    col: usize,
    node: Option<NodeBuilder>,
    /// `Some(column)` while a value-position dash is provisional.
    dash_value: Option<usize>,
    fold: Option<PendingFold>,
    collector: Collector<'log>,
}

/// Runs the whole parse: one traversal of `text`, collector invoked
/// synchronously per completed node.
pub(crate) fn parse_text(
    text: &str,
    log: Option<&mut Vec<Node>>,
) -> Result<Value, ParserError> {
    let mut scanner = Scanner {
        mode: Mode::LeadingSpace,
        line: 1,
        col: 1,
        node: None,
        dash_value: None,
        fold: None,
        collector: Collector::new(log),
    };
    for ch in text.chars() {
        scanner.step(ch)?;
        scanner.advance(ch);
    }
    scanner.end_of_input()
}

impl Scanner<'_> {
    fn step(&mut self, ch: char) -> Result<(), ParserError> {
        match self.mode {
            Mode::LeadingSpace => self.step_leading_space(ch),
            Mode::GotDash => self.step_got_dash(ch),
            Mode::Lf => {
                if ch == '\n' {
                    self.mode = Mode::LeadingSpace;
                    Ok(())
                } else {
                    Err(self.error(ErrorReason::InvalidLinebreak))
                }
            }
            Mode::Name => self.step_name(ch),
            Mode::QuotedName => self.step_quoted_name(ch),
            Mode::EscapedQuotedName => self.step_escaped(ch, Mode::QuotedName),
            Mode::Colon => self.step_colon(ch),
            Mode::Value => self.step_value(ch),
            Mode::QuotedValue => self.step_quoted_value(ch),
            Mode::EscapedQuotedValue => self.step_escaped(ch, Mode::QuotedValue),
            Mode::FoldedValue => {
                match ch {
                    '\r' => self.mode = Mode::Lf,
                    '\n' => self.mode = Mode::LeadingSpace,
                    c => {
                        let fold = self.fold.as_mut().expect("folded mode requires a block");
                        let cur = fold.lines.last_mut().expect("folded mode requires a line");
                        cur.text.push(c);
                    }
                }
                Ok(())
            }
            Mode::Comment => {
                match ch {
                    '\n' => self.mode = Mode::LeadingSpace,
                    '\r' => self.mode = Mode::Lf,
                    _ => {}
                }
                Ok(())
            }
            Mode::Linebreak => self.step_linebreak(ch),
        }
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    fn error(&self, reason: ErrorReason) -> ParserError {
        ParserError::new(reason, self.line, self.col)
    }

    fn step_leading_space(&mut self, ch: char) -> Result<(), ParserError> {
        match ch {
            ' ' => Ok(()),
            '\r' => {
                self.blank_line();
                self.mode = Mode::Lf;
                Ok(())
            }
            '\n' => {
                self.blank_line();
                Ok(())
            }
            _ => {
                let depth = self.col - 1;
                if let Some(fold) = &mut self.fold {
                    if depth > fold.depth {
                        // Deeper than the folded node: a continuation line,
                        // whatever its first character is.
                        fold.lines.push(FoldLine {
                            indent: depth,
                            text: ch.to_string(),
                        });
                        self.mode = Mode::FoldedValue;
                        return Ok(());
                    }
                }
                if self.fold.is_some() {
                    self.finish_fold()?;
                }
                match ch {
                    '#' => {
                        self.mode = Mode::Comment;
                        Ok(())
                    }
                    '\'' | '"' => {
                        let mut builder = NodeBuilder::new(depth, self.line, self.col);
                        builder.quote = ch;
                        self.node = Some(builder);
                        self.mode = Mode::QuotedName;
                        Ok(())
                    }
                    '-' => {
                        self.node = Some(NodeBuilder::new(depth, self.line, self.col));
                        self.dash_value = None;
                        self.mode = Mode::GotDash;
                        Ok(())
                    }
                    c if is_key_char(c) => {
                        let mut builder = NodeBuilder::new(depth, self.line, self.col);
                        builder.buf.push(c);
                        self.node = Some(builder);
                        self.mode = Mode::Name;
                        Ok(())
                    }
                    c => Err(self.error(ErrorReason::InvalidCharacter(c))),
                }
            }
        }
    }

    /// An empty physical line: inside a pending folded block it is content,
    /// elsewhere it just restarts the node search.
    fn blank_line(&mut self) {
        if let Some(fold) = &mut self.fold {
            fold.lines.push(FoldLine {
                indent: 0,
                text: String::new(),
            });
        }
    }

    fn step_got_dash(&mut self, ch: char) -> Result<(), ParserError> {
        match ch {
            ' ' | '\t' => {
                self.commit_dash()?;
                self.begin_value();
                Ok(())
            }
            '\r' => {
                self.commit_dash()?;
                self.emit_open_mapping()?;
                self.mode = Mode::Lf;
                Ok(())
            }
            '\n' => {
                self.commit_dash()?;
                self.emit_open_mapping()?;
                self.mode = Mode::LeadingSpace;
                Ok(())
            }
            c @ ('0'..='9' | '.') => {
                // A minus sign after all: the scalar continues.
                let start = self.dash_value.take();
                let builder = self.node.as_mut().expect("dash mode requires a node");
                builder.value_seen = true;
                builder.value_start = start.unwrap_or(builder.depth);
                builder.buf.push('-');
                builder.buf.push(c);
                self.mode = Mode::Value;
                Ok(())
            }
            c => Err(self.error(ErrorReason::InvalidCharacter(c))),
        }
    }

    /// The dash turned out to be a sequence marker. For a line-start dash the
    /// current node becomes the item; for a value-position dash the enclosing
    /// node first opens a nested sequence.
    fn commit_dash(&mut self) -> Result<(), ParserError> {
        if let Some(dash_col) = self.dash_value.take() {
            let enclosing = self.node.take().expect("dash mode requires a node");
            self.collector
                .push_node(enclosing.into_node(Payload::OpenSequence))?;
            let mut builder = NodeBuilder::new(dash_col, self.line, dash_col + 1);
            builder.kind = NodeKind::SequenceItem;
            self.node = Some(builder);
        } else {
            let builder = self.node.as_mut().expect("dash mode requires a node");
            builder.kind = NodeKind::SequenceItem;
        }
        Ok(())
    }

    /// A marker (or key) with nothing after it on the line opens a container
    /// whose concrete kind the first child will determine.
    fn emit_open_mapping(&mut self) -> Result<(), ParserError> {
        let builder = self.node.take().expect("a node must be in flight");
        self.collector.push_node(builder.into_node(Payload::OpenMapping))
    }

    fn step_name(&mut self, ch: char) -> Result<(), ParserError> {
        match ch {
            ':' | ' ' | '\t' => {
                let builder = self.node.as_mut().expect("key mode requires a node");
                let name = core::mem::take(&mut builder.buf);
                builder.kind = NodeKind::Property(name.trim().to_string());
                if ch == ':' {
                    self.begin_value();
                } else {
                    self.mode = Mode::Colon;
                }
                Ok(())
            }
            '\r' | '\n' => Err(self.error(ErrorReason::InvalidLinebreak)),
            '#' => Err(self.error(ErrorReason::InvalidComment)),
            c if is_key_char(c) => {
                let builder = self.node.as_mut().expect("key mode requires a node");
                builder.buf.push(c);
                Ok(())
            }
            c => Err(self.error(ErrorReason::InvalidCharacter(c))),
        }
    }

    fn step_quoted_name(&mut self, ch: char) -> Result<(), ParserError> {
        let builder = self.node.as_mut().expect("quoted key mode requires a node");
        match ch {
            c if c == builder.quote => {
                let name = core::mem::take(&mut builder.buf);
                builder.kind = NodeKind::Property(name);
                self.mode = Mode::Colon;
                Ok(())
            }
            '\\' => {
                self.mode = Mode::EscapedQuotedName;
                Ok(())
            }
            '\r' | '\n' => Err(self.error(ErrorReason::InvalidLinebreak)),
            c => {
                builder.buf.push(c);
                Ok(())
            }
        }
    }

    /// Exactly one character after a backslash, then back to `resume`.
    fn step_escaped(&mut self, ch: char, resume: Mode) -> Result<(), ParserError> {
        match ch {
            '\r' | '\n' => Err(self.error(ErrorReason::InvalidLinebreak)),
            c => {
                let builder = self.node.as_mut().expect("quoted mode requires a node");
                builder.buf.push(decode_escape(c));
                self.mode = resume;
                Ok(())
            }
        }
    }

    fn step_colon(&mut self, ch: char) -> Result<(), ParserError> {
        match ch {
            ':' => {
                self.begin_value();
                Ok(())
            }
            ' ' | '\t' => Ok(()),
            '#' => Err(self.error(ErrorReason::InvalidComment)),
            '\r' | '\n' => Err(self.error(ErrorReason::InvalidLinebreak)),
            c => Err(self.error(ErrorReason::InvalidCharacter(c))),
        }
    }

    /// Resets value accumulation on the current node and enters `Value`.
    fn begin_value(&mut self) {
        if let Some(builder) = &mut self.node {
            builder.buf.clear();
            builder.value_seen = false;
            builder.value_start = 0;
            builder.fold = None;
        }
        self.mode = Mode::Value;
    }

    fn step_value(&mut self, ch: char) -> Result<(), ParserError> {
        let col0 = self.col - 1;
        let builder = self.node.as_mut().expect("value mode requires a node");
        let is_entry = !matches!(builder.kind, NodeKind::Bare);
        let blank_so_far = !builder.value_seen;
        let shorthand_ok = is_entry && is_identifier(builder.buf.trim());
        match ch {
            '#' => {
                self.finish_value_line()?;
                self.mode = Mode::Comment;
                Ok(())
            }
            '\r' => {
                self.finish_value_line()?;
                self.mode = Mode::Lf;
                Ok(())
            }
            '\n' => {
                self.finish_value_line()?;
                self.mode = Mode::LeadingSpace;
                Ok(())
            }
            c @ ('\'' | '"') if blank_so_far => {
                builder.quote = c;
                builder.value_seen = true;
                builder.value_start = col0;
                builder.buf.clear();
                self.mode = Mode::QuotedValue;
                Ok(())
            }
            '-' if blank_so_far && is_entry => {
                self.dash_value = Some(col0);
                self.mode = Mode::GotDash;
                Ok(())
            }
            ':' if shorthand_ok => self.shorthand(),
            c => {
                if blank_so_far && c != ' ' && c != '\t' {
                    builder.value_seen = true;
                    builder.value_start = col0;
                }
                builder.buf.push(c);
                builder.fold = fold_header(builder.buf.trim());
                Ok(())
            }
        }
    }

    /// The compact `key: nested: value` shorthand: the text scanned so far is
    /// actually a key one level deeper, and the current node opens the
    /// mapping that holds it.
    fn shorthand(&mut self) -> Result<(), ParserError> {
        let enclosing = self.node.take().expect("value mode requires a node");
        let word = enclosing.buf.trim().to_string();
        let word_col = enclosing.value_start;
        self.collector
            .push_node(enclosing.into_node(Payload::OpenMapping))?;
        let mut builder = NodeBuilder::new(word_col, self.line, word_col + 1);
        builder.kind = NodeKind::Property(word);
        self.node = Some(builder);
        self.begin_value();
        Ok(())
    }

    /// The line's value text is complete: a fold marker leaves the node
    /// pending, empty text opens a nested container, anything else is a
    /// scalar.
    fn finish_value_line(&mut self) -> Result<(), ParserError> {
        let builder = self.node.take().expect("value mode requires a node");
        if let Some((style, chomp)) = builder.fold {
            self.fold = Some(PendingFold {
                depth: builder.depth,
                line: builder.line,
                column: builder.column,
                kind: builder.kind,
                style,
                chomp,
                lines: Vec::new(),
            });
            return Ok(());
        }
        let text = builder.buf.trim();
        let payload = if text.is_empty() {
            Payload::OpenMapping
        } else {
            Payload::Scalar {
                text: text.to_string(),
                quoted: false,
            }
        };
        self.collector.push_node(builder.into_node(payload))
    }

    fn step_quoted_value(&mut self, ch: char) -> Result<(), ParserError> {
        let builder = self.node.as_mut().expect("quoted value mode requires a node");
        match ch {
            c if c == builder.quote => {
                self.mode = Mode::Linebreak;
                Ok(())
            }
            '\\' => {
                self.mode = Mode::EscapedQuotedValue;
                Ok(())
            }
            '\r' | '\n' => Err(self.error(ErrorReason::InvalidLinebreak)),
            c => {
                builder.buf.push(c);
                Ok(())
            }
        }
    }

    fn step_linebreak(&mut self, ch: char) -> Result<(), ParserError> {
        match ch {
            ' ' | '\t' => Ok(()),
            '\r' => {
                self.finish_quoted()?;
                self.mode = Mode::Lf;
                Ok(())
            }
            '\n' => {
                self.finish_quoted()?;
                self.mode = Mode::LeadingSpace;
                Ok(())
            }
            '#' => {
                self.finish_quoted()?;
                self.mode = Mode::Comment;
                Ok(())
            }
            ':' => self.quoted_shorthand(),
            c => Err(self.error(ErrorReason::InvalidCharacter(c))),
        }
    }

    /// A closed quoted scalar; kept verbatim, never coerced.
    fn finish_quoted(&mut self) -> Result<(), ParserError> {
        let mut builder = self.node.take().expect("a quoted value must be in flight");
        let text = core::mem::take(&mut builder.buf);
        self.collector
            .push_node(builder.into_node(Payload::Scalar { text, quoted: true }))
    }

    /// The quoted-value flavor of the one-line shorthand (`- "key": value`):
    /// no identifier guard, the quoted text becomes the nested key.
    fn quoted_shorthand(&mut self) -> Result<(), ParserError> {
        let mut enclosing = self.node.take().expect("a quoted value must be in flight");
        let word = core::mem::take(&mut enclosing.buf);
        let word_col = enclosing.value_start;
        self.collector
            .push_node(enclosing.into_node(Payload::OpenMapping))?;
        let mut builder = NodeBuilder::new(word_col, self.line, word_col + 1);
        builder.kind = NodeKind::Property(word);
        self.node = Some(builder);
        self.begin_value();
        Ok(())
    }

    /// Turns the accumulated fold lines into a node: the shallowest content
    /// line sets the baseline, deeper lines keep their extra indentation,
    /// every line contributes one `\n`.
    fn finish_fold(&mut self) -> Result<(), ParserError> {
        let fold = self.fold.take().expect("no pending folded block");
        let baseline = fold
            .lines
            .iter()
            .filter(|l| !l.text.is_empty())
            .map(|l| l.indent)
            .min()
            .unwrap_or(0);
        let mut raw = String::new();
        for line in &fold.lines {
            if !line.text.is_empty() {
                for _ in baseline..line.indent {
                    raw.push(' ');
                }
                raw.push_str(&line.text);
            }
            raw.push('\n');
        }
        let node = Node {
            depth: fold.depth,
            line: fold.line,
            column: fold.column,
            kind: fold.kind,
            payload: Payload::Folded {
                text: raw,
                style: fold.style,
                chomp: fold.chomp,
            },
        };
        self.collector.push_node(node)
    }

    /// End-of-input mode table: quoted modes and half-finished keys are
    /// errors, an open value line is flushed with one synthetic newline, and
    /// a pending folded block is finalized.
    fn end_of_input(mut self) -> Result<Value, ParserError> {
        match self.mode {
            Mode::QuotedName
            | Mode::EscapedQuotedName
            | Mode::QuotedValue
            | Mode::EscapedQuotedValue => {
                return Err(self.error(ErrorReason::MissingClosingQuote));
            }
            Mode::Name | Mode::Colon | Mode::GotDash | Mode::Lf => {
                return Err(self.error(ErrorReason::UnexpectedEndOfFile));
            }
            Mode::Value | Mode::Linebreak => {
                self.step('\n')?;
            }
            Mode::LeadingSpace | Mode::Comment | Mode::FoldedValue => {}
        }
        if self.fold.is_some() {
            self.finish_fold()?;
        }
        Ok(self.collector.finish())
    }
}
