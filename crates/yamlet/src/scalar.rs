//! Scalar leaf helpers: escape decoding, type coercion, and block-scalar
//! post-processing.

use crate::node::{Chomp, FoldStyle};
use crate::value::Value;

/// Decodes one escaped character from a quoted key or value. Recognized
/// escapes map to their control characters; everything else passes through
/// literally (`\"` is `"`, `\x` is `x`).
pub(crate) fn decode_escape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'f' => '\u{000C}',
        'v' => '\u{000B}',
        other => other,
    }
}

/// Coerces a trimmed, unquoted scalar into its final value.
///
/// `null` (exact) becomes null; `y`/`yes`/`true`/`on` and `n`/`no`/`false`/
/// `off` (ASCII case-insensitive) become booleans; text shaped like an
/// optionally-signed decimal number becomes a float; anything else stays a
/// string.
pub(crate) fn coerce(text: &str) -> Value {
    if text == "null" {
        return Value::Null;
    }
    if ["y", "yes", "true", "on"]
        .iter()
        .any(|k| text.eq_ignore_ascii_case(k))
    {
        return Value::Boolean(true);
    }
    if ["n", "no", "false", "off"]
        .iter()
        .any(|k| text.eq_ignore_ascii_case(k))
    {
        return Value::Boolean(false);
    }
    if let Some(n) = parse_number(text) {
        return Value::Number(n);
    }
    Value::String(text.into())
}

/// Accepts an optional sign, an optional integer part, and an optional `.`
/// plus fractional part, requiring at least one digit overall. No exponents,
/// no infinities. Validated by hand so that `f64::from_str`'s wider grammar
/// (`1e5`, `inf`, `NaN`) never leaks through.
fn parse_number(text: &str) -> Option<f64> {
    let rest = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for ch in rest.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' if dots == 0 => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 {
        return None;
    }
    text.parse().ok()
}

/// Applies fold style and chomping to a block scalar.
///
/// `text` is the raw block: common indentation already stripped, one trailing
/// `\n` per content line (blank lines inside the block are empty lines).
pub(crate) fn apply_fold(text: &str, style: FoldStyle, chomp: Chomp) -> String {
    let folded = match style {
        FoldStyle::Literal => text.to_string(),
        FoldStyle::Folded => fold_paragraphs(text),
    };
    match chomp {
        Chomp::Keep => folded,
        Chomp::Strip => folded.trim_end_matches('\n').to_string(),
        Chomp::Clip => {
            if folded.is_empty() {
                folded
            } else {
                let mut clipped = folded.trim_end_matches('\n').to_string();
                clipped.push('\n');
                clipped
            }
        }
    }
}

/// Paragraph-preserving line folding for `>` blocks: a newline joins adjacent
/// text lines with a space, a blank line collapses to one newline, and a
/// more-indented line keeps its surrounding newlines.
fn fold_paragraphs(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop(); // drop the empty piece after the final newline
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(line);
        } else if line.is_empty() {
            out.push('\n');
        } else if line.starts_with(' ') {
            out.push('\n');
            out.push_str(line);
        } else if out.is_empty() || out.ends_with('\n') {
            out.push_str(line);
        } else {
            out.push(' ');
            out.push_str(line);
        }
    }
    if !lines.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("null", Value::Null)]
    #[case("Null", Value::String("Null".into()))]
    #[case("y", Value::Boolean(true))]
    #[case("YES", Value::Boolean(true))]
    #[case("True", Value::Boolean(true))]
    #[case("on", Value::Boolean(true))]
    #[case("n", Value::Boolean(false))]
    #[case("No", Value::Boolean(false))]
    #[case("false", Value::Boolean(false))]
    #[case("OFF", Value::Boolean(false))]
    #[case("0", Value::Number(0.0))]
    #[case("42", Value::Number(42.0))]
    #[case("-3.5", Value::Number(-3.5))]
    #[case("+.5", Value::Number(0.5))]
    #[case("7.", Value::Number(7.0))]
    #[case("1e5", Value::String("1e5".into()))]
    #[case("inf", Value::String("inf".into()))]
    #[case("NaN", Value::String("NaN".into()))]
    #[case("-", Value::String("-".into()))]
    #[case(".", Value::String(".".into()))]
    #[case("1.2.3", Value::String("1.2.3".into()))]
    #[case("unknown", Value::String("unknown".into()))]
    fn coercion(#[case] input: &str, #[case] expected: Value) {
        assert_eq!(coerce(input), expected);
    }

    #[rstest]
    #[case('n', '\n')]
    #[case('t', '\t')]
    #[case('f', '\u{000C}')]
    #[case('v', '\u{000B}')]
    #[case('"', '"')]
    #[case('\\', '\\')]
    #[case('q', 'q')]
    fn escapes(#[case] input: char, #[case] expected: char) {
        assert_eq!(decode_escape(input), expected);
    }

    #[test]
    fn literal_clip_keeps_one_newline() {
        assert_eq!(
            apply_fold("a\nb\n\n\n", FoldStyle::Literal, Chomp::Clip),
            "a\nb\n"
        );
    }

    #[test]
    fn literal_strip_removes_all() {
        assert_eq!(apply_fold("a\nb\n", FoldStyle::Literal, Chomp::Strip), "a\nb");
    }

    #[test]
    fn literal_keep_is_verbatim() {
        assert_eq!(
            apply_fold("a\n\n\n", FoldStyle::Literal, Chomp::Keep),
            "a\n\n\n"
        );
    }

    #[test]
    fn folded_joins_lines_with_spaces() {
        assert_eq!(
            apply_fold("one\ntwo\nthree\n", FoldStyle::Folded, Chomp::Clip),
            "one two three\n"
        );
    }

    #[test]
    fn folded_blank_line_becomes_newline() {
        assert_eq!(
            apply_fold("p one\n\np two\n", FoldStyle::Folded, Chomp::Clip),
            "p one\np two\n"
        );
    }

    #[test]
    fn folded_breaks_before_indented_lines() {
        assert_eq!(
            apply_fold("intro\n  code\nback\n", FoldStyle::Folded, Chomp::Clip),
            "intro\n  code back\n"
        );
    }

    #[test]
    fn empty_block_is_empty_for_all_chomps() {
        for chomp in [Chomp::Clip, Chomp::Strip, Chomp::Keep] {
            assert_eq!(apply_fold("", FoldStyle::Literal, chomp), "");
            assert_eq!(apply_fold("", FoldStyle::Folded, chomp), "");
        }
    }
}
