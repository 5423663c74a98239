use quickcheck_macros::quickcheck;
use rstest::rstest;

use crate::{
    parse, parse_input, parse_with_log, ErrorReason, Input, NodeKind, Payload, Value,
};

fn parsed(source: &str) -> Value {
    parse(source).expect("input should parse")
}

#[test]
fn sequence_of_scalars() {
    assert_eq!(
        parsed("- first\n- second\n- third\n").to_string(),
        r#"["first","second","third"]"#
    );
}

#[test]
fn mapping_preserves_source_order() {
    assert_eq!(
        parsed("lastname: Doe\nfirstname: John\nage: unknown\n").to_string(),
        r#"{"lastname":"Doe","firstname":"John","age":"unknown"}"#
    );
}

#[test]
fn unquoted_scalars_are_coerced() {
    let value = parsed("numeric: 1.0\nboolean: true\nexplicit-null: null\n");
    assert_eq!(value.get("numeric").and_then(Value::as_f64), Some(1.0));
    assert_eq!(value.get("boolean").and_then(Value::as_bool), Some(true));
    assert!(value.get("explicit-null").is_some_and(Value::is_null));
}

#[test]
fn quoted_scalars_are_not_coerced() {
    let value = parsed("a: \"true\"\nb: '1.5'\nc: \"null\"\n");
    assert_eq!(value.get("a").and_then(Value::as_str), Some("true"));
    assert_eq!(value.get("b").and_then(Value::as_str), Some("1.5"));
    assert_eq!(value.get("c").and_then(Value::as_str), Some("null"));
}

#[test]
fn boolean_families_are_case_insensitive() {
    let value = parsed("a: Yes\nb: OFF\nc: on\nd: N\n");
    assert_eq!(value.to_string(), r#"{"a":true,"b":false,"c":true,"d":false}"#);
}

#[test]
fn nested_mappings() {
    assert_eq!(
        parsed("a:\n  b:\n    c: 1\n").to_string(),
        r#"{"a":{"b":{"c":1}}}"#
    );
}

#[test]
fn sequence_of_mappings() {
    let source = "servers:\n  - host: a\n    port: 1\n  - host: b\n";
    assert_eq!(
        parsed(source).to_string(),
        r#"{"servers":[{"host":"a","port":1},{"host":"b"}]}"#
    );
}

#[test]
fn dash_alone_opens_a_mapping_item() {
    assert_eq!(parsed("-\n  a: 1\n").to_string(), r#"[{"a":1}]"#);
}

#[test]
fn nested_sequence_after_dashes() {
    assert_eq!(parsed("- - a\n").to_string(), r#"[["a"]]"#);
}

#[test]
fn key_with_no_value_is_an_empty_mapping() {
    assert_eq!(parsed("a:\n").to_string(), r#"{"a":{}}"#);
}

#[rstest]
#[case("")]
#[case("\n\n")]
#[case("# just a comment\n")]
#[case("   \n# c\n\n")]
fn blank_and_comment_only_input_is_an_empty_mapping(#[case] source: &str) {
    assert_eq!(parsed(source), Value::Mapping(crate::Mapping::new()));
}

#[test]
fn missing_final_newline_is_tolerated() {
    assert_eq!(parsed("a: 1").to_string(), r#"{"a":1}"#);
    assert_eq!(parsed("a: \"x\"").to_string(), r#"{"a":"x"}"#);
}

#[test]
fn crlf_line_endings() {
    assert_eq!(
        parsed("a: 1\r\nb:\r\n  - x\r\n").to_string(),
        r#"{"a":1,"b":["x"]}"#
    );
}

#[test]
fn trailing_comments_are_ignored() {
    let source = "a: 1 # one\nb: \"x\" # two\nc: # opens a mapping\n  d: 2\n";
    assert_eq!(
        parsed(source).to_string(),
        r#"{"a":1,"b":"x","c":{"d":2}}"#
    );
}

#[test]
fn quoted_keys_allow_spaces_and_escapes() {
    let value = parsed("'a key': 1\n\"a\\\"b\": 2\n");
    assert_eq!(value.get("a key").and_then(Value::as_f64), Some(1.0));
    assert_eq!(value.get("a\"b").and_then(Value::as_f64), Some(2.0));
}

#[test]
fn quoted_value_escapes_decode() {
    let value = parsed("m: \"x\\ny\\tz\"\n");
    assert_eq!(value.get("m").and_then(Value::as_str), Some("x\ny\tz"));
}

#[test]
fn negative_numbers_are_values_not_items() {
    let value = parsed("a: -1\nb: -.5\n");
    assert_eq!(value.get("a").and_then(Value::as_f64), Some(-1.0));
    assert_eq!(value.get("b").and_then(Value::as_f64), Some(-0.5));
}

#[test]
fn dash_after_key_opens_an_inline_sequence() {
    assert_eq!(parsed("a: - x\n").to_string(), r#"{"a":["x"]}"#);
}

#[test]
fn one_line_shorthand_nests_word_keys() {
    assert_eq!(parsed("a: b: c\n").to_string(), r#"{"a":{"b":"c"}}"#);
    assert_eq!(parsed("when: 12:30\n").to_string(), r#"{"when":{"12":30}}"#);
}

#[test]
fn shorthand_requires_a_word_key() {
    // A space in the accumulated text keeps the colon literal.
    assert_eq!(
        parsed("msg: hello world: x\n").to_string(),
        r#"{"msg":"hello world: x"}"#
    );
}

#[test]
fn quoted_shorthand_nests_any_key() {
    assert_eq!(
        parsed("- \"k v\": x\n").to_string(),
        r#"[{"k v":"x"}]"#
    );
}

#[test]
fn literal_block_keeps_newlines() {
    assert_eq!(
        parsed("story: |\n  line one\n  line two\n").to_string(),
        r#"{"story":"line one\nline two\n"}"#
    );
}

#[rstest]
#[case("t: |\n  x\n\n\n", "x\n")]
#[case("t: |-\n  x\n\n\n", "x")]
#[case("t: |+\n  x\n\n\n", "x\n\n\n")]
#[case("t: >\n  one\n  two\n\n  three\n", "one two\nthree\n")]
#[case("t: >-\n  one\n  two\n", "one two")]
fn block_styles_and_chomping(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(parsed(source).get("t").and_then(Value::as_str), Some(expected));
}

#[test]
fn block_baseline_is_the_shallowest_content_line() {
    assert_eq!(
        parsed("t: |\n    a\n  b\n").get("t").and_then(Value::as_str),
        Some("  a\nb\n")
    );
}

#[test]
fn block_with_no_content_lines_is_empty() {
    assert_eq!(
        parsed("a: |\nb: 1\n").to_string(),
        r#"{"a":"","b":1}"#
    );
}

#[test]
fn block_ends_at_a_shallower_sibling() {
    assert_eq!(
        parsed("a: |\n  x\nb: 2\n").to_string(),
        r#"{"a":"x\n","b":2}"#
    );
}

#[test]
fn block_at_end_of_input_without_final_newline() {
    assert_eq!(
        parsed("a: |\n  x").get("a").and_then(Value::as_str),
        Some("x\n")
    );
}

#[rstest]
#[case("?x\n", ErrorReason::InvalidCharacter('?'), 1, 1)]
#[case("\ta: 1\n", ErrorReason::InvalidCharacter('\t'), 1, 1)]
#[case("a: 1\n  b: 2\n", ErrorReason::InvalidIndentation, 2, 3)]
#[case("a\nb: 1\n", ErrorReason::InvalidLinebreak, 1, 2)]
#[case("a: 1\rx\n", ErrorReason::InvalidLinebreak, 1, 6)]
#[case("a: 'x\ny'\n", ErrorReason::InvalidLinebreak, 1, 6)]
#[case("a#b: 1\n", ErrorReason::InvalidComment, 1, 2)]
#[case("a: 1\n- b\n", ErrorReason::CollectionMix, 2, 1)]
#[case("- a\nb: 1\n", ErrorReason::CollectionMix, 2, 1)]
#[case("-1\n", ErrorReason::ExpectedCollection, 1, 1)]
#[case("a: \"x", ErrorReason::MissingClosingQuote, 1, 6)]
#[case("\"a", ErrorReason::MissingClosingQuote, 1, 3)]
#[case("a", ErrorReason::UnexpectedEndOfFile, 1, 2)]
#[case("-", ErrorReason::UnexpectedEndOfFile, 1, 2)]
fn malformed_input(
    #[case] source: &str,
    #[case] reason: ErrorReason,
    #[case] line: usize,
    #[case] column: usize,
) {
    let err = parse(source).expect_err("input should be rejected");
    assert_eq!(err.reason, reason);
    assert_eq!((err.line, err.column), (line, column));
    assert_eq!(err.to_string(), format!("{reason} at {line}:{column}"));
}

#[test]
fn sibling_directly_below_an_open_key_is_rejected() {
    let err = parse("a:\nb: 1\n").expect_err("a's block never received content");
    assert_eq!(err.reason, ErrorReason::InvalidIndentation);
}

#[test]
fn deeply_nested_mappings_do_not_overflow() {
    const DEPTH: usize = 1000;
    let mut source = String::new();
    for level in 0..DEPTH {
        source.push_str(&" ".repeat(level * 2));
        source.push_str("k:\n");
    }
    source.push_str(&" ".repeat(DEPTH * 2));
    source.push_str("leaf: 1\n");
    let value = parsed(&source);
    let mut cursor = &value;
    for _ in 0..DEPTH {
        cursor = cursor.get("k").expect("level should be present");
    }
    assert_eq!(cursor.get("leaf").and_then(Value::as_f64), Some(1.0));
}

#[test]
fn log_records_nodes_in_source_order() {
    let mut log = Vec::new();
    let value = parse_with_log("a:\n  - 1\n", &mut log).expect("input should parse");
    assert_eq!(value.to_string(), r#"{"a":[1]}"#);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, NodeKind::Property("a".into()));
    assert_eq!(log[0].payload, Payload::OpenMapping);
    assert_eq!((log[0].depth, log[0].line, log[0].column), (0, 1, 1));
    assert_eq!(log[1].kind, NodeKind::SequenceItem);
    assert_eq!(
        log[1].payload,
        Payload::Scalar {
            text: "1".into(),
            quoted: false
        }
    );
    assert_eq!((log[1].depth, log[1].line, log[1].column), (2, 2, 3));
}

#[test]
fn log_keeps_nodes_scanned_before_a_failure() {
    let mut log = Vec::new();
    let err = parse_with_log("a: 1\n  b: 2\n", &mut log).expect_err("b is over-indented");
    assert_eq!(err.reason, ErrorReason::InvalidIndentation);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, NodeKind::Property("a".into()));
}

#[test]
fn log_does_not_change_the_result() {
    let source = "a:\n  - 1\n  - b: 2\n";
    let mut log = Vec::new();
    assert_eq!(parse(source), parse_with_log(source, &mut log));
}

#[test]
fn parse_input_parses_text_and_passes_values_through() {
    assert_eq!(
        parse_input(Input::Text("a: 1\n"))
            .expect("input should parse")
            .to_string(),
        r#"{"a":1}"#
    );
    let value = Value::Sequence(vec![Value::Null, Value::Boolean(true)]);
    assert_eq!(
        parse_input(Input::Parsed(value.clone())),
        Ok(value)
    );
}

#[test]
fn input_from_impls() {
    assert_eq!(Input::from("a: 1\n"), Input::Text("a: 1\n"));
    assert_eq!(Input::from(Value::Null), Input::Parsed(Value::Null));
}

#[quickcheck]
fn parsing_never_panics(input: String) -> bool {
    let _ = parse(&input);
    true
}

#[quickcheck]
fn parsing_is_deterministic(input: String) -> bool {
    parse(&input) == parse(&input)
}
