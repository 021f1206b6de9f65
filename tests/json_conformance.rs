//! End-to-end behaviour of `parse`: value shapes, number kinds, escape
//! decoding, nesting and the error taxonomy.

use json_parser::{
    parse, parse_with_options, tokenize, Object, ParseError, ParseOptions, TokenParseError,
    TokenizeError, Value,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Object>(),
    )
}

fn array<const N: usize>(items: [Value; N]) -> Value {
    Value::Array(items.into())
}

// ============================================================================
// Value shapes
// ============================================================================

#[rstest]
#[case("{}", object([]))]
#[case("[]", array([]))]
#[case(r#"{"abc": "def"}"#, object([("abc", Value::from("def"))]))]
#[case(r#"{"value": 42}"#, object([("value", Value::Integer(42))]))]
#[case(r#"{"value": 12.3}"#, object([("value", Value::Float(12.3))]))]
#[case(r#"["foo", "bar"]"#, array([Value::from("foo"), Value::from("bar")]))]
#[case("[1,2,3]", array([Value::Integer(1), Value::Integer(2), Value::Integer(3)]))]
#[case("[1, 2, 3]", array([Value::Integer(1), Value::Integer(2), Value::Integer(3)]))]
#[case(
    r#"{"value1": true, "value2": false, "value3": null}"#,
    object([
        ("value1", Value::Bool(true)),
        ("value2", Value::Bool(false)),
        ("value3", Value::Null),
    ])
)]
#[case(
    r#"{"foo": [1, 2, {"bar": 3}]}"#,
    object([(
        "foo",
        array([Value::Integer(1), Value::Integer(2), object([("bar", Value::Integer(3))])])
    )])
)]
#[case(" \t\n\r null \n", Value::Null)]
fn parses_documents(#[case] input: &str, #[case] expected: Value) {
    assert_eq!(parse(input).unwrap(), expected);
}

#[test]
fn object_iteration_follows_insertion_order() {
    let value = parse(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

// ============================================================================
// Number kinds
// ============================================================================

#[rstest]
#[case("42", Value::Integer(42))]
#[case("-42", Value::Integer(-42))]
#[case("0", Value::Integer(0))]
#[case("12.3", Value::Float(12.3))]
#[case("-12.3", Value::Float(-12.3))]
#[case("0.0", Value::Float(0.0))]
fn number_kind_follows_decimal_point(#[case] input: &str, #[case] expected: Value) {
    let value = parse(input).unwrap();
    assert_eq!(value.is_float(), input.contains('.'));
    assert_eq!(value, expected);
}

// ============================================================================
// Escapes
// ============================================================================

#[test]
fn decodes_escapes() {
    let value = parse(r#""\n\t\u0041""#).unwrap();
    assert_eq!(value, Value::from("\n\tA"));
}

#[test]
fn surrogate_pairs_are_not_combined() {
    let value = parse(r#""\ud83d\ude00""#).unwrap();
    assert_eq!(value.as_str().unwrap().chars().count(), 2);
}

// ============================================================================
// Nesting
// ============================================================================

fn nested(depth: usize) -> (String, Value) {
    let mut text = String::from("1");
    let mut value = Value::Integer(1);
    for level in 0..depth {
        if level % 2 == 0 {
            text = format!("[{text}]");
            value = Value::Array(vec![value]);
        } else {
            text = format!(r#"{{"k": {text}}}"#);
            value = object([("k", value)]);
        }
    }
    (text, value)
}

#[test]
fn reproduces_nesting_up_to_the_limit() {
    for depth in 0..=ParseOptions::DEFAULT_MAX_DEPTH {
        let (text, expected) = nested(depth);
        assert_eq!(parse(&text).unwrap(), expected, "depth {depth}");
    }
}

#[test]
fn rejects_nesting_past_the_limit() {
    let (text, _) = nested(ParseOptions::DEFAULT_MAX_DEPTH + 1);
    assert_eq!(
        parse(&text).unwrap_err(),
        ParseError::ParseError(TokenParseError::NestingTooDeep(ParseOptions::DEFAULT_MAX_DEPTH))
    );
}

#[test]
fn custom_depth_limit() {
    let options = ParseOptions::default().with_max_depth(1);
    assert!(parse_with_options("[1, 2]", &options).is_ok());
    assert!(parse_with_options("[[1]]", &options).is_err());
    assert!(parse_with_options("0", &ParseOptions::default().with_max_depth(0)).is_ok());
}

// ============================================================================
// Errors
// ============================================================================

#[rstest]
#[case("", TokenizeError::EmptyInput, "Cannot parse empty string")]
#[case("blabla", TokenizeError::UnknownToken("blabla".into()), "Unknown token found: blabla")]
#[case(r#""abc"#, TokenizeError::UnclosedQuotes, "Expected end of string")]
#[case(r#"["a","b",c]"#, TokenizeError::UnknownToken("c".into()), "Unknown token found: c")]
fn lexical_errors(#[case] input: &str, #[case] expected: TokenizeError, #[case] message: &str) {
    let err = parse(input).unwrap_err();
    assert!(err.is_lexical());
    assert_eq!(err.to_string(), message);
    assert_eq!(err, ParseError::TokenizeError(expected));
}

#[rstest]
#[case(r#"{"a":1,}"#)]
#[case("{1:2}")]
#[case("[1,2,]")]
#[case(r#"{"a" 1}"#)]
#[case("[1 2]")]
#[case("[1")]
#[case("1 2")]
#[case(r#""\q""#)]
fn structural_errors(#[case] input: &str) {
    assert!(parse(input).unwrap_err().is_structural());
}

#[test]
fn errors_name_the_offending_token() {
    assert_eq!(
        parse(r#"{"a": 1} x"#).unwrap_err().to_string(),
        "Unknown token found: x"
    );
    assert_eq!(parse("[true] false").unwrap_err().to_string(), "Invalid JSON at false");
    assert_eq!(
        parse(r#"{"a": 1; }"#).unwrap_err().to_string(),
        "Unknown token found: ;"
    );
}

// ============================================================================
// Equality
// ============================================================================

#[rstest]
#[case(r#"{"foo": [1, 2.5, {"bar": "baz"}], "n": null}"#)]
#[case("[[], {}, [[]], true]")]
fn parsing_is_deterministic(#[case] input: &str) {
    assert_eq!(parse(input).unwrap(), parse(input).unwrap());
    assert_eq!(input.parse::<Value>().unwrap(), parse(input).unwrap());
}

#[test]
fn tokenize_is_public() {
    let tokens = tokenize(r#"{"a": [1, 2.5]}"#).unwrap();
    let lexemes: Vec<&str> = tokens.iter().map(|token| token.lexeme).collect();
    assert_eq!(lexemes, vec!["{", r#""a""#, ":", "[", "1", ",", "2.5", "]", "}"]);
}
