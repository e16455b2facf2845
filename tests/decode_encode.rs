//! Black-box tests exercising `decode`/`encode` together, independent of
//! any module's internal representation.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use rstest::rstest;
use wexpr::{decode, encode, DecodeErrorKind, EncodeOptions, MapKey, Value};

#[rstest]
#[case("true", Value::Bool(true))]
#[case("false", Value::Bool(false))]
#[case("nil", Value::Null)]
#[case("null", Value::Null)]
#[case("42", Value::Number(42.0))]
#[case("-7.5", Value::Number(-7.5))]
#[case("hello", Value::String("hello".into()))]
#[case(r#""quoted string""#, Value::String("quoted string".into()))]
fn decodes_scalars(#[case] source: &str, #[case] expected: Value) {
    let (value, warnings) = decode(source, None).unwrap();
    assert_eq!(value, expected);
    assert!(warnings.is_empty());
}

#[test]
fn scenario_one_merge_into_prepopulated_array() {
    let prepopulated = Value::Array(vec![
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Number(5.0),
        Value::Null,
        Value::String("String".into()),
    ]);
    let (value, _) = decode("#(1 2 3 4 5)", Some(prepopulated)).unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0),
            Value::Number(4.0),
            Value::Number(5.0),
            Value::String("String".into()),
        ])
    );
}

#[test]
fn scenario_two_undefined_reference() {
    let err = decode("@(a *[b])", None).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UndefinedReference("b".into()));
    assert_eq!(err.line, 1);
    assert_eq!(err.diagnostic().lines().next().unwrap(), "1:5:Syntax Error: Reference [b] is undefined.");
}

#[test]
fn scenario_three_wrong_key_kind() {
    let err = decode("@(#() asdf)", None).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::ExpectedMapKey("array"));
    assert_eq!(
        err.diagnostic().lines().next().unwrap(),
        "1:3:Syntax Error: Expected map key as word, number, or string but instead found array."
    );
}

#[test]
fn scenario_four_invalid_escape() {
    let err = decode(r#""asdf \a""#, None).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::InvalidEscapeSequence);
    assert_eq!(
        err.diagnostic().lines().next().unwrap(),
        "1:7:Syntax Error: Invalid escape sequence in string."
    );
}

#[test]
fn scenario_five_binary_forcing_and_pretty_layout() {
    let (value, _) = decode(r#"@( key1 string key2 hi key3 true key4 #( 1 2 3 ) key5 foo )"#, None).unwrap();
    let mut binary_paths = HashSet::new();
    binary_paths.insert("-.key1".to_string());
    binary_paths.insert("-.key2".to_string());
    let options = EncodeOptions { pretty: true, binary_paths };

    let (text, warnings) = encode(&value, &options).unwrap();
    assert!(warnings.is_empty());
    assert!(text.contains("key1 <c3RyaW5n>"));
    assert!(text.contains("key2 <aGk=>"));
    assert!(text.contains("key3 true"));
    assert!(text.contains("key5 foo"));
    assert!(text.contains("key4 #(\n\t\t1\n\t\t2\n\t\t3\n\t)"));
}

#[test]
fn scenario_six_reference_definition_before_a_map_key() {
    let (value, warnings) = decode("@( [root] @( val 1 ) child *[root] )", None).unwrap();
    assert!(warnings.is_empty());
    let child = value.as_map().unwrap().get(&MapKey::from("child".to_string())).unwrap();
    assert_eq!(
        child.as_map().unwrap().get(&MapKey::from("val".to_string())),
        Some(&Value::Number(1.0))
    );

    let (text, _) = encode(&value, &EncodeOptions::default()).unwrap();
    let (reencoded, _) = decode(&text, None).unwrap();
    assert_eq!(value, reencoded);
}

#[test]
fn decode_then_encode_round_trips_for_simple_documents() {
    let documents = [
        "null",
        "true",
        "false",
        "42",
        "hello world",
        r#"@( a 1 b "two words" c #( 1 2 3 ) )"#,
        "#(1 2 #(3 4) 5)",
    ];
    for doc in documents {
        let (value, _) = decode(doc, None).unwrap();
        let (text, _) = encode(&value, &EncodeOptions::default()).unwrap();
        let (reparsed, _) = decode(&text, None).unwrap();
        assert_eq!(value, reparsed, "round trip failed for {doc:?} via {text:?}");
    }
}

#[test]
fn comments_and_whitespace_are_insignificant() {
    let (value, _) = decode("@( ;line comment\n  a 1 ;(-- block comment --) b 2 )", None).unwrap();
    assert_eq!(value.as_map().unwrap().get(&MapKey::from("a".to_string())), Some(&Value::Number(1.0)));
    assert_eq!(value.as_map().unwrap().get(&MapKey::from("b".to_string())), Some(&Value::Number(2.0)));
}

#[quickcheck_macros::quickcheck]
fn decoding_never_panics_on_arbitrary_text(source: String) -> bool {
    let _ = decode(&source, None);
    true
}
