//! The encoder: a recursive walk of a [`Value`] tree into Wexpr text (§4.7).
//!
//! Grounded on the teacher crate's `value_zipper`/path-tracking encoder
//! pattern: each recursive call carries the dotted path of the node it is
//! about to write, so `binary_paths` can be consulted by exact string match
//! without a separate path-building pass.

use std::fmt::Write as _;

use crate::base64;
use crate::error::{EncodeError, Warning};
use crate::escape;
use crate::lexer::{is_word_char, match_number};
use crate::options::EncodeOptions;
use crate::value::{Map, MapKey, Value};

/// Encodes `value` as Wexpr text per `options` (§6).
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<(String, Vec<Warning>), EncodeError> {
    let mut out = String::new();
    let mut used_binary_paths = std::collections::HashSet::new();
    write_value(value, "-", 0, options, &mut out, &mut used_binary_paths)?;

    let mut warnings: Vec<Warning> = options
        .binary_paths
        .iter()
        .filter(|p| !used_binary_paths.contains(p.as_str()))
        .map(|p| Warning::UnreachableBinaryPath { path: p.clone() })
        .collect();
    warnings.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));

    Ok((out, warnings))
}

fn write_value(
    value: &Value,
    path: &str,
    depth: usize,
    options: &EncodeOptions,
    out: &mut String,
    used_binary_paths: &mut std::collections::HashSet<String>,
) -> Result<(), EncodeError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Binary(bytes) => {
            let _ = write!(out, "<{}>", base64::encode(bytes));
        }
        Value::String(s) => write_string(s, path, options, out, used_binary_paths),
        Value::Array(items) => write_array(items, path, depth, options, out, used_binary_paths)?,
        Value::Map(map) => write_map(map, path, depth, options, out, used_binary_paths)?,
    }
    Ok(())
}

fn write_string(
    s: &str,
    path: &str,
    options: &EncodeOptions,
    out: &mut String,
    used_binary_paths: &mut std::collections::HashSet<String>,
) {
    if options.binary_paths.contains(path) {
        used_binary_paths.insert(path.to_string());
        let _ = write!(out, "<{}>", base64::encode(s.as_bytes()));
    } else if is_safe_bareword(s) {
        out.push_str(s);
    } else {
        out.push('"');
        out.push_str(&escape::escape(s));
        out.push('"');
    }
}

/// A string may be emitted unquoted only if it would tokenize back as a
/// single `Word` (not split, and not consumed instead by the
/// higher-priority `Number` token), and is not one of the four reserved
/// words that would decode back as a `Bool`/`Null` instead of a `String`.
fn is_safe_bareword(s: &str) -> bool {
    if s.is_empty() || matches!(s, "true" | "false" | "nil" | "null") {
        return false;
    }
    if match_number(s) == Some(s.len()) {
        return false;
    }
    s.chars().all(is_word_char)
}

fn write_array(
    items: &[Value],
    path: &str,
    depth: usize,
    options: &EncodeOptions,
    out: &mut String,
    used_binary_paths: &mut std::collections::HashSet<String>,
) -> Result<(), EncodeError> {
    out.push_str("#(");
    for (i, item) in items.iter().enumerate() {
        let child_path = format!("{path}.{}", i + 1);
        write_separator(options, depth + 1, i == 0, out);
        write_value(item, &child_path, depth + 1, options, out, used_binary_paths)?;
    }
    write_closing(options, depth, items.is_empty(), out);
    Ok(())
}

fn write_map(
    map: &Map,
    path: &str,
    depth: usize,
    options: &EncodeOptions,
    out: &mut String,
    used_binary_paths: &mut std::collections::HashSet<String>,
) -> Result<(), EncodeError> {
    if is_array_like(map) {
        out.push_str("#(");
        for (i, (_, value)) in map.iter().enumerate() {
            let child_path = format!("{path}.{}", i + 1);
            write_separator(options, depth + 1, i == 0, out);
            write_value(value, &child_path, depth + 1, options, out, used_binary_paths)?;
        }
        write_closing(options, depth, map.is_empty(), out);
        return Ok(());
    }

    out.push_str("@(");
    for (i, (key, value)) in map.iter().enumerate() {
        let key_text = map_key_text(key);
        let child_path = format!("{path}.{key_text}");
        write_separator(options, depth + 1, i == 0, out);
        write_map_key(key, out)?;
        out.push(' ');
        write_value(value, &child_path, depth + 1, options, out, used_binary_paths)?;
    }
    write_closing(options, depth, map.is_empty(), out);
    Ok(())
}

/// A map key is never itself a `binary_paths` target (only the values at a
/// path are forceable per §4.7), so keys are always rendered as if
/// `binary_paths` were empty rather than threading the real options through.
fn write_map_key(key: &MapKey, out: &mut String) -> Result<(), EncodeError> {
    match key {
        MapKey::Num(n) => {
            let _ = write!(out, "{}", n.0);
        }
        MapKey::Str(s) => write_string(s, "", &EncodeOptions::default(), out, &mut std::collections::HashSet::new()),
    }
    Ok(())
}

fn map_key_text(key: &MapKey) -> String {
    match key {
        MapKey::Num(n) => n.0.to_string(),
        MapKey::Str(s) => s.clone(),
    }
}

/// A `Map` is array-like, and therefore encoded with `#( ... )`, iff its
/// keys are exactly `1..=len` with no gaps (§4.7). An empty map is treated
/// as a map, not a zero-length array, so a hand-built `Value::Map`
/// round-trips distinctly from `Value::Array(vec![])`.
fn is_array_like(map: &Map) -> bool {
    if map.is_empty() {
        return false;
    }
    (1..=map.len() as u64).all(|i| map.contains_key(&MapKey::from(i as f64)))
}

fn write_separator(options: &EncodeOptions, depth: usize, is_first: bool, out: &mut String) {
    if options.pretty {
        out.push('\n');
        out.push_str(&"\t".repeat(depth));
    } else if !is_first {
        out.push(' ');
    }
}

fn write_closing(options: &EncodeOptions, depth: usize, is_empty: bool, out: &mut String) {
    if options.pretty && !is_empty {
        out.push('\n');
        out.push_str(&"\t".repeat(depth));
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value::Map;

    fn encode_default(value: &Value) -> String {
        encode(value, &EncodeOptions::default()).unwrap().0
    }

    #[test]
    fn scalars() {
        assert_eq!(encode_default(&Value::Null), "null");
        assert_eq!(encode_default(&Value::Bool(true)), "true");
        assert_eq!(encode_default(&Value::Number(42.0)), "42");
        assert_eq!(encode_default(&Value::String("hello".into())), "hello");
        assert_eq!(encode_default(&Value::String("has space".into())), "\"has space\"");
    }

    #[test]
    fn reserved_words_are_always_quoted_when_stored_as_strings() {
        assert_eq!(encode_default(&Value::String("true".into())), "\"true\"");
        assert_eq!(encode_default(&Value::String("null".into())), "\"null\"");
    }

    #[test]
    fn numeric_looking_strings_are_quoted_to_avoid_relexing_as_numbers() {
        assert_eq!(encode_default(&Value::String("123".into())), "\"123\"");
        assert_eq!(encode_default(&Value::String("-1.5".into())), "\"-1.5\"");
    }

    #[test]
    fn array_and_non_pretty_map() {
        assert_eq!(
            encode_default(&Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])),
            "#(1 2)"
        );
        let mut map = Map::new();
        map.insert(MapKey::from("a".to_string()), Value::Number(1.0));
        assert_eq!(encode_default(&Value::Map(map)), "@(a 1)");
    }

    #[test]
    fn map_with_keys_one_through_n_encodes_as_array() {
        let mut map = Map::new();
        map.insert(MapKey::from(1.0), Value::String("a".into()));
        map.insert(MapKey::from(2.0), Value::String("b".into()));
        assert_eq!(encode_default(&Value::Map(map)), "#(a b)");
    }

    #[test]
    fn empty_map_is_not_treated_as_an_array() {
        assert_eq!(encode_default(&Value::Map(Map::new())), "@()");
    }

    #[test]
    fn binary_forcing_and_pretty_layout_scenario_five() {
        let mut map = Map::new();
        map.insert(MapKey::from("key1".to_string()), Value::String("string".into()));
        map.insert(MapKey::from("key2".to_string()), Value::String("hi".into()));
        map.insert(MapKey::from("key3".to_string()), Value::Bool(true));
        map.insert(
            MapKey::from("key4".to_string()),
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]),
        );
        map.insert(MapKey::from("key5".to_string()), Value::String("foo".into()));

        let mut options = EncodeOptions { pretty: true, binary_paths: Default::default() };
        options.binary_paths.insert("-.key1".to_string());
        options.binary_paths.insert("-.key2".to_string());

        let (text, warnings) = encode(&Value::Map(map), &options).unwrap();
        assert!(text.contains("key1 <c3RyaW5n>"));
        assert!(text.contains("key2 <aGk=>"));
        assert!(text.contains("key3 true"));
        assert!(text.contains("key5 foo"));
        assert!(text.contains("key4 #(\n\t\t1\n\t\t2\n\t\t3\n\t)"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unmatched_binary_path_becomes_a_warning() {
        let mut options = EncodeOptions::default();
        options.binary_paths.insert("-.nope".to_string());
        let (_, warnings) = encode(&Value::Number(1.0), &options).unwrap();
        assert_eq!(warnings, vec![Warning::UnreachableBinaryPath { path: "-.nope".to_string() }]);
    }
}
