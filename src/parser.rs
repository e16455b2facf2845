//! The recursive-descent parser (§4.6).
//!
//! Walks the token stream produced by [`crate::lexer::tokenize`], building a
//! [`Value`] tree and threading an optional prepopulated root through the
//! container-reuse ("merge") rule: a document's map/array literal reuses an
//! existing container at the same key/index instead of replacing it, but
//! any scalar always overwrites whatever was there.

use crate::base64;
use crate::diagnostic::LineTable;
use crate::error::{DecodeError, DecodeErrorKind, Warning};
use crate::reference::ReferenceTable;
use crate::token::{Token, TokenKind};
use crate::value::{Array, Map, MapKey, Value};

/// Parses `tokens` into a [`Value`] tree, merging into `prepopulated_root`
/// when it is supplied and the document's top-level value is a container
/// (§6).
pub fn parse<'a>(
    tokens: &'a [Token],
    source: &'a str,
    table: &'a LineTable,
    prepopulated_root: Option<Value>,
) -> Result<(Value, Vec<Warning>), DecodeError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
        table,
        refs: ReferenceTable::new(),
        warnings: Vec::new(),
    };
    let value = parser.parse_value_required(prepopulated_root)?;
    if parser.pos < parser.tokens.len() {
        let offset = parser.tokens[parser.pos].byte_offset;
        return Err(parser.error_at(offset, 1, DecodeErrorKind::GarbageAtEndOfFile));
    }
    Ok((value, parser.warnings))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    source: &'a str,
    table: &'a LineTable,
    refs: ReferenceTable,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    fn error_at(&self, offset: usize, length: usize, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(self.source, self.table, offset, length, kind)
    }

    fn error_at_end(&self, kind: DecodeErrorKind) -> DecodeError {
        self.error_at(self.source.len(), 1, kind)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Reads the next token and advances past it, or raises
    /// `UnexpectedEndOfInput` at end-of-source.
    fn take(&mut self) -> Result<Token, DecodeError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| self.error_at_end(DecodeErrorKind::UnexpectedEndOfInput))?;
        self.pos += 1;
        Ok(tok)
    }

    /// Reads one value-position token, transparently unwrapping any number
    /// of leading `reference_def` tokens (each registers its binding as a
    /// side effect and yields its own wrapped value -- §4.6). `existing` is
    /// consulted only when the resulting token is `map_open`/`array_open`.
    fn parse_value_required(&mut self, existing: Option<Value>) -> Result<Value, DecodeError> {
        let tok = self.take()?;
        match tok.kind {
            TokenKind::String => Ok(Value::String(tok.lexeme)),
            TokenKind::Number => Ok(Value::Number(parse_number(&tok.lexeme))),
            TokenKind::Word => Ok(word_to_value(&tok.lexeme)),
            TokenKind::Binary => Ok(Value::Binary(base64::decode(&tok.lexeme))),
            TokenKind::Reference => match self.refs.get(&tok.lexeme) {
                Some(value) => Ok(value.clone()),
                None => Err(self.error_at(
                    tok.byte_offset,
                    tok.lexeme.len() + 3,
                    DecodeErrorKind::UndefinedReference(tok.lexeme),
                )),
            },
            TokenKind::MapOpen => self.parse_map(existing),
            TokenKind::ArrayOpen => self.parse_array(existing),
            TokenKind::ReferenceDef => {
                let value = self.parse_value_required(None)?;
                self.refs.define(tok.lexeme, value.clone(), tok.byte_offset, &mut self.warnings);
                Ok(value)
            }
            TokenKind::CloseScope => Err(self.error_at(tok.byte_offset, 1, DecodeErrorKind::ExpectedValue(describe(tok.kind)))),
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::BlockComment | TokenKind::LineComment => {
                unreachable!("lexer::tokenize discards non-syntactic tokens before the parser sees them")
            }
        }
    }

    /// Reads a map entry's key token, first transparently processing any
    /// leading `reference_def` tokens the way [`Self::parse_value_required`]
    /// does for ordinary value positions (this is what lets a document like
    /// `@( [root] @(val 1) child *[root] )` define `root` inline before the
    /// map's first real entry, per scenario 6 of this crate's `SPEC_FULL.md`).
    fn read_map_key(&mut self) -> Result<MapKey, DecodeError> {
        loop {
            let tok = self.take()?;
            match tok.kind {
                TokenKind::ReferenceDef => {
                    let value = self.parse_value_required(None)?;
                    self.refs.define(tok.lexeme, value, tok.byte_offset, &mut self.warnings);
                }
                TokenKind::Word | TokenKind::String => return Ok(MapKey::Str(tok.lexeme)),
                TokenKind::Number => return Ok(MapKey::from(parse_number(&tok.lexeme))),
                other => {
                    return Err(self.error_at(tok.byte_offset, 1, DecodeErrorKind::ExpectedMapKey(describe(other))));
                }
            }
        }
    }

    fn parse_map(&mut self, existing: Option<Value>) -> Result<Value, DecodeError> {
        let mut map: Map = match existing {
            Some(Value::Map(m)) => m,
            _ => Map::new(),
        };
        loop {
            match self.peek_kind() {
                None => return Err(self.error_at_end(DecodeErrorKind::UnexpectedEndOfInput)),
                Some(TokenKind::CloseScope) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let key = self.read_map_key()?;
                    let existing_child = map.get(&key).cloned();
                    let value = self.parse_value_required(existing_child)?;
                    map.insert(key, value);
                }
            }
        }
        Ok(Value::Map(map))
    }

    fn parse_array(&mut self, existing: Option<Value>) -> Result<Value, DecodeError> {
        let mut array: Array = match existing {
            Some(Value::Array(a)) => a,
            _ => Array::new(),
        };
        let mut index = 0usize;
        loop {
            match self.peek_kind() {
                None => return Err(self.error_at_end(DecodeErrorKind::UnexpectedEndOfInput)),
                Some(TokenKind::CloseScope) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let existing_child = array.get(index).cloned();
                    let value = self.parse_value_required(existing_child)?;
                    if index < array.len() {
                        array[index] = value;
                    } else {
                        array.push(value);
                    }
                    index += 1;
                }
            }
        }
        Ok(Value::Array(array))
    }
}

fn word_to_value(lexeme: &str) -> Value {
    match lexeme {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "nil" | "null" => Value::Null,
        other => Value::String(other.to_string()),
    }
}

fn parse_number(lexeme: &str) -> f64 {
    lexeme.parse().expect("the tokenizer only emits well-formed number lexemes")
}

/// A short, human-readable name for a token kind, used in "expected X but
/// found Y" diagnostics (§4.6).
fn describe(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Whitespace => "whitespace",
        TokenKind::Newline => "a newline",
        TokenKind::BlockComment => "a comment",
        TokenKind::LineComment => "a comment",
        TokenKind::String => "a string",
        TokenKind::Number => "a number",
        TokenKind::Word => "a word",
        TokenKind::Binary => "binary",
        TokenKind::MapOpen => "map",
        TokenKind::ArrayOpen => "array",
        TokenKind::Reference => "a reference",
        TokenKind::ReferenceDef => "a reference definition",
        TokenKind::CloseScope => "a closing parenthesis",
    }
}
