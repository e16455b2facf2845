//! The Wexpr tokenizer (§4.5).
//!
//! A single forward pass over the source text. At each offset the token
//! kinds are tried in the fixed priority order from §4.5; the first whose
//! grammar matches at that offset wins and advances the cursor by the
//! match length. Non-syntactic tokens (whitespace, newlines, comments) are
//! produced internally but dropped before the result is returned, so the
//! parser only ever sees the thirteen-minus-four syntactic kinds.

use crate::diagnostic::LineTable;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::escape;
use crate::token::{Token, TokenKind};

const WORD_EXCLUDED: &[char] = &['<', '>', '*', '#', '@', '(', ')', ';', '[', ']'];

pub(crate) fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !WORD_EXCLUDED.contains(&c)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenizes `source`, returning only the syntactic token kinds.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DecodeError> {
    let table = LineTable::new(source);
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < source.len() {
        let rest = &source[pos..];
        let mut chars = rest.char_indices();
        let (_, c0) = chars.next().expect("pos < source.len()");

        // 1. whitespace
        if c0 == ' ' || c0 == '\t' {
            let len = rest.find(|c: char| c != ' ' && c != '\t').unwrap_or(rest.len());
            tokens.push(Token { kind: TokenKind::Whitespace, lexeme: rest[..len].to_string(), byte_offset: pos });
            pos += len;
            continue;
        }

        // 2. newline
        if c0 == '\r' || c0 == '\n' {
            let len = rest.find(|c: char| c != '\r' && c != '\n').unwrap_or(rest.len());
            tokens.push(Token { kind: TokenKind::Newline, lexeme: rest[..len].to_string(), byte_offset: pos });
            pos += len;
            continue;
        }

        // 3. block comment ;(-- ... --)
        if rest.starts_with(";(--") {
            match rest[4..].find("--)") {
                Some(body_len) => {
                    let len = 4 + body_len + 3;
                    tokens.push(Token {
                        kind: TokenKind::BlockComment,
                        lexeme: rest[..len].to_string(),
                        byte_offset: pos,
                    });
                    pos += len;
                    continue;
                }
                None => {
                    return Err(DecodeError::new(
                        source,
                        &table,
                        source.len(),
                        1,
                        DecodeErrorKind::UnexpectedEndOfInput,
                    ));
                }
            }
        }

        // 4. line comment
        if c0 == ';' {
            let len = rest.find('\n').unwrap_or(rest.len());
            tokens.push(Token { kind: TokenKind::LineComment, lexeme: rest[..len].to_string(), byte_offset: pos });
            pos += len;
            continue;
        }

        // 5. string
        if c0 == '"' {
            let (lexeme, consumed) = scan_string(source, &table, pos)?;
            tokens.push(Token {
                kind: TokenKind::String,
                lexeme,
                byte_offset: pos,
            });
            pos += consumed;
            continue;
        }

        // 6. number
        if let Some(len) = match_number(rest) {
            tokens.push(Token {
                kind: TokenKind::Number,
                lexeme: rest[..len].to_string(),
                byte_offset: pos,
            });
            pos += len;
            continue;
        }

        // 7. word
        if is_word_char(c0) {
            let len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
            tokens.push(Token {
                kind: TokenKind::Word,
                lexeme: rest[..len].to_string(),
                byte_offset: pos,
            });
            pos += len;
            continue;
        }

        // 8. binary <base64>
        if c0 == '<' {
            if let Some(len) = match_binary(rest) {
                tokens.push(Token {
                    kind: TokenKind::Binary,
                    lexeme: rest[1..len - 1].to_string(),
                    byte_offset: pos,
                });
                pos += len;
                continue;
            }
        }

        // 9. map_open
        if rest.starts_with("@(") {
            tokens.push(Token {
                kind: TokenKind::MapOpen,
                lexeme: "@(".to_string(),
                byte_offset: pos,
            });
            pos += 2;
            continue;
        }

        // 10. array_open
        if rest.starts_with("#(") {
            tokens.push(Token {
                kind: TokenKind::ArrayOpen,
                lexeme: "#(".to_string(),
                byte_offset: pos,
            });
            pos += 2;
            continue;
        }

        // 11. reference *[ident]
        if rest.starts_with("*[") {
            if let Some((ident, len)) = match_bracketed_ident(&rest[1..], false) {
                tokens.push(Token {
                    kind: TokenKind::Reference,
                    lexeme: ident,
                    byte_offset: pos,
                });
                pos += 1 + len;
                continue;
            }
        }

        // 12. reference_def [ WS? ident WS? ]
        if c0 == '[' {
            if let Some((ident, len)) = match_bracketed_ident(rest, true) {
                tokens.push(Token {
                    kind: TokenKind::ReferenceDef,
                    lexeme: ident,
                    byte_offset: pos,
                });
                pos += len;
                continue;
            }
        }

        // 13. close_scope
        if c0 == ')' {
            tokens.push(Token {
                kind: TokenKind::CloseScope,
                lexeme: ")".to_string(),
                byte_offset: pos,
            });
            pos += 1;
            continue;
        }

        return Err(DecodeError::new(source, &table, pos, 1, DecodeErrorKind::UnknownToken));
    }

    tokens.retain(|t| t.kind.is_syntactic());
    Ok(tokens)
}

/// Matches `[ -? (digits.digits | digits) ]` at the front of `s`. Returns
/// the byte length of the match, or `None`.
pub(crate) fn match_number(s: &str) -> Option<usize> {
    let mut bytes = s.as_bytes();
    let mut len = 0;
    if bytes.first() == Some(&b'-') {
        len += 1;
        bytes = &bytes[1..];
    }
    let int_digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if int_digits == 0 {
        return None;
    }
    len += int_digits;
    bytes = &bytes[int_digits..];
    if bytes.first() == Some(&b'.') {
        let frac_digits = bytes[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_digits > 0 {
            len += 1 + frac_digits;
        }
    }
    Some(len)
}

/// Matches `< [A-Za-z0-9+/=]+ >` at the front of `s`, including both
/// delimiters. Returns the total byte length, or `None`.
fn match_binary(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let payload_len = bytes[1..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
        .count();
    if payload_len == 0 {
        return None;
    }
    if bytes.get(1 + payload_len) == Some(&b'>') {
        Some(1 + payload_len + 1)
    } else {
        None
    }
}

/// Matches `[ ident ]` (reference_def, `allow_leading_ws = true`, so
/// surrounding whitespace inside the brackets is tolerated) or `[ident]`
/// (reference, `allow_leading_ws = false`) at the front of `s`, including
/// both brackets. Returns `(identifier, total_byte_length)`, or `None`.
fn match_bracketed_ident(s: &str, allow_inner_ws: bool) -> Option<(String, usize)> {
    let mut chars = s.char_indices();
    let (_, open) = chars.next()?;
    if open != '[' {
        return None;
    }
    let mut pos = 1;
    if allow_inner_ws {
        let ws_len = s[pos..].find(|c: char| c != ' ' && c != '\t').unwrap_or(s.len() - pos);
        pos += ws_len;
    }
    let ident_start = pos;
    let mut cs = s[pos..].chars();
    let first = cs.next()?;
    if !is_ident_start(first) {
        return None;
    }
    pos += first.len_utf8();
    let ident_len = s[pos..].find(|c: char| !is_ident_continue(c)).unwrap_or(s.len() - pos);
    pos += ident_len;
    let ident = s[ident_start..pos].to_string();
    if allow_inner_ws {
        let ws_len = s[pos..].find(|c: char| c != ' ' && c != '\t').unwrap_or(s.len() - pos);
        pos += ws_len;
    }
    if s[pos..].starts_with(']') {
        pos += 1;
        Some((ident, pos))
    } else {
        None
    }
}

/// Scans a quoted string starting at `pos` (which must point at the
/// opening `"`). Returns the unescaped content and the total number of
/// bytes consumed, including both quotes.
fn scan_string(source: &str, table: &LineTable, pos: usize) -> Result<(String, usize), DecodeError> {
    let rest = &source[pos..];
    let mut raw = String::new();
    let mut iter = rest.char_indices().skip(1); // skip opening quote
    loop {
        let Some((i, c)) = iter.next() else {
            return Err(DecodeError::new(
                source,
                table,
                source.len(),
                1,
                DecodeErrorKind::UnterminatedString,
            ));
        };
        match c {
            '"' => {
                let consumed = i + 1;
                let unescaped = escape::unescape(&raw).expect("each escape was validated as it was appended");
                return Ok((unescaped, consumed));
            }
            '\\' => {
                raw.push('\\');
                match iter.next() {
                    Some((_, next)) => raw.push(next),
                    None => {
                        return Err(DecodeError::new(
                            source,
                            table,
                            source.len(),
                            1,
                            DecodeErrorKind::UnterminatedString,
                        ));
                    }
                }
                // Validate immediately so the error points at the backslash,
                // matching §4.5 ("located at the backslash, length 2").
                if escape::unescape(&raw).is_none() {
                    return Err(DecodeError::new(
                        source,
                        table,
                        pos + i,
                        2,
                        DecodeErrorKind::InvalidEscapeSequence,
                    ));
                }
            }
            other => raw.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn whitespace_and_comments_are_discarded() {
        let tokens = tokenize("  a ;comment\nb ;(-- block --) c").unwrap();
        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["a", "b", "c"]);
    }

    #[test]
    fn recognizes_every_kind() {
        assert_eq!(
            kinds(r#"@( #( "s" 1 1.5 word <aGk=> *[x] [x] ) )"#),
            vec![
                TokenKind::MapOpen,
                TokenKind::ArrayOpen,
                TokenKind::String,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Word,
                TokenKind::Binary,
                TokenKind::Reference,
                TokenKind::ReferenceDef,
                TokenKind::CloseScope,
                TokenKind::CloseScope,
            ]
        );
    }

    #[test]
    fn negative_number() {
        let tokens = tokenize("-1.5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "-1.5");
    }

    #[test]
    fn bare_minus_without_digits_is_a_word() {
        let tokens = tokenize("-").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].lexeme, "-");
    }

    #[test]
    fn string_escapes_are_unescaped_in_the_lexeme() {
        let tokens = tokenize(r#""a\nb\"c""#).unwrap();
        assert_eq!(tokens[0].lexeme, "a\nb\"c");
    }

    #[test]
    fn invalid_escape_is_lexical_error_at_backslash() {
        let err = tokenize(r#""asdf \a""#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidEscapeSequence);
        assert_eq!((err.line, err.column), (1, 6));
    }

    #[test]
    fn unterminated_string_errors_at_end_of_source() {
        let err = tokenize(r#""abc"#).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnterminatedString);
    }

    #[test]
    fn unknown_token_on_stray_punctuation() {
        let err = tokenize("@x").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnknownToken);
        assert_eq!(err.column, 0);
    }

    #[test]
    fn malformed_bracket_without_close_is_unknown_token() {
        // No closing `]` anywhere, so `[` cannot be a reference_def either.
        let err = tokenize("[ ident").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnknownToken);
    }

    #[test]
    fn reference_def_tolerates_inner_whitespace() {
        let tokens = tokenize("[ foo ]").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::ReferenceDef);
        assert_eq!(tokens[0].lexeme, "foo");
    }

    #[test]
    fn tokenizer_totality_concatenation_equals_input_modulo_escapes() {
        // For inputs without strings, concatenating raw token spans
        // (including discarded trivia) reconstructs the source exactly.
        let source = "@( a 1 #( 2 ) )  ;(-- c --)\n";
        let mut pos = 0;
        let mut rebuilt = String::new();
        while pos < source.len() {
            let rest = &source[pos..];
            let c0 = rest.chars().next().unwrap();
            let step = if c0 == ' ' || c0 == '\t' {
                rest.find(|c: char| c != ' ' && c != '\t').unwrap_or(rest.len())
            } else if c0 == '\n' || c0 == '\r' {
                rest.find(|c: char| c != '\n' && c != '\r').unwrap_or(rest.len())
            } else if rest.starts_with(";(--") {
                4 + rest[4..].find("--)").unwrap() + 3
            } else if c0.is_ascii_digit() {
                match_number(rest).unwrap()
            } else if rest.starts_with("@(") || rest.starts_with("#(") {
                2
            } else if c0 == ')' {
                1
            } else {
                rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len())
            };
            rebuilt.push_str(&rest[..step]);
            pos += step;
        }
        assert_eq!(rebuilt, source);
    }
}
