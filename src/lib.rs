//! A codec for Wexpr, a small human-readable hierarchical data format with
//! maps, arrays, strings, numbers, booleans, a null sentinel, binary blobs,
//! bareword identifiers, comments, and intra-document references.
//!
//! The two entry points are [`decode`] and [`encode`]; both are pure,
//! synchronous, and hold no state across calls (every token stream, line
//! table, and reference table lives for the duration of a single call).

mod base64;
mod diagnostic;
mod encoder;
mod error;
mod escape;
mod lexer;
mod options;
mod parser;
mod reference;
mod token;
mod utf8;
mod value;

pub use error::{DecodeError, DecodeErrorKind, EncodeError, Warning};
pub use options::EncodeOptions;
pub use value::{Array, Map, MapKey, OrderedFloat, Value};

use diagnostic::LineTable;

/// Parses `source` as a Wexpr document into a [`Value`] tree.
///
/// If `prepopulated_root` is supplied and the document's top-level value is
/// a map or array, decode merges into it: existing containers at matching
/// keys/indices are reused rather than replaced, while scalars always
/// overwrite (§4.6). `Ok((Value::Null, _))` is a legitimate result (the
/// document is the literal text `null`).
pub fn decode(source: &str, prepopulated_root: Option<Value>) -> Result<(Value, Vec<Warning>), DecodeError> {
    let tokens = lexer::tokenize(source)?;
    let table = LineTable::new(source);
    parser::parse(&tokens, source, &table, prepopulated_root)
}

/// Decodes raw bytes as a Wexpr document, first validating that `source` is
/// well-formed UTF-8 (§4.2). Host languages that work over byte buffers
/// rather than a guaranteed-UTF-8 string type need this entry point; callers
/// already holding a `&str` should use [`decode`] instead, since Rust's type
/// system makes the validation redundant.
pub fn decode_bytes(source: &[u8], prepopulated_root: Option<Value>) -> Result<(Value, Vec<Warning>), DecodeError> {
    if !utf8::is_well_formed(source) {
        let table = LineTable::new("");
        return Err(DecodeError::new("", &table, 0, 1, DecodeErrorKind::InvalidUtf8Input));
    }
    let text = std::str::from_utf8(source).expect("is_well_formed implies std::str::from_utf8 succeeds");
    decode(text, prepopulated_root)
}

/// Renders a [`Value`] tree back to Wexpr text per `options` (§4.7).
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<(String, Vec<Warning>), EncodeError> {
    encoder::encode(value, options)
}
