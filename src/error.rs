//! Public and internal error types (§7).
//!
//! Grounded on the teacher crate's `error.rs`/`parser/error.rs`: errors are
//! modeled as `thiserror`-derived data rather than ad hoc strings, with
//! `Display` producing the human-readable text and a dedicated method
//! (here, [`DecodeError::diagnostic`]/[`EncodeError::diagnostic`])
//! producing the full multi-line positional rendering from §4.4.

use std::fmt;

use thiserror::Error;

use crate::diagnostic::{self, LineTable};

/// The specific lexical or syntactic failure a [`DecodeError`] carries.
///
/// `Display` on each variant produces exactly the message text the
/// distilled spec mandates, so `DecodeErrorKind::to_string()` never needs a
/// bespoke formatter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// No token kind matched at the current offset (§4.5).
    #[error("Syntax error: Unknown token")]
    UnknownToken,
    /// A `\` escape inside a quoted string was followed by a character
    /// other than `r n t " \` (§4.3/§4.5).
    #[error("Syntax Error: Invalid escape sequence in string.")]
    InvalidEscapeSequence,
    /// A quoted string was never closed before end of input (§4.5).
    #[error("Syntax Error: Unterminated string.")]
    UnterminatedString,
    /// A `*[name]` reference has no corresponding `[name]` definition
    /// (§4.6).
    #[error("Syntax Error: Reference [{0}] is undefined.")]
    UndefinedReference(String),
    /// The top-level value was followed by further tokens (§4.6).
    #[error("Syntax Error: Garbage at end of file")]
    GarbageAtEndOfFile,
    /// A map entry's key position held a token other than `word`, `number`,
    /// or `string` (§4.6).
    #[error("Syntax Error: Expected map key as word, number, or string but instead found {0}.")]
    ExpectedMapKey(&'static str),
    /// A map entry's value position held a token with no value semantics
    /// (§4.6).
    #[error("Syntax Error: Expected a value but instead found {0}.")]
    ExpectedValue(&'static str),
    /// A quoted-string map key, once unescaped, was not valid UTF-8
    /// (§4.6/§7).
    #[error("Syntax Error: Map key is not valid UTF-8.")]
    NonUtf8StringKey,
    /// The token stream ended mid-construct (§4.6).
    #[error("Syntax Error: File ended unexpectedly")]
    UnexpectedEndOfInput,
    /// [`crate::decode_bytes`] was given a buffer that is not well-formed
    /// UTF-8 (§4.2).
    #[error("Syntax Error: Input is not valid UTF-8.")]
    InvalidUtf8Input,
}

/// A failure returned by [`crate::decode`].
///
/// Carries the 1-based `line` and 0-based `column` of the failure (matching
/// [`crate::diagnostic::LineTable::index_to_line_position`]) along with the
/// fully rendered [`diagnostic`](DecodeError::diagnostic) string.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{diagnostic}")]
pub struct DecodeError {
    /// What went wrong.
    pub kind: DecodeErrorKind,
    /// 1-based line of the failure.
    pub line: usize,
    /// 0-based column of the failure.
    pub column: usize,
    diagnostic: String,
}

impl DecodeError {
    pub(crate) fn new(source: &str, table: &LineTable, offset: usize, length: usize, kind: DecodeErrorKind) -> Self {
        let message = kind.to_string();
        let rendered = diagnostic::format_diagnostic(source, table, offset, length, &message);
        let (line, column) = table.index_to_line_position(offset);
        Self {
            kind,
            line,
            column,
            diagnostic: rendered,
        }
    }

    /// The full `LINE:COL:MESSAGE\nSOURCELINE\nINDICATOR` diagnostic text
    /// (§4.4), identical to this error's `Display` output.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}

/// A failure returned by [`crate::encode`].
///
/// The only fatal encode-time failure is a map key that is not valid UTF-8
/// (§7); all other anomalies are recorded as [`crate::Warning`]s and the
/// offending entry is elided instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A map key, once encoded, was not valid UTF-8.
    #[error("Cannot encode map key at path {path}: not valid UTF-8")]
    NonUtf8MapKey {
        /// The dotted path (§4.7) of the offending entry's container.
        path: String,
    },
}

/// A non-fatal anomaly accumulated during a [`crate::decode`] or
/// [`crate::encode`] call.
///
/// Grounded on the teacher crate's warnings-as-data approach: rather than a
/// mutable mutable "codec state" object the caller polls after the call,
/// both public entry points return their warnings inline (§7's redesign
/// note).
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A `[name]` reference definition reused a name that was already
    /// bound; the later definition wins (§4.6). Emitted alongside a
    /// [`Warning::ReferencePreviouslyDefined`] pointing at the definition
    /// being replaced, matching the spec's "emit two warnings" wording.
    ReferenceRedefined {
        /// The reused reference name.
        name: String,
        /// Byte offset of the new definition.
        new_offset: usize,
    },
    /// Companion to [`Warning::ReferenceRedefined`]: locates the prior
    /// definition that the redefinition replaced.
    ReferencePreviouslyDefined {
        /// The reused reference name.
        name: String,
        /// Byte offset of the definition being replaced.
        prior_offset: usize,
    },
    /// An entry in `EncodeOptions::binary_paths` did not match any node
    /// visited while encoding; the entry was silently ignored (§4.7/§7).
    UnreachableBinaryPath {
        /// The unmatched path.
        path: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ReferenceRedefined { name, new_offset } => {
                write!(f, "reference [{name}] redefined at byte {new_offset}")
            }
            Warning::ReferencePreviouslyDefined { name, prior_offset } => {
                write!(f, "reference [{name}] was previously defined at byte {prior_offset}")
            }
            Warning::UnreachableBinaryPath { path } => {
                write!(f, "binary_paths entry {path} did not match any encoded node")
            }
        }
    }
}
