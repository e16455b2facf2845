//! Encode-time configuration (§4.8).
//!
//! Grounded on the teacher crate's `ParserOptions`: a plain, `Default`-able
//! struct of independent knobs rather than a builder, passed by reference
//! into the one entry point that needs it.

use std::collections::HashSet;

/// Configuration for [`crate::encode`].
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// When `true`, containers are rendered one entry per line with
    /// tab indentation; when `false`, a container and its entries sit on a
    /// single line separated by spaces.
    pub pretty: bool,
    /// Dotted paths (§4.7, rooted at `-`) whose `String` value must be
    /// emitted as `<base64>` instead of a bareword or quoted literal. A
    /// path with no corresponding node is dropped silently and recorded as
    /// a [`crate::Warning::UnreachableBinaryPath`].
    pub binary_paths: HashSet<String>,
}
