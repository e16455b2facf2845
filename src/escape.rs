//! The five-entry escape map used inside quoted Wexpr strings (§4.3).

/// Applies the escape map in reverse: turns `\\`, `\r`, `\n`, `\t`, `\"`
/// into their literal characters. `raw` must already have had its
/// surrounding quotes stripped. Returns `None` if an escape introduces a
/// character outside `r n t " \`; callers turn that into a lexical error
/// located at the backslash.
#[must_use]
pub fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'r' => out.push('\r'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            '"' => out.push('"'),
            _ => return None,
        }
    }
    Some(out)
}

/// Applies the escape map forward: replaces `\`, CR, LF, TAB, and `"` with
/// their two-character escape sequences. Used by the encoder when a string
/// must be emitted in quoted form.
#[must_use]
pub fn escape(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for c in src.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
