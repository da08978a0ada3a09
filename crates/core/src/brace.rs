//! Brace matching for macro argument extraction.
//!
//! This module provides the depth-counting scan used to pull brace-delimited
//! arguments out of macro calls. Nesting inside an argument is tracked, so a
//! regular expression is deliberately not used here.

/// Find the `}` that closes the `{` at byte index `open`.
///
/// Scans forward from `open + 1` with a nesting counter. A brace whose
/// immediately preceding byte is `\` is treated as escaped and does not
/// change the nesting depth. Returns the byte index of the closing brace,
/// or `None` when the text ends before the group closes. For an empty
/// group `{}` the returned index is `open + 1`.
///
/// The escape check looks back exactly one byte: after a literal
/// double-backslash, as in `\\{`, the brace is still classified as escaped.
/// Known limitation, kept for parity with the notebooks already rewritten.
///
/// `open` must be the byte index of a `{` in `text`.
pub fn find_matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = open + 1;

    while i < bytes.len() {
        // Safe on multi-byte text: `{`, `}`, and `\` are ASCII, and UTF-8
        // continuation bytes never collide with ASCII values.
        let escaped = bytes[i - 1] == b'\\';
        match bytes[i] {
            b'{' if !escaped => depth += 1,
            b'}' if !escaped => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}
