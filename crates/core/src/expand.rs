//! Two-argument macro expansion.
//!
//! `\game{A}{B}` calls carry arbitrary brace nesting inside their arguments,
//! which puts them out of reach of the pattern rules. This module rewrites
//! them with a cursor-driven scan before the rules run, turning each
//! well-formed call into `A_{B}`.

use crate::brace::find_matching_close;

/// Name of the two-argument macro expanded in production input.
pub const GAME_MACRO: &str = "game";

/// Expand every well-formed `\game{A}{B}` into `A_{B}`.
pub fn expand_game_macro(text: &str) -> String {
    expand_two_arg_macro(text, GAME_MACRO)
}

/// Expand every well-formed `\name{A}{B}` into `A_{B}`.
///
/// The scan is left to right and non-overlapping: after an expansion the
/// cursor jumps past the consumed call. A malformed occurrence, meaning an
/// unterminated first argument, no `{` immediately after it, or an
/// unterminated second argument, is copied through byte-for-byte; the cursor
/// then advances a single position, so a well-formed call nested inside the
/// malformed span is still found.
pub fn expand_two_arg_macro(text: &str, name: &str) -> String {
    let prefix = format!("\\{name}{{");
    if !text.contains(&prefix) {
        return text.to_string();
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    // Bytes before `emitted` are already in `out`; the span between
    // `emitted` and the cursor is pending verbatim copy.
    let mut emitted = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i..].starts_with(prefix.as_bytes()) {
            let open1 = i + prefix.len() - 1;
            if let Some((arg1, arg2, end)) = parse_argument_pair(text, open1) {
                out.push_str(&text[emitted..i]);
                out.push_str(arg1);
                out.push_str("_{");
                out.push_str(arg2);
                out.push('}');
                i = end;
                emitted = end;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&text[emitted..]);
    out
}

/// Extract `{A}{B}` where `open1` is the first `{`. Returns both argument
/// slices and the byte index just past the second `}`.
fn parse_argument_pair(text: &str, open1: usize) -> Option<(&str, &str, usize)> {
    let close1 = find_matching_close(text, open1)?;
    let open2 = close1 + 1;
    if text.as_bytes().get(open2) != Some(&b'{') {
        return None;
    }
    let close2 = find_matching_close(text, open2)?;
    Some((
        &text[open1 + 1..close1],
        &text[open2 + 1..close2],
        close2 + 1,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_basic_call() {
        assert_eq!(expand_game_macro(r"\game{A}{B}"), "A_{B}");
    }

    #[test]
    fn expands_call_in_surrounding_text() {
        assert_eq!(
            expand_game_macro(r"win \game{G}{0} holds"),
            r"win G_{0} holds"
        );
    }

    #[test]
    fn expands_multiple_calls() {
        assert_eq!(
            expand_game_macro(r"\game{a}{0} vs \game{b}{1}"),
            "a_{0} vs b_{1}"
        );
    }

    #[test]
    fn expands_empty_arguments() {
        assert_eq!(expand_game_macro(r"\game{}{}"), "_{}");
    }

    #[test]
    fn keeps_escaped_braces_inside_first_argument() {
        assert_eq!(expand_two_arg_macro(r"\g{a\{b\}c}{d}", "g"), r"a\{b\}c_{d}");
    }

    #[test]
    fn unterminated_first_argument_passes_through() {
        let text = r"\g{unterminated";
        assert_eq!(expand_two_arg_macro(text, "g"), text);
    }

    #[test]
    fn missing_second_group_passes_through() {
        let text = r"\game{a} {b}";
        assert_eq!(expand_game_macro(text), text);
    }

    #[test]
    fn unterminated_second_argument_passes_through() {
        let text = r"\game{a}{b";
        assert_eq!(expand_game_macro(text), text);
    }

    #[test]
    fn outer_call_consumes_nested_call() {
        assert_eq!(
            expand_game_macro(r"\game{\game{a}{b}}{c}"),
            r"\game{a}{b}_{c}"
        );
    }

    #[test]
    fn nested_call_inside_malformed_span_is_found() {
        // The outer call never completes, but single-step advance still
        // reaches the inner one.
        assert_eq!(expand_game_macro(r"\game{\game{a}{b}"), r"\game{a_{b}");
    }

    #[test]
    fn text_without_the_macro_is_unchanged() {
        let text = r"plain prose, \var{x}, and π ≈ 3.14159";
        assert_eq!(expand_game_macro(text), text);
    }

    #[test]
    fn multibyte_text_around_calls_survives() {
        assert_eq!(
            expand_game_macro(r"Sicherheitsspiel \game{Prälude}{λ} fertig"),
            r"Sicherheitsspiel Prälude_{λ} fertig"
        );
    }
}
