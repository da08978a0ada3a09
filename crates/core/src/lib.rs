#![deny(missing_docs)]
//! Demacro core: brace-aware macro expansion and ordered pattern rules for
//! LaTeX-flavored markdown fragments.

/// Brace matching for macro argument extraction.
pub mod brace;
/// Two-argument macro expansion.
pub mod expand;
/// Fragment rewriting pipeline.
pub mod rewrite;
/// Ordered pattern rule tables.
pub mod rules;

pub use brace::find_matching_close;
pub use expand::{GAME_MACRO, expand_game_macro, expand_two_arg_macro};
pub use rewrite::MacroRewriter;
pub use rules::{Rule, RuleError, RuleSet, STANDARD_RULES};
