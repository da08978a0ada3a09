//! Fragment rewriting pipeline.

use std::borrow::Cow;

use crate::expand::expand_game_macro;
use crate::rules::{RuleError, RuleSet};

/// Rewrites markdown fragments: macro expansion first, then the rule table.
#[derive(Debug, Clone)]
pub struct MacroRewriter {
    rules: RuleSet,
    // The borrow fast path is only sound when every pattern needs a
    // leading backslash to match.
    backslash_gated: bool,
}

impl MacroRewriter {
    /// Build a rewriter over the standard rule table.
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self::with_rules(RuleSet::standard()?))
    }

    /// Build a rewriter over a custom rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        let backslash_gated = rules.iter().all(|rule| rule.pattern().starts_with(r"\\"));
        Self {
            rules,
            backslash_gated,
        }
    }

    /// Rewrite one markdown fragment.
    ///
    /// `\game{A}{B}` expansion runs before the rule table, so the rules see
    /// the expanded text. A fragment without a single backslash cannot
    /// contain a macro call and is returned borrowed.
    pub fn rewrite_fragment<'a>(&self, fragment: &'a str) -> Cow<'a, str> {
        if self.backslash_gated && !fragment.contains('\\') {
            return Cow::Borrowed(fragment);
        }
        let expanded = expand_game_macro(fragment);
        Cow::Owned(self.rules.apply(&expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> MacroRewriter {
        MacroRewriter::new().expect("standard rules should compile")
    }

    #[test]
    fn fragment_without_backslash_is_borrowed() {
        let fragment = "Plain prose with unicode: π ≈ 3.14159, 𝔾 stays.";
        let result = rewriter().rewrite_fragment(fragment);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, fragment);
    }

    #[test]
    fn rewrites_variable_macro() {
        assert_eq!(rewriter().rewrite_fragment(r"\var{foo}"), r"\mathit{foo}");
    }

    #[test]
    fn probability_rewrite_leaves_the_close_alone() {
        assert_eq!(rewriter().rewrite_fragment(r"\pr\{X\}"), r"\Pr[X\}");
    }

    #[test]
    fn expansion_precedes_pattern_rules() {
        // Run the rules first and the \pr rewrite would break the brace
        // structure the expander needs.
        assert_eq!(
            rewriter().rewrite_fragment(r"\game{\pr{X}}{t}"),
            r"\Pr[X}_{t}"
        );
    }

    #[test]
    fn expanded_arguments_are_rewritten_by_rules() {
        assert_eq!(
            rewriter().rewrite_fragment(r"\game{\var{G}}{0}"),
            r"\mathit{G}_{0}"
        );
    }

    #[test]
    fn rewrite_is_idempotent_on_realistic_fragments() {
        let fragments = [
            r"The adversary \adv wins \game{\var{G}}{0} with probability \pr{b = b'}.",
            r"Let \secpar be the security parameter and pick $x \sample \ZZ$.",
            r"\algo{KeyGen} outputs (\pk, \sk) \gets \algo{Gen}(\secparam).",
            r"\pcif b = 1 \pcthen \pcreturn \var{out}",
            r"Unicode: Gruppe 𝔾, Σ-protocol, λ över fältet.",
        ];
        let rewriter = rewriter();
        for fragment in fragments {
            let once = rewriter.rewrite_fragment(fragment).into_owned();
            let twice = rewriter.rewrite_fragment(&once).into_owned();
            assert_eq!(once, twice, "second pass changed `{fragment}`");
        }
    }

    #[test]
    fn custom_rules_without_backslash_skip_the_fast_path() {
        let rules = RuleSet::from_table(&[("alpha", "a")]).expect("table should compile");
        let rewriter = MacroRewriter::with_rules(rules);
        assert_eq!(rewriter.rewrite_fragment("alpha beta"), "a beta");
    }
}
