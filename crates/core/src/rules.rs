//! Ordered pattern rule tables.
//!
//! A rule set is a sequence of regex/replacement pairs applied strictly in
//! order, each rule scanning the output of the one before it. Order is part
//! of the contract: reordering the table changes results on real input.

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling a rule table.
///
/// Both variants mean the table itself is broken, so callers treat them as
/// fatal before any document is touched.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// Pattern source text.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The replacement references a capture group the pattern does not define.
    #[error(
        "replacement `{replacement}` references group {group}, but `{pattern}` defines {available} capture group(s)"
    )]
    GroupOutOfRange {
        /// Pattern source text.
        pattern: String,
        /// Replacement template text.
        replacement: String,
        /// The out-of-range group number.
        group: usize,
        /// Number of capture groups the pattern defines.
        available: usize,
    },
}

/// A compiled pattern and its replacement template.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    /// Compile one rule, validating the pattern and the template.
    ///
    /// The regex engine substitutes an empty string for a reference to a
    /// group the pattern does not capture, which would silently corrupt
    /// output. Template references are therefore checked here instead.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, RuleError> {
        let compiled = Regex::new(pattern).map_err(|source| RuleError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        // captures_len() counts the implicit whole-match group 0.
        let available = compiled.captures_len();
        for group in referenced_groups(replacement) {
            if group >= available {
                return Err(RuleError::GroupOutOfRange {
                    pattern: pattern.to_string(),
                    replacement: replacement.to_string(),
                    group,
                    available: available - 1,
                });
            }
        }

        Ok(Rule {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    /// Source text of the compiled pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement template text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Collect the numeric capture groups a replacement template references.
///
/// Understands both forms the regex engine accepts, `$N` and `${N}`, and
/// skips the `$$` literal escape. The rule tables use numeric groups only,
/// so named references are left to the engine.
fn referenced_groups(template: &str) -> Vec<usize> {
    let bytes = template.as_bytes();
    let mut groups = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        match bytes.get(i + 1).copied() {
            Some(b'$') => i += 2,
            Some(b'{') => {
                let start = i + 2;
                let mut end = start;
                while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                    end += 1;
                }
                if end > start
                    && bytes.get(end) == Some(&b'}')
                    && let Ok(group) = template[start..end].parse()
                {
                    groups.push(group);
                    i = end + 1;
                } else {
                    i += 1;
                }
            }
            Some(digit) if digit.is_ascii_digit() => {
                let start = i + 1;
                let mut end = start;
                while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                    end += 1;
                }
                if let Ok(group) = template[start..end].parse() {
                    groups.push(group);
                }
                i = end;
            }
            _ => i += 1,
        }
    }

    groups
}

/// An ordered sequence of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile a rule table, preserving its order.
    pub fn from_table(table: &[(&str, &str)]) -> Result<Self, RuleError> {
        let rules = table
            .iter()
            .map(|(pattern, replacement)| Rule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet { rules })
    }

    /// Compile the standard crypto-notation table.
    pub fn standard() -> Result<Self, RuleError> {
        Self::from_table(STANDARD_RULES)
    }

    /// Apply every rule in order.
    ///
    /// Each rule rewrites all of its matches, leftmost first and without
    /// overlap, over the output of the previous rule.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            if rule.pattern.is_match(&current) {
                current = rule
                    .pattern
                    .replace_all(&current, rule.replacement.as_str())
                    .into_owned();
            }
        }
        current
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

/// The standard crypto-notation table, in application order.
///
/// Targets the custom macro vocabulary of the workbook sources and rewrites
/// it to plain LaTeX that KaTeX renders directly.
pub const STANDARD_RULES: &[(&str, &str)] = &[
    (r"\\algo\{([^}]+)\}", r"\mathsf{${1}}"),
    (r"\\params", r"\mathit{pp}"),
    (r"\\state", r"\mathit{state}"),
    (r"\\var\{([^}]+)\}", r"\mathit{${1}}"),
    (r"\\sk", r"\mathit{sk}"),
    (r"\\pk", r"\mathit{pk}"),
    (r"\\adv", r"\mathcal{A}"),
    (r"\\bdv", r"\mathcal{B}"),
    (r"\\secpar", r"\lambda"),
    (r"\\secparam", r"1^\lambda"),
    (r"\\GG", r"\mathbb{G}"),
    (r"\\ZZ", r"\mathbb{Z}"),
    (r"\\NN", r"\mathbb{N}"),
    (r"\\defeq", ":="),
    (r"\\sample", r"\leftarrow_R"),
    (r"\\gets", r"\leftarrow"),
    // Both \pr spellings open a \Pr[ ; nothing rewrites the closing brace.
    (r"\\pr\{", r"\Pr["),
    (r"\\pr\\\{", r"\Pr["),
    (r"\\negl", r"\mathrm{negl}"),
    (r"\\advantage\{([^}]+)\}\{([^}]+)\}", r"\mathrm{Adv}^{\text{${1}}}_{${2}}"),
    (r"\\Game", r"\mathsf{Game}"),
    (r"\\pcassert", r"\mathbf{assert}"),
    (r"\\pcif", r"\mathbf{if}"),
    (r"\\pcthen", r"\mathbf{then}"),
    (r"\\pcreturn", r"\mathbf{return}"),
    (r"\\gparam", r"(\mathbb{G}, p, g)"),
    (r"\\grgen", r"\mathsf{GrGen}"),
];
