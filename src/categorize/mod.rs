use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

use crate::models::Category;

/// Ordered keyword table. Patterns are regex alternations matched
/// case-insensitively anywhere in the description; first match wins.
pub(crate) const KEYWORD_RULES: &[(&str, Category)] = &[
    ("rent|mortgage|house", Category::Housing),
    ("food|grocery|restaurant", Category::Food),
    ("car|gas|transport", Category::Transport),
    ("movie|entertainment|game", Category::Entertainment),
    ("saving|deposit|investment", Category::Savings),
];

pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    regex: Regex,
    category: Category,
}

impl Categorizer {
    /// Compile a keyword table. Patterns that fail to compile are logged and
    /// dropped; the returned list names them.
    pub(crate) fn new(rules: &[(&str, Category)]) -> (Self, Vec<String>) {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut bad_patterns = Vec::new();

        for &(pattern, category) in rules {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => compiled.push(CompiledRule { regex, category }),
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "skipping invalid keyword rule");
                    bad_patterns.push(pattern.to_string());
                }
            }
        }

        (Self { rules: compiled }, bad_patterns)
    }

    pub(crate) fn categorize(&self, description: &str) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(description))
            .map(|rule| rule.category)
            .unwrap_or(Category::Others)
    }
}

fn default_categorizer() -> &'static Categorizer {
    static CATEGORIZER: OnceLock<Categorizer> = OnceLock::new();
    CATEGORIZER.get_or_init(|| {
        let (categorizer, bad_patterns) = Categorizer::new(KEYWORD_RULES);
        if !bad_patterns.is_empty() {
            tracing::error!(
                ?bad_patterns,
                "built-in keyword rules failed to compile, those descriptions fall into Others"
            );
        }
        categorizer
    })
}

/// Classify a description with the built-in keyword table.
pub(crate) fn categorize(description: &str) -> Category {
    default_categorizer().categorize(description)
}
