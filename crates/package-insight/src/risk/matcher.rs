use super::rules::PatternRule;
use super::RiskIndex;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A rule that could not be compiled. It never matches; the rest of the pass continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFault {
    pub index: RiskIndex,
    /// Position of the rule in the table it came from.
    pub position: usize,
    pub pattern: String,
    pub message: String,
}

pub(crate) struct CompiledRule<'a> {
    pub(crate) rule: &'a PatternRule,
    regex: Regex,
}

impl CompiledRule<'_> {
    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// Compile the active rules of one category. Inactive rules are skipped outright.
pub(crate) fn compile_active<'a>(
    index: RiskIndex,
    rules: &'a [PatternRule],
    size_limit: usize,
    faults: &mut Vec<RuleFault>,
) -> Vec<CompiledRule<'a>> {
    let mut compiled = Vec::new();

    for (position, rule) in rules.iter().enumerate() {
        if !rule.active {
            continue;
        }

        match RegexBuilder::new(&rule.pattern)
            .size_limit(size_limit)
            .dfa_size_limit(size_limit)
            .build()
        {
            Ok(regex) => compiled.push(CompiledRule { rule, regex }),
            Err(err) => {
                warn!(
                    index = index.label(),
                    position,
                    pattern = %rule.pattern,
                    error = %err,
                    "rule pattern rejected; treating as non-matching"
                );
                faults.push(RuleFault {
                    index,
                    position,
                    pattern: rule.pattern.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    compiled
}
