//! Fixed rule groups applied to every prompt

use regex::Regex;

/// A named set of case-insensitive text substitutions sharing one
/// improvement weight.
///
/// Groups are built once at startup and passed into the optimizer; there is
/// no global rule table. Application order matters: each group rewrites the
/// output of the previous one.
pub struct RuleGroup {
    pub name: &'static str,
    /// Compiled (pattern, replacement) pairs, applied in order.
    pub patterns: Vec<(Regex, &'static str)>,
    /// Fractional latency improvement credited when the group fires.
    pub impact: f64,
}

impl RuleGroup {
    /// Run every substitution in the group against `text`.
    ///
    /// Returns the rewritten text and whether anything changed relative to
    /// the group's input.
    pub fn apply(&self, text: &str) -> (String, bool) {
        let mut out = text.to_string();
        for (pattern, replacement) in &self.patterns {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        let changed = out != text;
        (out, changed)
    }
}

/// The default rule groups, in application order.
///
/// Impact weights come from averaged measurements on the profiling device;
/// they are heuristic inputs to the improvement model, not guarantees.
pub fn base_rule_groups() -> Vec<RuleGroup> {
    vec![
        RuleGroup {
            name: "remove_politeness",
            patterns: compile(&[
                (r"\bplease\s+", ""),
                (r"\bcould you\s+", ""),
                (r"\bwould you\s+", ""),
                (r"\bI would like you to\s+", ""),
                (r"\bcan you please\s+", ""),
            ]),
            impact: 0.05,
        },
        RuleGroup {
            name: "simplify_instructions",
            patterns: compile(&[
                (r"\bprovide a detailed explanation of\b", "explain"),
                (r"\bgive me a comprehensive overview of\b", "describe"),
                (r"\bI need you to analyze\b", "analyze"),
                (r"\bcan you help me understand\b", "explain"),
            ]),
            impact: 0.10,
        },
        RuleGroup {
            name: "remove_verbose_modifiers",
            patterns: compile(&[
                (r"\s+in great detail\b", ""),
                (r"\s+thoroughly\b", ""),
                (r"\s+comprehensively\b", ""),
                (r"\s+extensively\b", ""),
                (r"\s+as much as possible\b", ""),
            ]),
            impact: 0.15,
        },
        RuleGroup {
            name: "remove_redundant_instructions",
            patterns: compile(&[
                (r"\bmake sure to\s+", ""),
                (r"\bbe sure to\s+", ""),
                (r"\bdon't forget to\s+", ""),
            ]),
            impact: 0.05,
        },
    ]
}

fn compile(pairs: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    pairs
        .iter()
        .map(|(pattern, replacement)| {
            // Patterns are static and known-valid.
            let re = Regex::new(&format!("(?i){pattern}")).unwrap();
            (re, *replacement)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> RuleGroup {
        base_rule_groups()
            .into_iter()
            .find(|g| g.name == name)
            .unwrap()
    }

    #[test]
    fn test_politeness_removed_case_insensitively() {
        let g = group("remove_politeness");
        let (out, changed) = g.apply("PLEASE list the steps");
        assert!(changed);
        assert_eq!(out, "list the steps");
    }

    #[test]
    fn test_unmatched_text_is_unchanged() {
        let g = group("remove_politeness");
        let (out, changed) = g.apply("list the steps");
        assert!(!changed);
        assert_eq!(out, "list the steps");
    }

    #[test]
    fn test_instruction_phrase_replaced() {
        let g = group("simplify_instructions");
        let (out, changed) = g.apply("Provide a detailed explanation of recursion");
        assert!(changed);
        assert_eq!(out, "explain recursion");
    }

    #[test]
    fn test_verbose_modifier_consumes_leading_whitespace() {
        let g = group("remove_verbose_modifiers");
        let (out, changed) = g.apply("describe the algorithm in great detail");
        assert!(changed);
        assert_eq!(out, "describe the algorithm");
    }

    #[test]
    fn test_group_order_and_weights() {
        let groups = base_rule_groups();
        let names: Vec<_> = groups.iter().map(|g| g.name).collect();
        assert_eq!(
            names,
            vec![
                "remove_politeness",
                "simplify_instructions",
                "remove_verbose_modifiers",
                "remove_redundant_instructions",
            ]
        );
        let weights: Vec<_> = groups.iter().map(|g| g.impact).collect();
        assert_eq!(weights, vec![0.05, 0.10, 0.15, 0.05]);
    }
}
