//! Optimizer implementation

use super::{assess_quality_impact, estimate_improvement, OptimizationDetails, OptimizationRecord};
use crate::rules::{base_rule_groups, LearnedRules, RuleGroup, SAFE_REMOVAL_KEYWORDS};
use regex::{NoExpand, RegexBuilder};
use std::path::Path;

/// Rewrites prompts through an ordered list of rule groups and optional
/// learned rules.
///
/// Rules are read-only after construction, so repeated calls on one
/// instance are independent and deterministic.
pub struct PromptOptimizer {
    rules: Vec<RuleGroup>,
    learned: LearnedRules,
}

impl PromptOptimizer {
    /// Build with the default rule groups and, if a path is given, learned
    /// rules loaded from it. A missing or malformed rules file degrades to
    /// base rules only.
    pub fn new(rules_path: Option<&Path>) -> Self {
        let learned = rules_path.map(LearnedRules::load).unwrap_or_default();
        Self::with_rules(base_rule_groups(), learned)
    }

    /// Build from an explicit rule-group list.
    pub fn with_rules(rules: Vec<RuleGroup>, learned: LearnedRules) -> Self {
        Self { rules, learned }
    }

    /// Rewrite one prompt.
    ///
    /// Groups compose sequentially: each operates on the output of the
    /// previous one. The returned details cover lengths, fired rules, the
    /// improvement estimate, and the quality-impact classification.
    pub fn optimize(&self, prompt: &str, aggressive: bool) -> (String, OptimizationDetails) {
        let mut optimized = prompt.to_string();
        let mut changes = Vec::new();
        let mut rule_impact = 0.0;

        for group in &self.rules {
            let (next, changed) = group.apply(&optimized);
            if changed {
                changes.push(group.name.to_string());
                rule_impact += group.impact;
            }
            optimized = next;
        }

        if !self.learned.is_empty() {
            optimized = self.apply_learned_rules(optimized, aggressive, &mut changes);
        }

        let optimized = collapse_whitespace(&optimized);

        let original_chars = prompt.chars().count();
        let optimized_chars = optimized.chars().count();
        let improvement = estimate_improvement(original_chars, optimized_chars, rule_impact);

        let details = OptimizationDetails {
            original_length: original_chars,
            optimized_length: optimized_chars,
            length_reduction: original_chars as i64 - optimized_chars as i64,
            changes_applied: changes,
            estimated_latency_reduction: improvement.latency,
            estimated_energy_reduction: improvement.energy,
            quality_impact: assess_quality_impact(original_chars, optimized_chars),
        };

        (optimized, details)
    }

    /// Rewrite a batch of prompts independently, preserving input order.
    pub fn batch_optimize(&self, prompts: &[String], aggressive: bool) -> Vec<OptimizationRecord> {
        prompts
            .iter()
            .map(|prompt| {
                let (optimized, details) = self.optimize(prompt, aggressive);
                OptimizationRecord {
                    original: prompt.clone(),
                    optimized,
                    details,
                }
            })
            .collect()
    }

    fn apply_learned_rules(
        &self,
        mut text: String,
        aggressive: bool,
        changes: &mut Vec<String>,
    ) -> String {
        for (phrase, replacement) in &self.learned.recommended_alternatives {
            if !text.to_lowercase().contains(&phrase.to_lowercase()) {
                continue;
            }
            // Literal match; replacement text goes in verbatim.
            let pattern = RegexBuilder::new(&regex::escape(phrase))
                .case_insensitive(true)
                .build()
                .unwrap();
            text = pattern
                .replace_all(&text, NoExpand(replacement.as_str()))
                .into_owned();
            changes.push(format!("replaced_{}", phrase.replace(' ', "_")));
        }

        if aggressive {
            for keyword in &self.learned.high_cost_keywords {
                // Arbitrary high-cost keywords may carry meaning; only the
                // allowlisted modifiers are ever dropped.
                if !SAFE_REMOVAL_KEYWORDS.contains(&keyword.as_str()) {
                    continue;
                }
                let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
                    .case_insensitive(true)
                    .build()
                    .unwrap();
                if pattern.is_match(&text) {
                    text = pattern.replace_all(&text, "").into_owned();
                    changes.push(format!("removed_{keyword}"));
                }
            }
        }

        text
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn base_optimizer() -> PromptOptimizer {
        PromptOptimizer::with_rules(base_rule_groups(), LearnedRules::default())
    }

    fn learned(
        keywords: &[&str],
        alternatives: &[(&str, &str)],
    ) -> LearnedRules {
        LearnedRules {
            high_cost_keywords: keywords.iter().map(|s| s.to_string()).collect(),
            verbose_modifiers: Vec::new(),
            recommended_alternatives: alternatives
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_politeness_and_verbosity_stripped() {
        let optimizer = base_optimizer();
        let (optimized, details) = optimizer.optimize(
            "Could you please provide a detailed explanation of photosynthesis thoroughly?",
            false,
        );

        assert_eq!(optimized, "explain photosynthesis?");
        assert!(details.changes_applied.contains(&"remove_politeness".to_string()));
        assert!(details.changes_applied.contains(&"simplify_instructions".to_string()));
        assert!(details.changes_applied.contains(&"remove_verbose_modifiers".to_string()));
        assert!(details.optimized_length < details.original_length);
        assert!(details.length_reduction > 0);
    }

    #[test]
    fn test_empty_prompt_is_a_noop() {
        let optimizer = base_optimizer();
        let (optimized, details) = optimizer.optimize("", false);

        assert_eq!(optimized, "");
        assert_eq!(details.original_length, 0);
        assert_eq!(details.optimized_length, 0);
        assert_eq!(details.length_reduction, 0);
        assert_eq!(details.estimated_latency_reduction, 0.0);
        assert_eq!(details.quality_impact, crate::optimization::QualityImpact::Maintained);
        assert!(details.changes_applied.is_empty());
    }

    #[test]
    fn test_optimize_is_deterministic() {
        let optimizer = PromptOptimizer::with_rules(
            base_rule_groups(),
            learned(&["thoroughly"], &[("explain in detail", "explain")]),
        );
        let prompt = "Please explain in detail how Thoroughly tested code behaves";

        let first = optimizer.optimize(prompt, true);
        let second = optimizer.optimize(prompt, true);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn test_already_optimized_text_passes_through() {
        let optimizer = base_optimizer();
        let (once, _) = optimizer.optimize("Please summarize the article thoroughly", false);
        let (twice, details) = optimizer.optimize(&once, false);

        assert_eq!(once, twice);
        assert!(details.changes_applied.is_empty());
    }

    #[test]
    fn test_whitespace_always_collapsed() {
        let optimizer = base_optimizer();
        let (optimized, _) = optimizer.optimize("  list\t\tthe   steps \n involved  ", false);

        assert_eq!(optimized, "list the steps involved");
        assert!(!optimized.contains("  "));
    }

    #[test]
    fn test_alternative_replaced_case_insensitively() {
        let optimizer = PromptOptimizer::with_rules(
            Vec::new(),
            learned(&[], &[("explain in detail", "explain")]),
        );
        let (optimized, details) = optimizer.optimize("Explain In Detail the process", false);

        assert_eq!(optimized, "explain the process");
        assert!(details
            .changes_applied
            .contains(&"replaced_explain_in_detail".to_string()));
    }

    #[test]
    fn test_learned_tags_carry_no_impact_weight() {
        let optimizer = PromptOptimizer::with_rules(
            Vec::new(),
            learned(&[], &[("explain in detail", "describe")]),
        );
        let prompt = "Explain in detail the water cycle";
        let (optimized, details) = optimizer.optimize(prompt, false);

        // Only the length delta contributes when no base group fires.
        let expected = (prompt.chars().count() as f64 - optimized.chars().count() as f64)
            / prompt.chars().count() as f64
            * 0.20;
        assert!((details.estimated_latency_reduction - expected).abs() < 1e-9);
    }

    #[test]
    fn test_arbitrary_keyword_never_removed() {
        let optimizer =
            PromptOptimizer::with_rules(Vec::new(), learned(&["write"], &[]));

        let (kept, details) = optimizer.optimize("write an essay about rivers", false);
        assert_eq!(kept, "write an essay about rivers");
        assert!(details.changes_applied.is_empty());

        // Membership in the allowlist is required even in aggressive mode.
        let (still_kept, details) = optimizer.optimize("write an essay about rivers", true);
        assert_eq!(still_kept, "write an essay about rivers");
        assert!(details.changes_applied.is_empty());
    }

    #[test]
    fn test_allowlisted_keyword_removed_only_when_aggressive() {
        let optimizer =
            PromptOptimizer::with_rules(base_rule_groups(), learned(&["thoroughly"], &[]));

        // Sentence-initial, so the verbose-modifier group cannot catch it.
        let prompt = "Thoroughly review the patch";

        let (conservative, details) = optimizer.optimize(prompt, false);
        assert_eq!(conservative, "Thoroughly review the patch");
        assert!(details.changes_applied.is_empty());

        let (aggressive, details) = optimizer.optimize(prompt, true);
        assert_eq!(aggressive, "review the patch");
        assert_eq!(details.changes_applied, vec!["removed_thoroughly".to_string()]);
    }

    #[test]
    fn test_energy_tracks_latency() {
        let optimizer = base_optimizer();
        let (_, details) =
            optimizer.optimize("Please describe the setup in great detail", false);

        assert!(details.estimated_latency_reduction > 0.0);
        assert!(details.estimated_latency_reduction <= 0.50);
        assert_eq!(
            details.estimated_energy_reduction,
            details.estimated_latency_reduction * 0.85
        );
    }

    #[test]
    fn test_batch_preserves_order() {
        let optimizer = base_optimizer();
        let prompts = vec![
            "Please list the planets".to_string(),
            "Summarize the abstract".to_string(),
        ];

        let records = optimizer.batch_optimize(&prompts, false);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original, prompts[0]);
        assert_eq!(records[1].original, prompts[1]);
        assert_eq!(records[0].optimized, "list the planets");
        assert_eq!(records[1].optimized, "Summarize the abstract");
    }

    #[test]
    fn test_record_serializes_flat() {
        let optimizer = base_optimizer();
        let records = optimizer.batch_optimize(&["Please wait".to_string()], false);

        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["original"], "Please wait");
        assert_eq!(value["optimized"], "wait");
        assert_eq!(value["original_length"], 11);
        assert_eq!(value["quality_impact"], "may_be_reduced");
        assert!(value["changes_applied"].is_array());
    }
}
