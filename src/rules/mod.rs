//! Substitution rules for prompt rewriting
//!
//! Two rule sources feed the optimizer: a fixed set of base rule groups
//! compiled at startup, and an optional learned-rules document produced by
//! prior measurement runs.

mod base;
mod learned;

pub use base::{base_rule_groups, RuleGroup};
pub use learned::{LearnedRules, SAFE_REMOVAL_KEYWORDS};
