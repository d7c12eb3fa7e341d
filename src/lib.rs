//! PromptOptimizer - rule-based prompt rewriting for cheaper on-device inference
//!
//! This library rewrites prompts before they reach a mobile LLM runtime,
//! trading a few characters of phrasing for measurable latency and energy
//! savings, and reports an estimate of the improvement for each rewrite.
//!
//! ## Key Features
//!
//! - **Rule Groups**: Fixed, ordered regex substitution groups (politeness,
//!   instruction simplification, verbose modifiers, redundant instructions)
//! - **Learned Rules**: Optional keyword/phrase data from prior measurement
//!   runs, loaded from JSON with soft degradation when absent
//! - **Improvement Estimation**: Linear model over length delta and fired
//!   rule weights, capped and paired with a quality-risk classification
//! - **Batch Reports**: Aggregate statistics and before/after samples for
//!   whole prompt sets

pub mod config;
pub mod optimization;
pub mod report;
pub mod rules;

pub use config::{Config, ConfigBuilder, ConfigError};
pub use optimization::{
    OptimizationDetails, OptimizationRecord, PromptOptimizer, QualityImpact,
};
pub use report::{generate_report, generate_report_with, BatchSummary, ReportOptions};
pub use rules::{base_rule_groups, LearnedRules, RuleGroup, SAFE_REMOVAL_KEYWORDS};
