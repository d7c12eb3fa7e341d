//! Prompt rewriting pipeline and improvement model

mod estimate;
mod optimizer;

pub use estimate::{assess_quality_impact, estimate_improvement, ImprovementEstimate, QualityImpact};
pub use optimizer::PromptOptimizer;

use serde::{Deserialize, Serialize};

/// Transformation record for a single prompt, minus the raw texts.
///
/// Created fresh per `optimize` call and never mutated afterwards. Lengths
/// are character counts; the optimized length is measured after whitespace
/// collapse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationDetails {
    pub original_length: usize,
    pub optimized_length: usize,
    /// Signed: replacement phrases can make a prompt longer.
    pub length_reduction: i64,
    /// Fired rule-group names plus synthesized per-keyword tags.
    pub changes_applied: Vec<String>,
    pub estimated_latency_reduction: f64,
    pub estimated_energy_reduction: f64,
    pub quality_impact: QualityImpact,
}

/// One row of a batch run: the prompt texts merged with their details.
///
/// Flattens to a single JSON object when serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub original: String,
    pub optimized: String,
    #[serde(flatten)]
    pub details: OptimizationDetails,
}
