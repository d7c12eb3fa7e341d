//! Linear improvement model for rewritten prompts
//!
//! The coefficients were fitted against latency and energy measurements on
//! the profiling device. This is a heuristic model over character counts,
//! not a measured result for any particular prompt.

use serde::{Deserialize, Serialize};

/// Fraction of the length reduction credited to latency.
const LENGTH_WEIGHT: f64 = 0.20;

/// Ceiling on the combined latency estimate.
const MAX_LATENCY_REDUCTION: f64 = 0.50;

/// Energy improvement tracks latency improvement at a fixed ratio.
const ENERGY_RATIO: f64 = 0.85;

/// Estimated fractional reductions for one rewrite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImprovementEstimate {
    pub latency: f64,
    pub energy: f64,
}

/// Combine the length delta with the fired rule-group weights.
///
/// `rule_impact` is the sum of the impact weights of the base groups that
/// fired; each group contributes at most once. A zero-length original
/// yields a defined zero estimate.
pub fn estimate_improvement(
    original_chars: usize,
    optimized_chars: usize,
    rule_impact: f64,
) -> ImprovementEstimate {
    let length_reduction = if original_chars == 0 {
        0.0
    } else {
        (original_chars as f64 - optimized_chars as f64) / original_chars as f64
    };

    let latency =
        (length_reduction * LENGTH_WEIGHT + rule_impact).clamp(0.0, MAX_LATENCY_REDUCTION);

    ImprovementEstimate {
        latency,
        energy: latency * ENERGY_RATIO,
    }
}

/// Coarse proxy for whether a rewrite risks changing prompt meaning.
///
/// Classification is a pure function of the length delta; no semantic
/// analysis is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityImpact {
    Maintained,
    LikelyMaintained,
    MayBeReduced,
}

impl QualityImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintained => "maintained",
            Self::LikelyMaintained => "likely_maintained",
            Self::MayBeReduced => "may_be_reduced",
        }
    }
}

impl std::fmt::Display for QualityImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn assess_quality_impact(original_chars: usize, optimized_chars: usize) -> QualityImpact {
    if original_chars == 0 {
        return QualityImpact::Maintained;
    }

    let magnitude =
        (original_chars as f64 - optimized_chars as f64).abs() / original_chars as f64;

    if magnitude < 0.10 {
        QualityImpact::Maintained
    } else if magnitude < 0.25 {
        QualityImpact::LikelyMaintained
    } else {
        QualityImpact::MayBeReduced
    }
}
