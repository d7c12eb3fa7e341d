//! Learned rules produced by the measurement analysis pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Keywords that may be dropped outright in aggressive mode.
///
/// Removing any other high-cost keyword risks changing what the prompt asks
/// for, so the allowlist stays fixed regardless of what the rules file
/// reports as expensive.
pub const SAFE_REMOVAL_KEYWORDS: [&str; 3] = ["thoroughly", "extensively", "comprehensively"];

/// Optional keyword and phrase data derived from prior measurement runs.
///
/// Every field defaults to an empty container so an absent key in the JSON
/// document is an explicit, checked state rather than a lookup failure.
/// Unknown keys are ignored. Read-only after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnedRules {
    /// Keywords the analysis found disproportionately expensive.
    pub high_cost_keywords: Vec<String>,
    /// Modifiers flagged as verbose by the analysis.
    pub verbose_modifiers: Vec<String>,
    /// Literal phrase -> cheaper replacement phrase.
    // BTreeMap keeps application order deterministic across runs.
    pub recommended_alternatives: BTreeMap<String, String>,
}

impl LearnedRules {
    pub fn is_empty(&self) -> bool {
        self.high_cost_keywords.is_empty()
            && self.verbose_modifiers.is_empty()
            && self.recommended_alternatives.is_empty()
    }

    /// Load rules from a JSON document.
    ///
    /// A missing, unreadable, or malformed file degrades to the empty rule
    /// set: the optimizer must stay usable without historical data.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No rules file at {}, using base rules only", path.display());
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read rules file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&content) {
            Ok(rules) => {
                info!(
                    "Loaded {} learned keywords and {} alternatives from {}",
                    rules.high_cost_keywords.len(),
                    rules.recommended_alternatives.len(),
                    path.display()
                );
                rules
            }
            Err(e) => {
                warn!("Ignoring malformed rules file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
