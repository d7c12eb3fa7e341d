//! Batch report rendering
//!
//! Pure formatting over batch records: aggregate statistics plus a fixed
//! layout text block with a handful of before/after samples. No I/O.

use crate::optimization::OptimizationRecord;
use serde::Serialize;
use std::fmt::Write;

/// Knobs for the rendered report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// How many before/after samples to include.
    pub sample_count: usize,
    /// Character prefix shown for each sample text.
    pub sample_prefix_chars: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sample_count: 5,
            sample_prefix_chars: 100,
        }
    }
}

/// Arithmetic means across a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_prompts: usize,
    pub avg_latency_reduction: f64,
    pub avg_energy_reduction: f64,
    pub avg_length_reduction: f64,
}

impl BatchSummary {
    /// An empty batch yields zeros rather than NaN.
    pub fn from_records(records: &[OptimizationRecord]) -> Self {
        let n = records.len();
        if n == 0 {
            return Self {
                total_prompts: 0,
                avg_latency_reduction: 0.0,
                avg_energy_reduction: 0.0,
                avg_length_reduction: 0.0,
            };
        }

        let count = n as f64;
        Self {
            total_prompts: n,
            avg_latency_reduction: records
                .iter()
                .map(|r| r.details.estimated_latency_reduction)
                .sum::<f64>()
                / count,
            avg_energy_reduction: records
                .iter()
                .map(|r| r.details.estimated_energy_reduction)
                .sum::<f64>()
                / count,
            avg_length_reduction: records
                .iter()
                .map(|r| r.details.length_reduction as f64)
                .sum::<f64>()
                / count,
        }
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Optimization Summary ===")?;
        writeln!(f, "Prompts processed: {}", self.total_prompts)?;
        writeln!(f, "Avg latency reduction: {:.1}%", self.avg_latency_reduction * 100.0)?;
        writeln!(f, "Avg energy reduction: {:.1}%", self.avg_energy_reduction * 100.0)?;
        writeln!(f, "Avg length reduction: {:.1} characters", self.avg_length_reduction)?;
        Ok(())
    }
}

/// Render the full report with default options.
pub fn generate_report(records: &[OptimizationRecord]) -> String {
    generate_report_with(records, &ReportOptions::default())
}

/// Render the aggregate stats followed by up to `sample_count` samples.
pub fn generate_report_with(records: &[OptimizationRecord], opts: &ReportOptions) -> String {
    let summary = BatchSummary::from_records(records);
    let bar = "=".repeat(80);
    let rule = "-".repeat(80);

    let mut out = String::new();
    let _ = writeln!(out, "{bar}");
    let _ = writeln!(out, "PROMPT OPTIMIZATION REPORT");
    let _ = writeln!(out, "{bar}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Prompts: {}", summary.total_prompts);
    let _ = writeln!(
        out,
        "Average Latency Reduction: {:.1}%",
        summary.avg_latency_reduction * 100.0
    );
    let _ = writeln!(
        out,
        "Average Energy Reduction: {:.1}%",
        summary.avg_energy_reduction * 100.0
    );
    let _ = writeln!(
        out,
        "Average Length Reduction: {:.1} characters",
        summary.avg_length_reduction
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "SAMPLE OPTIMIZATIONS");
    let _ = writeln!(out, "{rule}");

    for (i, record) in records.iter().take(opts.sample_count).enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. Original:", i + 1);
        let _ = writeln!(out, "   {}...", prefix(&record.original, opts.sample_prefix_chars));
        let _ = writeln!(out, "   Optimized:");
        let _ = writeln!(out, "   {}...", prefix(&record.optimized, opts.sample_prefix_chars));
        let _ = writeln!(out, "   Changes: {}", record.details.changes_applied.join(", "));
        let _ = writeln!(
            out,
            "   Est. Latency: -{:.1}%",
            record.details.estimated_latency_reduction * 100.0
        );
    }

    out
}

// Truncate on a character boundary; byte slicing can split a code point.
fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::PromptOptimizer;

    fn sample_records(count: usize) -> Vec<OptimizationRecord> {
        let optimizer = PromptOptimizer::new(None);
        let prompts: Vec<String> = (0..count)
            .map(|i| format!("Please describe experiment {i} in great detail"))
            .collect();
        optimizer.batch_optimize(&prompts, false)
    }

    #[test]
    fn test_summary_means() {
        let records = sample_records(3);
        let summary = BatchSummary::from_records(&records);

        assert_eq!(summary.total_prompts, 3);
        // Identical prompts modulo the index, so the mean equals each value.
        assert!(
            (summary.avg_latency_reduction
                - records[0].details.estimated_latency_reduction)
                .abs()
                < 1e-9
        );
        assert!(
            (summary.avg_energy_reduction - summary.avg_latency_reduction * 0.85).abs() < 1e-9
        );
    }

    #[test]
    fn test_empty_batch_yields_zeros() {
        let summary = BatchSummary::from_records(&[]);
        assert_eq!(summary.total_prompts, 0);
        assert_eq!(summary.avg_latency_reduction, 0.0);
        assert_eq!(summary.avg_length_reduction, 0.0);

        // Rendering an empty batch must not panic either.
        let report = generate_report(&[]);
        assert!(report.contains("Total Prompts: 0"));
    }

    #[test]
    fn test_report_layout() {
        let records = sample_records(2);
        let report = generate_report(&records);

        assert!(report.contains("PROMPT OPTIMIZATION REPORT"));
        assert!(report.contains("SAMPLE OPTIMIZATIONS"));
        assert!(report.contains("Total Prompts: 2"));
        assert!(report.contains("1. Original:"));
        assert!(report.contains("Changes: remove_politeness, remove_verbose_modifiers"));
    }

    #[test]
    fn test_report_caps_samples() {
        let records = sample_records(7);
        let report = generate_report(&records);

        assert!(report.contains("5. Original:"));
        assert!(!report.contains("6. Original:"));
    }

    #[test]
    fn test_sample_prefix_is_char_bounded() {
        let optimizer = PromptOptimizer::new(None);
        let long = "é".repeat(300);
        let records = optimizer.batch_optimize(&[long], false);

        let report = generate_report_with(
            &records,
            &ReportOptions {
                sample_count: 1,
                sample_prefix_chars: 10,
            },
        );
        assert!(report.contains(&format!("   {}...", "é".repeat(10))));
    }
}
