//! Reduction of per-sample predictions into one project-level score.
//!
//! Quality is weighted above raw coverage, but coverage still contributes:
//! a project with superb docstrings on 5% of its functions should not
//! outrank one with decent docstrings everywhere. All ratios clamp to
//! [0, 1] before weighting; rounding happens only when the report is
//! built.

use crate::config::ScoringWeights;
use crate::core::ProjectScoreReport;

/// Combine predicted classes with file/function counts into the final
/// report. Zero samples short-circuit to an all-zero score while keeping
/// the counts accurate.
pub fn aggregate(
    predicted_classes: &[u32],
    max_label: u32,
    total_files: usize,
    total_functions: usize,
    recognized: bool,
    weights: &ScoringWeights,
) -> ProjectScoreReport {
    if predicted_classes.is_empty() {
        return ProjectScoreReport::empty(total_files, total_functions, recognized);
    }

    let sample_count = predicted_classes.len();
    let average_quality =
        predicted_classes.iter().map(|&c| c as f64).sum::<f64>() / sample_count as f64;

    let normalized_quality = if max_label > 0 {
        (average_quality / max_label as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    // Heuristic counting can produce more samples than declarations; the
    // ratio is capped rather than trusted.
    let coverage_ratio = if total_functions > 0 {
        (sample_count as f64 / total_functions as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let score =
        (weights.quality * normalized_quality + weights.coverage * coverage_ratio).clamp(0.0, 1.0);

    ProjectScoreReport {
        score: round_to(score, 4),
        average_quality: round_to(average_quality, 2),
        coverage_ratio: round_to(coverage_ratio, 4),
        total_comments: sample_count,
        total_files,
        total_functions,
        is_recognized_language_project: recognized,
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
