//! Common type definitions used across the codebase

use crate::core::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A candidate source file discovered in the extracted project tree.
///
/// Discovered by the walker, filtered in or out, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
    pub size_bytes: u64,
}

/// Why a file was rejected by the filter. Diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterReason {
    VendorPath,
    Oversized,
    Minified,
    LowDensity,
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            FilterReason::VendorPath => "vendor-path",
            FilterReason::Oversized => "oversized",
            FilterReason::Minified => "minified",
            FilterReason::LowDensity => "low-density",
        };
        write!(f, "{reason}")
    }
}

/// Per-file rejection record produced by the filter stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecision {
    pub path: PathBuf,
    pub reason: FilterReason,
}

/// One documentation comment paired with the code it describes.
///
/// `documentation_text` is the raw docstring/JSDoc body and is never empty;
/// `associated_code` is the verbatim source of the full definition the
/// documentation attaches to, not just the comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSample {
    pub documentation_text: String,
    pub associated_code: String,
    pub language: Language,
}

/// Classifier verdict for one formatted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub formatted_text: String,
    pub predicted_class: u32,
    /// Probability per declared label, summing to 1.0 within float tolerance.
    pub probabilities: BTreeMap<u32, f64>,
    pub documentation_text: String,
    pub associated_code: String,
}

/// Project-level quality report.
///
/// Rounding is applied only when this struct is built; everything upstream
/// works with unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectScoreReport {
    /// Weighted blend of quality and coverage, in [0, 1].
    pub score: f64,
    /// Mean predicted class over all samples, in [0, max label].
    pub average_quality: f64,
    /// Fraction of discovered functions/classes carrying a sample, in [0, 1].
    pub coverage_ratio: f64,
    pub total_comments: usize,
    pub total_files: usize,
    pub total_functions: usize,
    pub is_recognized_language_project: bool,
}

impl ProjectScoreReport {
    /// Report for a project that produced no samples. A valid low score,
    /// not an error; file and function counts stay accurate.
    pub fn empty(total_files: usize, total_functions: usize, recognized: bool) -> Self {
        Self {
            score: 0.0,
            average_quality: 0.0,
            coverage_ratio: 0.0,
            total_comments: 0,
            total_files,
            total_functions,
            is_recognized_language_project: recognized,
        }
    }
}

/// Full pipeline output: the aggregate report plus per-sample detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEvaluation {
    pub report: ProjectScoreReport,
    pub predictions: Vec<PredictionResult>,
}
