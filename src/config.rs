use crate::errors::DocscoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Weights blending normalized quality and coverage into the final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for the normalized quality factor (0.0-1.0)
    #[serde(default = "default_quality_weight")]
    pub quality: f64,

    /// Weight for the coverage factor (0.0-1.0)
    #[serde(default = "default_coverage_weight")]
    pub coverage: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            quality: default_quality_weight(),
            coverage: default_coverage_weight(),
        }
    }
}

impl ScoringWeights {
    // Pure function: Check if a weight is in valid range
    fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    /// Validate that weights are in range and sum to 1.0 (with small
    /// tolerance for floating point)
    pub fn validate(&self) -> Result<(), String> {
        for (weight, name) in [(self.quality, "Quality"), (self.coverage, "Coverage")] {
            if !Self::is_valid_weight(weight) {
                return Err(format!("{} weight must be between 0.0 and 1.0", name));
            }
        }

        let sum = self.quality + self.coverage;
        if (sum - 1.0).abs() > 0.001 {
            return Err(format!(
                "Scoring weights (quality, coverage) must sum to 1.0, but sum to {:.3}",
                sum
            ));
        }
        Ok(())
    }
}

fn default_quality_weight() -> f64 {
    0.7
}

fn default_coverage_weight() -> f64 {
    0.3
}

/// Thresholds steering the author-written-file heuristics.
///
/// All of these are tuned policy rather than load-bearing correctness; the
/// defaults match what the heuristics were calibrated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum fraction of non-blank lines that must be comment-like
    #[serde(default = "default_min_comment_density")]
    pub min_comment_density: f64,

    /// Files above this size are rejected outright
    #[serde(default = "default_max_file_size_kb")]
    pub max_file_size_kb: u64,

    /// Detect dense single-line bundled code
    #[serde(default = "default_true")]
    pub enable_minification_detection: bool,

    /// Apply the comment-density heuristic
    #[serde(default = "default_true")]
    pub enable_content_analysis: bool,

    /// Average line length above which a file looks minified
    #[serde(default = "default_max_avg_line_length")]
    pub max_avg_line_length: f64,

    /// A line longer than this counts as a "long line"
    #[serde(default = "default_long_line_chars")]
    pub long_line_chars: usize,

    /// Fraction of long lines above which a file looks minified
    #[serde(default = "default_long_line_ratio")]
    pub long_line_ratio: f64,

    /// Files with fewer non-blank lines than this skip the density check;
    /// density is too noisy at small size
    #[serde(default = "default_density_exempt_lines")]
    pub density_exempt_lines: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_comment_density: default_min_comment_density(),
            max_file_size_kb: default_max_file_size_kb(),
            enable_minification_detection: default_true(),
            enable_content_analysis: default_true(),
            max_avg_line_length: default_max_avg_line_length(),
            long_line_chars: default_long_line_chars(),
            long_line_ratio: default_long_line_ratio(),
            density_exempt_lines: default_density_exempt_lines(),
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_comment_density) {
            return Err("min_comment_density must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.long_line_ratio) {
            return Err("long_line_ratio must be between 0.0 and 1.0".to_string());
        }
        if self.max_file_size_kb == 0 {
            return Err("max_file_size_kb must be positive".to_string());
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb * 1024
    }
}

fn default_min_comment_density() -> f64 {
    0.02
}

fn default_max_file_size_kb() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_max_avg_line_length() -> f64 {
    160.0
}

fn default_long_line_chars() -> usize {
    250
}

fn default_long_line_ratio() -> f64 {
    0.30
}

fn default_density_exempt_lines() -> usize {
    10
}

/// Top-level configuration, optionally loaded from `docscore.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocscoreConfig {
    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub scoring: ScoringWeights,

    /// Directory holding the classifier artifact bundle. Relative paths
    /// resolve against the process working directory. The
    /// `DOCSCORE_MODEL_DIR` environment variable overrides this.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
}

impl DocscoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.filter.validate()?;
        self.scoring.validate()?;
        Ok(())
    }

    /// Resolve the model bundle directory: environment override first, then
    /// the config file, then the `model/` convention.
    pub fn resolved_model_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("DOCSCORE_MODEL_DIR") {
            return PathBuf::from(dir);
        }
        self.model_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("model"))
    }
}

/// Load configuration from `docscore.toml`, searching the given directory
/// and its ancestors. Missing file yields defaults; a malformed file or
/// invalid values are a `Config` error.
pub fn load_config(start_dir: &Path) -> Result<DocscoreConfig, DocscoreError> {
    let Some(path) = find_config_file(start_dir) else {
        return Ok(DocscoreConfig::default());
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| DocscoreError::config(format!("failed to read {}: {e}", path.display())))?;
    let config: DocscoreConfig = toml::from_str(&content)
        .map_err(|e| DocscoreError::config(format!("failed to parse {}: {e}", path.display())))?;
    config.validate().map_err(DocscoreError::config)?;
    Ok(config)
}

fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir;
    loop {
        let candidate = dir.join("docscore.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

static CONFIG: OnceLock<DocscoreConfig> = OnceLock::new();

/// Process-wide configuration, loaded once from the working directory.
/// Falls back to defaults if the file is absent or unreadable.
pub fn get_config() -> &'static DocscoreConfig {
    CONFIG.get_or_init(|| {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        load_config(&cwd).unwrap_or_else(|e| {
            log::warn!("ignoring docscore.toml: {e}");
            DocscoreConfig::default()
        })
    })
}
