//! Heuristics deciding which files are plausibly author-written source.
//!
//! There is no ground truth here; every check is best-effort and false
//! positives in either direction are acceptable. Checks run in a fixed
//! short-circuit order: vendor path, size, minification, comment density.

use crate::config::FilterConfig;
use crate::core::{FilterDecision, FilterReason, Language, SourceFile};

/// Directory names whose contents are vendored, generated, or cached
/// rather than author-written.
const VENDOR_DIR_NAMES: &[&str] = &[
    "node_modules",
    "bower_components",
    "jspm_packages",
    "vendor",
    "vendors",
    "third_party",
    "external",
    "venv",
    ".venv",
    "env",
    "site-packages",
    "dist-packages",
    "__pycache__",
    ".tox",
    ".eggs",
    "dist",
    "build",
    "out",
    "target",
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    ".cache",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".next",
    ".nuxt",
    "coverage",
    "htmlcov",
];

pub struct FileFilter {
    config: FilterConfig,
}

impl FileFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn from_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Full verdict for one file. `None` means the file is worth
    /// evaluating.
    pub fn decide(&self, file: &SourceFile, content: &str) -> Option<FilterReason> {
        self.check_path(&file.path)
            .or_else(|| self.check_size(file.size_bytes))
            .or_else(|| self.check_content(file.language, content))
    }

    /// Path heuristic: any vendor/build/cache directory segment rejects the
    /// file regardless of content.
    pub fn check_path(&self, path: &std::path::Path) -> Option<FilterReason> {
        let has_vendor_segment = path
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .any(is_vendor_segment);
        has_vendor_segment.then_some(FilterReason::VendorPath)
    }

    pub fn check_size(&self, size_bytes: u64) -> Option<FilterReason> {
        (size_bytes > self.config.max_file_size_bytes()).then_some(FilterReason::Oversized)
    }

    /// Content heuristics: minification first, then comment density, each
    /// behind its own toggle.
    pub fn check_content(&self, language: Language, content: &str) -> Option<FilterReason> {
        if self.config.enable_minification_detection && self.looks_minified(content) {
            return Some(FilterReason::Minified);
        }
        if self.config.enable_content_analysis && self.below_density_floor(language, content) {
            return Some(FilterReason::LowDensity);
        }
        None
    }

    /// Partition files into accepted and rejected, reading each file to run
    /// the content checks. Unreadable files pass through to extraction,
    /// which handles read failures itself.
    pub fn filter_files(&self, files: Vec<SourceFile>) -> (Vec<SourceFile>, Vec<FilterDecision>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for file in files {
            let content = crate::io::read_file(&file.path).unwrap_or_default();
            match self.decide(&file, &content) {
                Some(reason) => {
                    log::debug!("excluded {} ({reason})", file.path.display());
                    rejected.push(FilterDecision {
                        path: file.path.clone(),
                        reason,
                    });
                }
                None => accepted.push(file),
            }
        }

        (accepted, rejected)
    }

    fn looks_minified(&self, content: &str) -> bool {
        let mut line_count = 0usize;
        let mut total_len = 0usize;
        let mut long_lines = 0usize;

        for line in content.lines() {
            line_count += 1;
            total_len += line.len();
            if line.len() > self.config.long_line_chars {
                long_lines += 1;
            }
        }

        if line_count == 0 {
            return false;
        }

        let avg_len = total_len as f64 / line_count as f64;
        let long_ratio = long_lines as f64 / line_count as f64;
        avg_len > self.config.max_avg_line_length || long_ratio > self.config.long_line_ratio
    }

    fn below_density_floor(&self, language: Language, content: &str) -> bool {
        let non_blank: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if non_blank.len() < self.config.density_exempt_lines {
            return false;
        }

        let comment_lines = non_blank
            .iter()
            .filter(|l| is_comment_line(language, l))
            .count();
        let density = comment_lines as f64 / non_blank.len() as f64;
        density < self.config.min_comment_density
    }
}

fn is_vendor_segment(segment: &str) -> bool {
    VENDOR_DIR_NAMES.contains(&segment) || segment.ends_with(".egg-info")
}

fn is_comment_line(language: Language, trimmed: &str) -> bool {
    match language {
        Language::Python => {
            trimmed.starts_with('#') || trimmed.contains("\"\"\"") || trimmed.contains("'''")
        }
        Language::JavaScript => {
            trimmed.starts_with("//")
                || trimmed.starts_with("/*")
                || trimmed.starts_with('*')
        }
        Language::Unknown => false,
    }
}
