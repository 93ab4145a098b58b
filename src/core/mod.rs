pub mod types;

pub use types::{
    CommentSample, FilterDecision, FilterReason, PredictionResult, ProjectScoreReport,
    QualityEvaluation, SourceFile,
};

use serde::{Deserialize, Serialize};

/// Languages the extraction pipeline understands.
///
/// TypeScript and the JSX/MJS variants all collapse into `JavaScript`; one
/// extractor serves the whole family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["py", "pyw"], Language::Python),
            (
                &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"],
                Language::JavaScript,
            ),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Language::Unknown)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_from_extension_python() {
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("pyw"), Language::Python);
    }

    #[test]
    fn test_from_extension_javascript_family() {
        for ext in ["js", "jsx", "mjs", "cjs", "ts", "tsx"] {
            assert_eq!(Language::from_extension(ext), Language::JavaScript);
        }
    }

    #[test]
    fn test_from_extension_unknown() {
        assert_eq!(Language::from_extension("rb"), Language::Unknown);
        assert_eq!(Language::from_extension(""), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path(Path::new("src/app.py")), Language::Python);
        assert_eq!(
            Language::from_path(Path::new("src/index.tsx")),
            Language::JavaScript
        );
        assert_eq!(Language::from_path(Path::new("Makefile")), Language::Unknown);
    }
}
