use crate::core::{CommentSample, Language};
use anyhow::Result;

pub mod javascript;
pub mod python;

pub use javascript::JavaScriptExtractor;
pub use python::PythonExtractor;

/// What one file contributes to the project totals.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub samples: Vec<CommentSample>,
    /// Declared functions and classes found in the file, whether or not
    /// they carry documentation.
    pub declaration_count: usize,
}

pub trait Extractor: Send + Sync {
    /// Extract documentation samples and count declarations in one file.
    /// An error means the file could not be parsed at all; callers treat
    /// that as a skipped file, never a pipeline failure.
    fn extract(&self, content: &str) -> Result<Extraction>;

    fn language(&self) -> Language;
}

/// Tagged dispatch: one extractor per supported language.
pub fn extractor_for(language: Language) -> Option<Box<dyn Extractor>> {
    match language {
        Language::Python => Some(Box::new(PythonExtractor::new())),
        Language::JavaScript => Some(Box::new(JavaScriptExtractor::new())),
        Language::Unknown => None,
    }
}
