//! Structured error types for the scoring pipeline.
//!
//! Public operations return `anyhow::Result`; the variants here are the
//! typed payloads callers can downcast to when they need to branch on the
//! failure category. Archive and model failures are fatal and surface to
//! the caller; per-file extraction problems never appear here because they
//! are absorbed where they happen.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocscoreError {
    /// Invalid or unreadable project archive. Fatal.
    #[error("invalid project archive{}: {message}", path_suffix(.path))]
    Archive {
        message: String,
        path: Option<PathBuf>,
    },

    /// Classifier artifact bundle missing or corrupt at load time. Fatal
    /// and never retried: a deployment problem, not a transient one.
    #[error("classifier model unavailable: {0}")]
    ModelUnavailable(String),

    /// Source parsing failure for a single file. Recovered locally by the
    /// pipeline; exposed for callers driving extractors directly.
    #[error("parse failure: {0}")]
    Parse(String),

    /// Configuration file problem.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DocscoreError {
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive {
            message: message.into(),
            path: None,
        }
    }

    pub fn archive_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Archive {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}
