//! Serialized classifier artifact: vectorizer state, naive-Bayes state,
//! and label metadata.
//!
//! The bundle is a training-time export; this module only deserializes and
//! validates it. All inference arithmetic lives in [`crate::classify`].

use crate::errors::DocscoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const METADATA_FILE: &str = "meta.json";

/// TF-IDF vectorizer state: token vocabulary and per-column idf weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("vectorizer vocabulary is empty".to_string());
        }
        for (token, &column) in &self.vocabulary {
            if column >= self.idf.len() {
                return Err(format!(
                    "vocabulary entry '{token}' points past idf table (column {column}, {} weights)",
                    self.idf.len()
                ));
            }
        }
        Ok(())
    }

    pub fn feature_count(&self) -> usize {
        self.idf.len()
    }

    /// Map text to a sparse tf-idf vector, L2-normalized, sorted by
    /// column. Tokens outside the vocabulary are dropped.
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weighted {
                *w /= norm;
            }
        }

        weighted.sort_by_key(|&(column, _)| column);
        weighted
    }
}

/// Lowercase word tokens of at least two characters, the tokenization the
/// vectorizer was trained with.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            for lowered in ch.to_lowercase() {
                current.push(lowered);
            }
        } else if !current.is_empty() {
            if current.chars().count() >= 2 {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.chars().count() >= 2 {
        tokens.push(current);
    }

    tokens
}

/// Bernoulli naive-Bayes state over binarized tf-idf features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BernoulliNb {
    /// Class values in training order; prediction returns one of these.
    pub classes: Vec<u32>,
    pub class_log_prior: Vec<f64>,
    /// Per class, per feature: log P(feature present | class).
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl BernoulliNb {
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("classifier declares no classes".to_string());
        }
        if self.class_log_prior.len() != self.classes.len() {
            return Err(format!(
                "class_log_prior has {} entries for {} classes",
                self.class_log_prior.len(),
                self.classes.len()
            ));
        }
        if self.feature_log_prob.len() != self.classes.len() {
            return Err(format!(
                "feature_log_prob has {} rows for {} classes",
                self.feature_log_prob.len(),
                self.classes.len()
            ));
        }
        for (index, row) in self.feature_log_prob.iter().enumerate() {
            if row.len() != feature_count {
                return Err(format!(
                    "feature_log_prob row {index} has {} entries for {feature_count} features",
                    row.len()
                ));
            }
        }
        Ok(())
    }
}

/// Label metadata: the ordered class labels probabilities are reported
/// under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub labels: Vec<u32>,
}

/// The three artifact files, loaded and cross-validated.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub vectorizer: TfidfVectorizer,
    pub classifier: BernoulliNb,
    pub metadata: ModelMetadata,
}

impl ModelBundle {
    /// Load the bundle from a directory. Any missing or malformed file is
    /// a `ModelUnavailable` error; this is a deployment problem the
    /// pipeline must not retry around.
    pub fn load(dir: &Path) -> Result<Self, DocscoreError> {
        let vectorizer: TfidfVectorizer = load_artifact(dir, VECTORIZER_FILE)?;
        let classifier: BernoulliNb = load_artifact(dir, CLASSIFIER_FILE)?;
        let metadata: ModelMetadata = load_artifact(dir, METADATA_FILE)?;

        let bundle = Self {
            vectorizer,
            classifier,
            metadata,
        };
        bundle.validate().map_err(DocscoreError::model_unavailable)?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.feature_count())?;
        if self.metadata.labels.is_empty() {
            return Err("metadata declares no labels".to_string());
        }
        if self.metadata.labels.len() != self.classifier.classes.len() {
            return Err(format!(
                "metadata declares {} labels but classifier has {} classes",
                self.metadata.labels.len(),
                self.classifier.classes.len()
            ));
        }
        Ok(())
    }
}

fn load_artifact<T: serde::de::DeserializeOwned>(
    dir: &Path,
    file: &str,
) -> Result<T, DocscoreError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(DocscoreError::model_unavailable(format!(
            "missing artifact {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(&path).map_err(|e| {
        DocscoreError::model_unavailable(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        DocscoreError::model_unavailable(format!("cannot parse {}: {e}", path.display()))
    })
}
