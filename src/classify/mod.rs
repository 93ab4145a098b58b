//! Inference over the pre-trained comment quality model.
//!
//! The classifier is stateless once built: a batch of formatted samples in,
//! one prediction per sample out, order preserved. Process-wide loading
//! happens at most once behind an init guard; a failed load is cached and
//! surfaced on every later call rather than retried, since a missing
//! bundle is a deployment problem.

pub mod model;

pub use model::{BernoulliNb, ModelBundle, ModelMetadata, TfidfVectorizer};

use crate::errors::DocscoreError;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Probabilities this close to zero of summing to one are considered
/// well-formed.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// One classifier verdict: the predicted label plus the full distribution
/// over all declared labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: u32,
    pub probabilities: BTreeMap<u32, f64>,
}

#[derive(Debug)]
pub struct QualityClassifier {
    bundle: ModelBundle,
    /// Per class: sum over features of log P(absent | class).
    absent_total: Vec<f64>,
    /// Per class, per feature: log P(present) - log P(absent), the
    /// adjustment applied for each feature actually present.
    presence_delta: Vec<Vec<f64>>,
}

impl QualityClassifier {
    /// Build a classifier from an already-loaded bundle. Tests use this to
    /// substitute fake models without touching the shared instance.
    pub fn new(bundle: ModelBundle) -> Self {
        let mut absent_total = Vec::with_capacity(bundle.classifier.classes.len());
        let mut presence_delta = Vec::with_capacity(bundle.classifier.classes.len());

        for row in &bundle.classifier.feature_log_prob {
            let absent: Vec<f64> = row.iter().map(|&lp| log_one_minus_exp(lp)).collect();
            absent_total.push(absent.iter().sum());
            presence_delta.push(
                row.iter()
                    .zip(&absent)
                    .map(|(&present, &absent)| present - absent)
                    .collect(),
            );
        }

        Self {
            bundle,
            absent_total,
            presence_delta,
        }
    }

    pub fn load_from(dir: &std::path::Path) -> Result<Self> {
        Ok(Self::new(ModelBundle::load(dir)?))
    }

    /// The process-wide classifier, loaded once from the configured model
    /// directory.
    pub fn shared() -> Result<&'static QualityClassifier> {
        static SHARED: OnceLock<Result<QualityClassifier, String>> = OnceLock::new();

        let cached = SHARED.get_or_init(|| {
            let dir = crate::config::get_config().resolved_model_dir();
            log::info!("loading classifier bundle from {}", dir.display());
            ModelBundle::load(&dir)
                .map(QualityClassifier::new)
                .map_err(|e| match e {
                    DocscoreError::ModelUnavailable(message) => message,
                    other => other.to_string(),
                })
        });

        match cached {
            Ok(classifier) => Ok(classifier),
            Err(message) => Err(DocscoreError::model_unavailable(message.clone()).into()),
        }
    }

    /// Ordered labels the probability distribution is reported under.
    pub fn labels(&self) -> &[u32] {
        &self.bundle.metadata.labels
    }

    /// Highest declared label value; the quality scale's ceiling.
    pub fn max_label(&self) -> u32 {
        self.bundle
            .metadata
            .labels
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Classify a batch of formatted samples, one prediction per input in
    /// the same order. Callers do not pass empty batches; the pipeline
    /// short-circuits on zero samples before reaching this point.
    pub fn classify(&self, texts: &[String]) -> Vec<Prediction> {
        debug_assert!(!texts.is_empty(), "classify called with an empty batch");
        texts.iter().map(|text| self.classify_one(text)).collect()
    }

    fn classify_one(&self, text: &str) -> Prediction {
        let features = self.bundle.vectorizer.transform(text);
        let present: Vec<usize> = features
            .iter()
            .filter(|(_, weight)| *weight > 0.0)
            .map(|&(column, _)| column)
            .collect();

        let jll = self.joint_log_likelihood(&present);
        let probabilities = softmax_from_log(&jll);

        let best = argmax(&jll);
        let label = self.bundle.classifier.classes[best];

        let distribution: BTreeMap<u32, f64> = self
            .bundle
            .metadata
            .labels
            .iter()
            .zip(&probabilities)
            .map(|(&label, &p)| (label, p))
            .collect();

        debug_assert!(
            (distribution.values().sum::<f64>() - 1.0).abs() < PROBABILITY_TOLERANCE,
            "probability distribution does not sum to 1"
        );

        Prediction {
            label,
            probabilities: distribution,
        }
    }

    fn joint_log_likelihood(&self, present: &[usize]) -> Vec<f64> {
        let nb = &self.bundle.classifier;
        (0..nb.classes.len())
            .map(|class| {
                let mut jll = nb.class_log_prior[class] + self.absent_total[class];
                for &column in present {
                    jll += self.presence_delta[class][column];
                }
                jll
            })
            .collect()
    }
}

/// ln(1 - e^lp) for a log-probability lp < 0. Inputs at or above zero are
/// clamped just below certainty so the result stays finite.
fn log_one_minus_exp(lp: f64) -> f64 {
    let p = lp.exp().min(1.0 - 1e-12);
    (1.0 - p).ln()
}

fn softmax_from_log(log_values: &[f64]) -> Vec<f64> {
    let max = log_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = log_values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = index;
        }
    }
    best
}
