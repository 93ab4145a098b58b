//! The end-to-end pipeline: archive in, score report out.
//!
//! Archive and model failures are fatal and surface to the caller.
//! Anything that goes wrong with a single file is absorbed where it
//! happens: the file contributes nothing and the pipeline moves on.

use crate::classify::QualityClassifier;
use crate::config::DocscoreConfig;
use crate::core::{Language, PredictionResult, ProjectScoreReport, QualityEvaluation, SourceFile};
use crate::extractors::{extractor_for, Extraction};
use crate::filters::FileFilter;
use crate::formatting::format_sample;
use crate::io::archive::ProjectArchive;
use crate::io::read_file;
use crate::io::walker::discover_source_files;
use crate::scoring::aggregate;
use anyhow::Result;
use rayon::prelude::*;
use std::path::Path;

/// Evaluate a project archive with the process-wide classifier and
/// configuration.
pub fn evaluate_archive(archive_path: &Path) -> Result<QualityEvaluation> {
    let classifier = QualityClassifier::shared()?;
    evaluate_archive_with(archive_path, classifier, crate::config::get_config())
}

/// Evaluate a project archive with an explicitly supplied classifier and
/// configuration.
pub fn evaluate_archive_with(
    archive_path: &Path,
    classifier: &QualityClassifier,
    config: &DocscoreConfig,
) -> Result<QualityEvaluation> {
    let mut archive = ProjectArchive::open(archive_path)?;
    evaluate_opened(&mut archive, classifier, config)
}

/// Evaluate an archive already held in memory.
pub fn evaluate_archive_bytes(
    bytes: Vec<u8>,
    classifier: &QualityClassifier,
    config: &DocscoreConfig,
) -> Result<QualityEvaluation> {
    let mut archive = ProjectArchive::from_bytes(bytes)?;
    evaluate_opened(&mut archive, classifier, config)
}

fn evaluate_opened(
    archive: &mut ProjectArchive,
    classifier: &QualityClassifier,
    config: &DocscoreConfig,
) -> Result<QualityEvaluation> {
    let recognized = archive
        .entry_names()
        .iter()
        .any(|name| Language::from_path(Path::new(name)).is_supported());

    // The scratch guard stays alive for the whole evaluation and removes
    // the extracted tree on every exit path below.
    let scratch = archive.extract_to_scratch()?;
    let files = discover_source_files(scratch.path())?;
    log::info!("discovered {} candidate files", files.len());

    let filter = FileFilter::new(config.filter.clone());
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|file| process_file(file, &filter))
        .collect();

    let mut samples = Vec::new();
    let mut total_files = 0usize;
    let mut total_functions = 0usize;
    for outcome in outcomes {
        match outcome {
            FileOutcome::Rejected => {}
            FileOutcome::Unreadable => total_files += 1,
            FileOutcome::Extracted(extraction) => {
                total_files += 1;
                total_functions += extraction.declaration_count;
                samples.extend(extraction.samples);
            }
        }
    }
    log::info!(
        "extracted {} samples across {} files ({} declarations)",
        samples.len(),
        total_files,
        total_functions
    );

    if samples.is_empty() {
        return Ok(QualityEvaluation {
            report: ProjectScoreReport::empty(total_files, total_functions, recognized),
            predictions: Vec::new(),
        });
    }

    let formatted: Vec<String> = samples.iter().map(format_sample).collect();
    let predictions = classifier.classify(&formatted);

    let results: Vec<PredictionResult> = samples
        .iter()
        .zip(&formatted)
        .zip(&predictions)
        .map(|((sample, text), prediction)| PredictionResult {
            formatted_text: text.clone(),
            predicted_class: prediction.label,
            probabilities: prediction.probabilities.clone(),
            documentation_text: sample.documentation_text.clone(),
            associated_code: sample.associated_code.clone(),
        })
        .collect();

    let predicted_classes: Vec<u32> = predictions.iter().map(|p| p.label).collect();
    let report = aggregate(
        &predicted_classes,
        classifier.max_label(),
        total_files,
        total_functions,
        recognized,
        &config.scoring,
    );

    Ok(QualityEvaluation {
        report,
        predictions: results,
    })
}

enum FileOutcome {
    /// Excluded by the filter; does not count as a processed file.
    Rejected,
    /// Passed the filter but could not be read or parsed; counted as
    /// processed with zero contribution.
    Unreadable,
    Extracted(Extraction),
}

fn process_file(file: &SourceFile, filter: &FileFilter) -> FileOutcome {
    if filter.check_path(&file.path).is_some() || filter.check_size(file.size_bytes).is_some() {
        return FileOutcome::Rejected;
    }

    let content = match read_file(&file.path) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("skipping unreadable {}: {e}", file.path.display());
            return FileOutcome::Unreadable;
        }
    };

    if let Some(reason) = filter.check_content(file.language, &content) {
        log::debug!("excluded {} ({reason})", file.path.display());
        return FileOutcome::Rejected;
    }

    let Some(extractor) = extractor_for(file.language) else {
        return FileOutcome::Rejected;
    };
    match extractor.extract(&content) {
        Ok(extraction) => FileOutcome::Extracted(extraction),
        Err(e) => {
            log::debug!("skipping unparseable {}: {e}", file.path.display());
            FileOutcome::Unreadable
        }
    }
}
