use docscore::classify::{BernoulliNb, ModelMetadata, QualityClassifier, TfidfVectorizer};
use docscore::{evaluate_archive_bytes, evaluate_archive_with, DocscoreConfig, DocscoreError};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    buf.into_inner()
}

/// Write a small four-class bundle to disk and load it through the real
/// artifact loader.
fn fake_classifier(dir: &Path) -> QualityClassifier {
    let tokens = [
        "adds", "numbers", "returns", "helper", "value", "loads", "records", "disk", "the",
    ];
    let vectorizer = TfidfVectorizer {
        vocabulary: tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect(),
        idf: vec![1.2; tokens.len()],
    };

    let feature_log_prob: Vec<Vec<f64>> = (0..4)
        .map(|class| {
            (0..tokens.len())
                .map(|column| {
                    // Each class prefers a different slice of the
                    // vocabulary so predictions are not degenerate.
                    if column % 4 == class {
                        0.8f64.ln()
                    } else {
                        0.1f64.ln()
                    }
                })
                .collect()
        })
        .collect();
    let classifier = BernoulliNb {
        classes: vec![0, 1, 2, 3],
        class_log_prior: vec![0.25f64.ln(); 4],
        feature_log_prob,
    };
    let metadata = ModelMetadata {
        labels: vec![0, 1, 2, 3],
    };

    std::fs::write(
        dir.join("vectorizer.json"),
        serde_json::to_string(&vectorizer).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("classifier.json"),
        serde_json::to_string(&classifier).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("meta.json"),
        serde_json::to_string(&metadata).unwrap(),
    )
    .unwrap();

    QualityClassifier::load_from(dir).unwrap()
}

const PYTHON_SOURCE: &str = "\"\"\"Loads records from disk.\"\"\"\n\n\ndef load(path):\n    \"\"\"Read one record file and return its value.\"\"\"\n    with open(path) as f:\n        return f.read()\n\n\ndef unload(path):\n    return None\n";

const JS_SOURCE: &str = "/** Adds two numbers and returns the value */\nfunction add(a, b) { return a + b; }\n\nfunction untouched() { return 0; }\n";

#[test]
fn test_unrecognized_project_scores_zero() {
    let model_dir = tempfile::tempdir().unwrap();
    let classifier = fake_classifier(model_dir.path());

    let bytes = zip_bytes(&[
        ("README.md", "# a project\n"),
        ("data/values.csv", "a,b\n1,2\n"),
    ]);
    let evaluation =
        evaluate_archive_bytes(bytes, &classifier, &DocscoreConfig::default()).unwrap();

    assert_eq!(evaluation.report.score, 0.0);
    assert_eq!(evaluation.report.total_comments, 0);
    assert!(!evaluation.report.is_recognized_language_project);
    assert!(evaluation.predictions.is_empty());
}

#[test]
fn test_mixed_project_end_to_end() {
    let model_dir = tempfile::tempdir().unwrap();
    let classifier = fake_classifier(model_dir.path());

    let bytes = zip_bytes(&[
        ("proj/loader.py", PYTHON_SOURCE),
        ("proj/web/math.js", JS_SOURCE),
        ("proj/README.md", "# docs\n"),
    ]);
    let evaluation =
        evaluate_archive_bytes(bytes, &classifier, &DocscoreConfig::default()).unwrap();
    let report = &evaluation.report;

    assert!(report.is_recognized_language_project);
    // module docstring + load docstring + add JSDoc
    assert_eq!(report.total_comments, 3);
    assert_eq!(evaluation.predictions.len(), 3);
    assert_eq!(report.total_files, 2);
    // load, unload, add, untouched
    assert_eq!(report.total_functions, 4);
    assert!((0.0..=1.0).contains(&report.score));
    assert!((0.0..=1.0).contains(&report.coverage_ratio));

    for prediction in &evaluation.predictions {
        assert!(prediction.predicted_class <= 3);
        let sum: f64 = prediction.probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(!prediction.documentation_text.is_empty());
        assert!(prediction.formatted_text.contains("<CODESPLIT>"));
    }
}

#[test]
fn test_vendored_files_do_not_contribute() {
    let model_dir = tempfile::tempdir().unwrap();
    let classifier = fake_classifier(model_dir.path());

    let bytes = zip_bytes(&[
        ("proj/node_modules/lib/vendored.js", JS_SOURCE),
        ("proj/app.js", JS_SOURCE),
    ]);
    let evaluation =
        evaluate_archive_bytes(bytes, &classifier, &DocscoreConfig::default()).unwrap();

    assert_eq!(evaluation.report.total_files, 1);
    assert_eq!(evaluation.report.total_comments, 1);
    assert_eq!(evaluation.report.total_functions, 2);
}

#[test]
fn test_repeated_runs_are_identical() {
    let model_dir = tempfile::tempdir().unwrap();
    let classifier = fake_classifier(model_dir.path());

    let bytes = zip_bytes(&[
        ("proj/loader.py", PYTHON_SOURCE),
        ("proj/web/math.js", JS_SOURCE),
    ]);

    let archive_dir = tempfile::tempdir().unwrap();
    let archive_path = archive_dir.path().join("project.zip");
    std::fs::write(&archive_path, &bytes).unwrap();

    let first =
        evaluate_archive_with(&archive_path, &classifier, &DocscoreConfig::default()).unwrap();
    let second =
        evaluate_archive_with(&archive_path, &classifier, &DocscoreConfig::default()).unwrap();

    assert_eq!(first.report, second.report);
    assert_eq!(first.predictions, second.predictions);
}

#[test]
fn test_invalid_archive_surfaces_archive_error() {
    let model_dir = tempfile::tempdir().unwrap();
    let classifier = fake_classifier(model_dir.path());

    let err = evaluate_archive_bytes(
        b"not a zip at all".to_vec(),
        &classifier,
        &DocscoreConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DocscoreError>(),
        Some(DocscoreError::Archive { .. })
    ));
}

#[test]
fn test_missing_bundle_is_model_unavailable() {
    let empty = tempfile::tempdir().unwrap();
    let err = QualityClassifier::load_from(&empty.path().join("absent")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DocscoreError>(),
        Some(DocscoreError::ModelUnavailable(_))
    ));
}
