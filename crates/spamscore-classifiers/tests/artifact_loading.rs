//! Loading tests against the artifact pair in `testdata/`

use spamscore_classifiers::{
    ArtifactPaths, Classifier, ProbabilisticClassifier, SpamClassifier, SpamClassifierConfig,
    Vectorizer,
};
use spamscore_core::{ArtifactKind, Error};
use std::path::PathBuf;

const SPAM_EMAIL: &str = "Claim your FREE money, click here winner";
const HAM_EMAIL: &str = "Project meeting tomorrow, report attached";

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

#[test]
fn test_load_logistic_regression_pair() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let clf = SpamClassifier::load(&ArtifactPaths::in_dir(testdata())).unwrap();

    let spam = clf.classify_email(SPAM_EMAIL).unwrap();
    let ham = clf.classify_email(HAM_EMAIL).unwrap();
    assert!(spam > 0.9, "Expected high spam score, got {}", spam);
    assert!(ham < 0.15, "Expected low spam score, got {}", ham);
    assert!(clf.is_likely_spam(spam));
    assert!(!clf.is_likely_spam(ham));
}

#[test]
fn test_load_yaml_naive_bayes_model() {
    let paths = ArtifactPaths::in_dir(testdata())
        .with_model(testdata().join("email_spam_model_nb.yaml"));
    let clf = SpamClassifier::load(&paths).unwrap();

    assert_eq!(clf.classifier().kind_name(), "multinomial_nb");
    assert!(clf.classify_email(SPAM_EMAIL).unwrap() > 0.5);
    assert!(clf.classify_email(HAM_EMAIL).unwrap() < 0.5);
}

#[test]
fn test_loaded_score_equals_direct_pipeline() {
    let clf = SpamClassifier::load(&ArtifactPaths::in_dir(testdata())).unwrap();

    let features = clf.vectorizer().transform(&[SPAM_EMAIL]).unwrap();
    let direct = clf.classifier().predict_probabilities(&features).unwrap()[0][1];
    assert_eq!(clf.classify_email(SPAM_EMAIL).unwrap(), direct);
}

#[test]
fn test_empty_email_with_real_artifacts() {
    let clf = SpamClassifier::load(&ArtifactPaths::in_dir(testdata())).unwrap();

    // no vocabulary hits, so only the intercept contributes
    let score = clf.classify_email("").unwrap();
    let expected = 1.0 / (1.0 + 0.4f64.exp());
    assert!((score - expected).abs() < 1e-12);
}

#[test]
fn test_missing_vectorizer_fails() {
    let paths = ArtifactPaths::in_dir(testdata()).with_vectorizer("/nonexistent/vectorizer.json");

    match SpamClassifier::load(&paths) {
        Err(Error::ArtifactLoad { kind, .. }) => assert_eq!(kind, ArtifactKind::Vectorizer),
        other => panic!("Expected vectorizer ArtifactLoad, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_model_fails() {
    let paths = ArtifactPaths::in_dir(testdata()).with_model("/nonexistent/email_spam_model.json");

    match SpamClassifier::load(&paths) {
        Err(Error::ArtifactLoad { kind, .. }) => assert_eq!(kind, ArtifactKind::Model),
        other => panic!("Expected model ArtifactLoad, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_swapped_paths_fail_to_load() {
    let dir = testdata();
    let paths = ArtifactPaths::new(dir.join("vectorizer.json"), dir.join("email_spam_model.json"));

    let err = SpamClassifier::load(&paths).unwrap_err();
    assert!(err.is_artifact_error());
}

#[test]
fn test_directory_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let err = SpamClassifier::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, Error::ArtifactLoad { kind: ArtifactKind::Model, .. }));
}

#[test]
fn test_mismatched_pair_loads_but_fails_to_score() {
    let dir = tempfile::tempdir().unwrap();
    let vectorizer = dir.path().join("vectorizer.json");
    std::fs::write(&vectorizer, r#"{"vocabulary": {"free": 0, "money": 1}}"#).unwrap();

    let paths = ArtifactPaths::in_dir(testdata()).with_vectorizer(&vectorizer);
    let clf = SpamClassifier::load(&paths).unwrap();

    let err = clf.classify_email(SPAM_EMAIL).unwrap_err();
    assert!(matches!(
        err,
        Error::ArtifactMismatch {
            expected: 9,
            actual: 2
        }
    ));
}

#[test]
fn test_from_config_file() {
    let config = SpamClassifierConfig::from_file(testdata().join("spam_classifier.yaml")).unwrap();
    let clf = SpamClassifier::from_config(&config).unwrap();

    assert_eq!(clf.threshold(), config.spam_threshold);

    let result = clf.classify(SPAM_EMAIL).unwrap();
    assert_eq!(result.label, "spam");
    assert!(result.exceeds_threshold(0.9));

    let result = clf.classify(HAM_EMAIL).unwrap();
    assert_eq!(result.label, "ham");
}
