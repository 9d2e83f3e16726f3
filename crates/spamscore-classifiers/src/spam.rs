//! Email spam classifier
//!
//! [`SpamClassifier`] owns one vectorizer and one probabilistic classifier,
//! fixed at construction. Scoring wraps the email in a one-element batch,
//! vectorizes it, and reports the positive-class probability of the single
//! output row. Nothing is mutated after construction, so one instance can be
//! shared across threads behind an `Arc`.

use crate::artifact::{ProbabilisticClassifier, Vectorizer};
use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use crate::config::{SpamClassifierConfig, DEFAULT_SPAM_THRESHOLD};
use crate::loader::{self, ArtifactPaths};
use crate::model::ClassifierArtifact;
use crate::vectorizer::TfidfVectorizer;
use spamscore_core::{Error, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Column of the spam class in every probability row
pub const POSITIVE_CLASS_INDEX: usize = 1;

/// Spam scorer over a matched vectorizer/classifier pair
#[derive(Debug, Clone)]
pub struct SpamClassifier<V = TfidfVectorizer, C = ClassifierArtifact> {
    vectorizer: V,
    classifier: C,
    threshold: f64,
}

impl<V: Vectorizer, C: ProbabilisticClassifier> SpamClassifier<V, C> {
    /// Wrap an already-built pair
    pub fn new(vectorizer: V, classifier: C) -> Self {
        Self {
            vectorizer,
            classifier,
            threshold: DEFAULT_SPAM_THRESHOLD,
        }
    }

    /// Set the spam threshold; anything outside `[0, 1]`, NaN included, is
    /// a `Config` error.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::config(format!(
                "spam_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        self.threshold = threshold;
        Ok(self)
    }

    /// Probability in `[0, 1]` that `email` is spam
    pub fn classify_email(&self, email: &str) -> Result<f64> {
        let row = self.probabilities(email)?;
        positive_probability(&row)
    }

    /// Full probability row for `email`, in the classifier's class order
    pub fn probabilities(&self, email: &str) -> Result<Vec<f64>> {
        let features = self.vectorizer.transform(&[email])?;
        if features.n_rows() != 1 {
            return Err(Error::transform(format!(
                "vectorizer returned {} rows for a single email",
                features.n_rows()
            )));
        }

        let row = self
            .classifier
            .predict_probabilities(&features)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::prediction("classifier returned no probability rows"))?;

        if row.len() <= POSITIVE_CLASS_INDEX {
            return Err(Error::prediction(format!(
                "classifier returned {} class probabilities, need at least {}",
                row.len(),
                POSITIVE_CLASS_INDEX + 1
            )));
        }
        if let Some(bad) = row.iter().position(|p| !p.is_finite()) {
            return Err(Error::prediction(format!(
                "probability for class {} is not finite",
                bad
            )));
        }
        Ok(row)
    }

    /// True if `score` is above the spam threshold
    pub fn is_likely_spam(&self, score: f64) -> bool {
        score > self.threshold
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn vectorizer(&self) -> &V {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

fn positive_probability(row: &[f64]) -> Result<f64> {
    row.get(POSITIVE_CLASS_INDEX)
        .map(|p| p.clamp(0.0, 1.0))
        .ok_or_else(|| Error::prediction("missing positive class probability"))
}

impl SpamClassifier {
    /// Load both artifacts; fails without producing a classifier if either
    /// cannot be loaded.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let (vectorizer, classifier) = loader::load_pair(paths)?;
        info!(
            "Spam classifier ready: model {:?}, vectorizer {:?}",
            paths.model, paths.vectorizer
        );
        Ok(Self::new(vectorizer, classifier))
    }

    /// Load from explicit model and vectorizer locations
    pub fn from_paths(model: impl Into<PathBuf>, vectorizer: impl Into<PathBuf>) -> Result<Self> {
        Self::load(&ArtifactPaths::new(model, vectorizer))
    }

    /// Load from the conventional locations in the working directory
    pub fn load_default() -> Result<Self> {
        Self::load(&ArtifactPaths::default())
    }

    /// Load the artifacts and threshold named by `config`
    pub fn from_config(config: &SpamClassifierConfig) -> Result<Self> {
        config.validate()?;
        Self::load(&config.artifact_paths())?.with_threshold(config.spam_threshold)
    }
}

impl<V: Vectorizer, C: ProbabilisticClassifier> Classifier for SpamClassifier<V, C> {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let row = self.probabilities(text)?;
        let score = positive_probability(&row)?;
        let label = if self.is_likely_spam(score) { "spam" } else { "ham" };

        let all_scores: Option<Vec<(String, f32)>> = self.classifier.classes().map(|classes| {
            classes
                .iter()
                .zip(&row)
                .map(|(class, p)| (class.clone(), *p as f32))
                .collect()
        });

        Ok(ClassificationResult {
            label: label.to_string(),
            score: score as f32,
            metadata: ClassificationMetadata {
                all_scores,
                extra: vec![("threshold".to_string(), self.threshold.to_string())],
                ..Default::default()
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        "spam"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogisticRegression, LogisticRegressionSpec};
    use crate::vectorizer::TfidfVectorizerSpec;
    use spamscore_core::FeatureMatrix;
    use std::collections::HashMap;

    fn toy_vectorizer(width: usize) -> TfidfVectorizer {
        let vocabulary: HashMap<String, usize> = [("free", 0), ("meeting", 1)]
            .into_iter()
            .filter(|(_, i)| *i < width)
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        TfidfVectorizer::from_spec(TfidfVectorizerSpec::new(vocabulary).with_idf(vec![1.0; width]))
            .unwrap()
    }

    fn toy_model(coef: Vec<f64>) -> ClassifierArtifact {
        LogisticRegression::from_spec(LogisticRegressionSpec {
            classes: vec!["ham".to_string(), "spam".to_string()],
            coef: vec![coef],
            intercept: vec![0.0],
        })
        .unwrap()
        .into()
    }

    fn toy_pair(coef: Vec<f64>) -> SpamClassifier {
        let width = coef.len();
        SpamClassifier::new(toy_vectorizer(width), toy_model(coef))
    }

    #[test]
    fn test_classify_email_matches_direct_pipeline() {
        let clf = toy_pair(vec![3.0, -3.0]);
        let text = "FREE offer, no meeting needed, free!";

        let features = clf.vectorizer().transform(&[text]).unwrap();
        let direct = clf.classifier().predict_probabilities(&features).unwrap()[0][1];

        assert_eq!(clf.classify_email(text).unwrap(), direct);
    }

    #[test]
    fn test_spam_and_ham_direction() {
        let clf = toy_pair(vec![3.0, -3.0]);
        assert!(clf.classify_email("free free").unwrap() > 0.9);
        assert!(clf.classify_email("meeting").unwrap() < 0.1);
        assert_eq!(clf.classify_email("").unwrap(), 0.5);
    }

    #[test]
    fn test_mismatched_pair_fails_on_first_use() {
        let clf = SpamClassifier::new(toy_vectorizer(1), toy_model(vec![1.0, 1.0, 1.0]));

        let err = clf.classify_email("free").unwrap_err();
        assert!(matches!(
            err,
            Error::ArtifactMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_classifier_trait_labels_with_threshold() {
        let clf = toy_pair(vec![3.0, -3.0]).with_threshold(0.6).unwrap();

        let spam = clf.classify("free").unwrap();
        assert_eq!(spam.label, "spam");
        let scores = spam.metadata.all_scores.unwrap();
        assert_eq!(scores[0].0, "ham");
        assert_eq!(scores[1].0, "spam");

        // exactly 0.5 is below the 0.6 threshold
        let ham = clf.classify("").unwrap();
        assert_eq!(ham.label, "ham");
        assert_eq!(clf.name(), "spam");
    }

    #[test]
    fn test_default_threshold_boundary() {
        let clf = toy_pair(vec![3.0, -3.0]);
        assert_eq!(clf.threshold(), 0.15);
        assert!(!clf.is_likely_spam(0.15));
        assert!(clf.is_likely_spam(0.151));
    }

    #[test]
    fn test_out_of_range_threshold_is_config_error() {
        for bad in [7.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = toy_pair(vec![1.0, 1.0]).with_threshold(bad).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{} accepted", bad);
        }
        assert_eq!(toy_pair(vec![1.0, 1.0]).with_threshold(1.0).unwrap().threshold(), 1.0);
    }

    #[test]
    fn test_label_agrees_with_exceeds_threshold() {
        // the empty email scores exactly 0.5
        let clf = toy_pair(vec![3.0, -3.0]).with_threshold(0.5).unwrap();
        let result = clf.classify("").unwrap();
        assert_eq!(result.score, 0.5);
        assert_eq!(result.label, "ham");
        assert!(!result.exceeds_threshold(0.5));

        for text in ["free free", "meeting", "free meeting"] {
            let result = clf.classify(text).unwrap();
            assert_eq!(result.label == "spam", result.exceeds_threshold(0.5));
        }
    }

    struct SingleClass;

    impl ProbabilisticClassifier for SingleClass {
        fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
            Ok(vec![vec![1.0]; features.n_rows()])
        }
    }

    #[test]
    fn test_too_few_classes_is_prediction_error() {
        let clf = SpamClassifier::new(toy_vectorizer(1), SingleClass);

        assert!(matches!(clf.classify_email("free"), Err(Error::Prediction(_))));
    }

    #[test]
    fn test_load_missing_artifacts() {
        let err = SpamClassifier::from_paths("/nonexistent/model.json", "/nonexistent/vec.json")
            .unwrap_err();
        assert!(err.is_artifact_error());
    }
}
