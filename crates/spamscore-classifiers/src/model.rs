//! Linear probabilistic classifiers restored from exported artifacts

use crate::artifact::ProbabilisticClassifier;
use serde::{Deserialize, Serialize};
use spamscore_core::{ArtifactKind, Error, FeatureMatrix, Result, SparseRow};

fn invalid(reason: impl Into<String>) -> Error {
    Error::invalid_artifact(ArtifactKind::Model, reason)
}

/// Common width of `rows`, rejecting ragged or non-finite weights
fn weight_width(name: &str, rows: &[Vec<f64>]) -> Result<usize> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(invalid(format!("{} has no feature weights", name)));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(invalid(format!(
                "{} row {} has {} weights, expected {}",
                name,
                i,
                row.len(),
                width
            )));
        }
        if row.iter().any(|w| !w.is_finite()) {
            return Err(invalid(format!("{} row {} is not finite", name, i)));
        }
    }
    Ok(width)
}

fn check_width(expected: usize, features: &FeatureMatrix) -> Result<()> {
    if features.n_features() != expected {
        return Err(Error::mismatch(expected, features.n_features()));
    }
    Ok(())
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Normalize log-space scores into probabilities
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Persisted form of a [`LogisticRegression`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionSpec {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// Logistic regression.
///
/// With two classes and a single coefficient row the positive column is
/// `sigmoid(w·x + b)`; with one row per class the rows are combined with a
/// softmax.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LogisticRegressionSpec", into = "LogisticRegressionSpec")]
pub struct LogisticRegression {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
}

impl TryFrom<LogisticRegressionSpec> for LogisticRegression {
    type Error = Error;

    fn try_from(spec: LogisticRegressionSpec) -> Result<Self> {
        let n_classes = spec.classes.len();
        if n_classes < 2 {
            return Err(invalid(format!("need at least 2 classes, got {}", n_classes)));
        }
        let binary = n_classes == 2 && spec.coef.len() == 1;
        if !binary && spec.coef.len() != n_classes {
            return Err(invalid(format!(
                "{} coefficient rows for {} classes",
                spec.coef.len(),
                n_classes
            )));
        }
        if spec.intercept.len() != spec.coef.len() {
            return Err(invalid(format!(
                "{} intercepts for {} coefficient rows",
                spec.intercept.len(),
                spec.coef.len()
            )));
        }
        if spec.intercept.iter().any(|b| !b.is_finite()) {
            return Err(invalid("intercept is not finite"));
        }
        let n_features = weight_width("coef", &spec.coef)?;

        Ok(Self {
            classes: spec.classes,
            coef: spec.coef,
            intercept: spec.intercept,
            n_features,
        })
    }
}

impl From<LogisticRegression> for LogisticRegressionSpec {
    fn from(m: LogisticRegression) -> Self {
        Self {
            classes: m.classes,
            coef: m.coef,
            intercept: m.intercept,
        }
    }
}

impl LogisticRegression {
    pub fn from_spec(spec: LogisticRegressionSpec) -> Result<Self> {
        Self::try_from(spec)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &SparseRow) -> Vec<f64> {
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(w, b)| row.dot(w) + b)
            .collect();

        if let [z] = scores.as_slice() {
            let p = sigmoid(*z);
            vec![1.0 - p, p]
        } else {
            softmax(&scores)
        }
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        check_width(self.n_features, features)?;
        Ok(features.rows().iter().map(|row| self.predict_row(row)).collect())
    }

    fn classes(&self) -> Option<&[String]> {
        Some(&self.classes)
    }
}

/// Persisted form of a [`MultinomialNb`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNbSpec {
    pub classes: Vec<String>,
    pub class_log_prior: Vec<f64>,
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Multinomial naive Bayes over term weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MultinomialNbSpec", into = "MultinomialNbSpec")]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl TryFrom<MultinomialNbSpec> for MultinomialNb {
    type Error = Error;

    fn try_from(spec: MultinomialNbSpec) -> Result<Self> {
        let n_classes = spec.classes.len();
        if n_classes < 2 {
            return Err(invalid(format!("need at least 2 classes, got {}", n_classes)));
        }
        if spec.class_log_prior.len() != n_classes || spec.feature_log_prob.len() != n_classes {
            return Err(invalid(format!(
                "{} priors and {} feature rows for {} classes",
                spec.class_log_prior.len(),
                spec.feature_log_prob.len(),
                n_classes
            )));
        }
        if spec.class_log_prior.iter().any(|p| !p.is_finite()) {
            return Err(invalid("class_log_prior is not finite"));
        }
        let n_features = weight_width("feature_log_prob", &spec.feature_log_prob)?;

        Ok(Self {
            classes: spec.classes,
            class_log_prior: spec.class_log_prior,
            feature_log_prob: spec.feature_log_prob,
            n_features,
        })
    }
}

impl From<MultinomialNb> for MultinomialNbSpec {
    fn from(m: MultinomialNb) -> Self {
        Self {
            classes: m.classes,
            class_log_prior: m.class_log_prior,
            feature_log_prob: m.feature_log_prob,
        }
    }
}

impl MultinomialNb {
    pub fn from_spec(spec: MultinomialNbSpec) -> Result<Self> {
        Self::try_from(spec)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &SparseRow) -> Vec<f64> {
        let joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| prior + row.dot(log_prob))
            .collect();
        softmax(&joint)
    }
}

impl ProbabilisticClassifier for MultinomialNb {
    fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        check_width(self.n_features, features)?;
        Ok(features.rows().iter().map(|row| self.predict_row(row)).collect())
    }

    fn classes(&self) -> Option<&[String]> {
        Some(&self.classes)
    }
}

/// Any classifier artifact the loader understands, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    MultinomialNb(MultinomialNb),
}

impl ClassifierArtifact {
    /// Feature width the classifier expects
    pub fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression(m) => m.n_features(),
            Self::MultinomialNb(m) => m.n_features(),
        }
    }

    /// Short name of the model family
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::MultinomialNb(_) => "multinomial_nb",
        }
    }
}

impl ProbabilisticClassifier for ClassifierArtifact {
    fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        match self {
            Self::LogisticRegression(m) => m.predict_probabilities(features),
            Self::MultinomialNb(m) => m.predict_probabilities(features),
        }
    }

    fn classes(&self) -> Option<&[String]> {
        match self {
            Self::LogisticRegression(m) => m.classes(),
            Self::MultinomialNb(m) => m.classes(),
        }
    }
}

impl From<LogisticRegression> for ClassifierArtifact {
    fn from(m: LogisticRegression) -> Self {
        Self::LogisticRegression(m)
    }
}

impl From<MultinomialNb> for ClassifierArtifact {
    fn from(m: MultinomialNb) -> Self {
        Self::MultinomialNb(m)
    }
}
