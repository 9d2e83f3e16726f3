//! Capability traits for the two halves of a spam model.
//!
//! A [`Vectorizer`] turns raw text into a [`FeatureMatrix`]; a
//! [`ProbabilisticClassifier`] turns that matrix into per-class
//! probabilities. The two must be a matched pair: the classifier expects
//! exactly the width the vectorizer produces. Neither trait can check that
//! on its own, so implementations report a width disagreement from
//! `predict_probabilities` as [`spamscore_core::Error::ArtifactMismatch`].

use spamscore_core::{FeatureMatrix, Result};
use std::sync::Arc;

/// Converts raw text into numeric feature rows, one row per input
pub trait Vectorizer: Send + Sync {
    /// Transform `texts` into a matrix with `texts.len()` rows, in order
    fn transform(&self, texts: &[&str]) -> Result<FeatureMatrix>;
}

/// Produces class probability estimates from feature rows
pub trait ProbabilisticClassifier: Send + Sync {
    /// One probability row per feature row, one column per class
    fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>>;

    /// Class labels in output column order, when the artifact records them
    fn classes(&self) -> Option<&[String]> {
        None
    }
}

impl<T: Vectorizer + ?Sized> Vectorizer for Arc<T> {
    fn transform(&self, texts: &[&str]) -> Result<FeatureMatrix> {
        (**self).transform(texts)
    }
}

impl<T: Vectorizer + ?Sized> Vectorizer for Box<T> {
    fn transform(&self, texts: &[&str]) -> Result<FeatureMatrix> {
        (**self).transform(texts)
    }
}

impl<T: ProbabilisticClassifier + ?Sized> ProbabilisticClassifier for Arc<T> {
    fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        (**self).predict_probabilities(features)
    }

    fn classes(&self) -> Option<&[String]> {
        (**self).classes()
    }
}

impl<T: ProbabilisticClassifier + ?Sized> ProbabilisticClassifier for Box<T> {
    fn predict_probabilities(&self, features: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        (**self).predict_probabilities(features)
    }

    fn classes(&self) -> Option<&[String]> {
        (**self).classes()
    }
}
