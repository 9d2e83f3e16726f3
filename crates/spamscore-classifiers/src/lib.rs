//! spamscore classifiers
//!
//! Scores email text for spam likelihood using a fitted vectorizer and a
//! probabilistic classifier exported from a training environment.
//!
//! The adapter depends only on two narrow traits:
//! - [`Vectorizer`]: raw text to a sparse feature matrix
//! - [`ProbabilisticClassifier`]: feature matrix to per-class probabilities
//!
//! Concrete artifacts ([`TfidfVectorizer`], [`LogisticRegression`],
//! [`MultinomialNb`]) are loaded once from JSON or YAML documents.

pub mod artifact;
pub mod classifier;
pub mod config;
pub mod loader;
pub mod model;
pub mod spam;
pub mod vectorizer;

pub use artifact::{ProbabilisticClassifier, Vectorizer};
pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use config::{SpamClassifierConfig, DEFAULT_SPAM_THRESHOLD};
pub use loader::{
    load_classifier, load_pair, load_vectorizer, ArtifactFormat, ArtifactPaths,
    DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH,
};
pub use model::{ClassifierArtifact, LogisticRegression, MultinomialNb};
pub use spam::{SpamClassifier, POSITIVE_CLASS_INDEX};
pub use vectorizer::{Norm, TfidfVectorizer, TfidfVectorizerSpec};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifact::{ProbabilisticClassifier, Vectorizer};
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::loader::ArtifactPaths;
    pub use crate::spam::SpamClassifier;
    pub use spamscore_core::{Error, FeatureMatrix, Result};
}
