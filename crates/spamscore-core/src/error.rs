//! Error types for spamscore

use crate::types::ArtifactKind;
use std::path::PathBuf;

/// Result type alias using spamscore's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for spamscore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Artifact file missing, unreadable, or not a valid artifact document
    #[error("failed to load {kind} artifact from {}: {reason}", .path.display())]
    ArtifactLoad {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    /// Artifact document parsed but failed validation
    #[error("invalid {kind} artifact: {reason}")]
    InvalidArtifact { kind: ArtifactKind, reason: String },

    /// Classifier and vectorizer disagree on the feature width
    #[error("artifact mismatch: classifier expects {expected} features, vectorizer produced {actual}")]
    ArtifactMismatch { expected: usize, actual: usize },

    /// Input could not be vectorized
    #[error("transform error: {0}")]
    Transform(String),

    /// Classifier could not score the features
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new artifact load error
    pub fn artifact_load(
        kind: ArtifactKind,
        path: impl Into<PathBuf>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::ArtifactLoad {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new invalid artifact error
    pub fn invalid_artifact(kind: ArtifactKind, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            kind,
            reason: reason.into(),
        }
    }

    /// Create a new artifact mismatch error
    pub fn mismatch(expected: usize, actual: usize) -> Self {
        Self::ArtifactMismatch { expected, actual }
    }

    /// Create a new transform error
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by a bad or mismatched artifact pair rather
    /// than by a particular input.
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            Self::ArtifactLoad { .. } | Self::InvalidArtifact { .. } | Self::ArtifactMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_load_display() {
        let err = Error::artifact_load(ArtifactKind::Vectorizer, "/tmp/vectorizer.json", "not found");
        assert_eq!(
            err.to_string(),
            "failed to load vectorizer artifact from /tmp/vectorizer.json: not found"
        );
        assert!(err.is_artifact_error());
    }

    #[test]
    fn test_mismatch_display() {
        let err = Error::mismatch(300, 120);
        assert_eq!(
            err.to_string(),
            "artifact mismatch: classifier expects 300 features, vectorizer produced 120"
        );
        assert!(err.is_artifact_error());
    }

    #[test]
    fn test_input_errors_are_not_artifact_errors() {
        assert!(!Error::transform("bad input").is_artifact_error());
        assert!(!Error::prediction("no rows").is_artifact_error());
        assert!(!Error::config("bad threshold").is_artifact_error());
    }
}
