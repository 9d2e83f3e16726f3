//! Artifact loading from local files

use crate::model::ClassifierArtifact;
use crate::vectorizer::TfidfVectorizer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spamscore_core::{ArtifactKind, Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Conventional model artifact location
pub const DEFAULT_MODEL_PATH: &str = "email_spam_model.json";

/// Conventional vectorizer artifact location
pub const DEFAULT_VECTORIZER_PATH: &str = "vectorizer.json";

/// Locations of a matched model/vectorizer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Path to the classifier artifact
    pub model: PathBuf,

    /// Path to the vectorizer artifact
    pub vectorizer: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            vectorizer: PathBuf::from(DEFAULT_VECTORIZER_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, vectorizer: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            vectorizer: vectorizer.into(),
        }
    }

    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(DEFAULT_MODEL_PATH),
            vectorizer: dir.join(DEFAULT_VECTORIZER_PATH),
        }
    }

    /// Set model path
    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model = path.into();
        self
    }

    /// Set vectorizer path
    pub fn with_vectorizer(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectorizer = path.into();
        self
    }
}

/// Artifact document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Yaml,
}

impl ArtifactFormat {
    /// `.yaml` / `.yml` are YAML, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Read and deserialize one artifact document.
///
/// The file is read fully and closed before parsing starts.
pub fn load_artifact<T: DeserializeOwned>(kind: ArtifactKind, path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let format = ArtifactFormat::from_path(path);
    debug!("Reading {} artifact {:?} as {:?}", kind, path, format);

    let content =
        std::fs::read_to_string(path).map_err(|e| Error::artifact_load(kind, path, e))?;

    match format {
        ArtifactFormat::Json => {
            serde_json::from_str(&content).map_err(|e| Error::artifact_load(kind, path, e))
        }
        ArtifactFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|e| Error::artifact_load(kind, path, e))
        }
    }
}

/// Load a vectorizer artifact
pub fn load_vectorizer(path: impl AsRef<Path>) -> Result<TfidfVectorizer> {
    let path = path.as_ref();
    let vectorizer: TfidfVectorizer = load_artifact(ArtifactKind::Vectorizer, path)?;
    info!(
        "Loaded vectorizer from {:?}: {} terms, {} features",
        path,
        vectorizer.vocabulary_size(),
        vectorizer.n_features()
    );
    Ok(vectorizer)
}

/// Load a classifier artifact
pub fn load_classifier(path: impl AsRef<Path>) -> Result<ClassifierArtifact> {
    let path = path.as_ref();
    let classifier: ClassifierArtifact = load_artifact(ArtifactKind::Model, path)?;
    info!(
        "Loaded {} model from {:?}: {} features",
        classifier.kind_name(),
        path,
        classifier.n_features()
    );
    Ok(classifier)
}

/// Load both halves of a pair, model first.
///
/// A width disagreement is only warned about here; scoring reports it as
/// an error.
pub fn load_pair(paths: &ArtifactPaths) -> Result<(TfidfVectorizer, ClassifierArtifact)> {
    let classifier = load_classifier(&paths.model)?;
    let vectorizer = load_vectorizer(&paths.vectorizer)?;

    if vectorizer.n_features() != classifier.n_features() {
        warn!(
            "Vectorizer {:?} produces {} features but model {:?} expects {}",
            paths.vectorizer,
            vectorizer.n_features(),
            paths.model,
            classifier.n_features()
        );
    }

    Ok((vectorizer, classifier))
}
