//! Configuration for the spam classifier

use crate::loader::{ArtifactPaths, DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH};
use serde::{Deserialize, Serialize};
use spamscore_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Scores at or below this are treated as not likely spam
pub const DEFAULT_SPAM_THRESHOLD: f64 = 0.15;

/// Spam classifier configuration (YAML)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamClassifierConfig {
    /// Classifier artifact location
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Vectorizer artifact location
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: PathBuf,

    /// Probability above which an email is labelled spam
    #[serde(default = "default_spam_threshold")]
    pub spam_threshold: f64,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from(DEFAULT_VECTORIZER_PATH)
}

fn default_spam_threshold() -> f64 {
    DEFAULT_SPAM_THRESHOLD
}

impl Default for SpamClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            vectorizer_path: default_vectorizer_path(),
            spam_threshold: default_spam_threshold(),
        }
    }
}

impl SpamClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("invalid spam classifier config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file.
    ///
    /// Relative artifact paths are resolved against the config file's
    /// directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(base) = path.parent() {
            config.model_path = base.join(&config.model_path);
            config.vectorizer_path = base.join(&config.vectorizer_path);
        }
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.spam_threshold) {
            return Err(Error::config(format!(
                "spam_threshold must be within [0, 1], got {}",
                self.spam_threshold
            )));
        }
        Ok(())
    }

    /// Artifact locations named by this config
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_path, &self.vectorizer_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpamClassifierConfig::from_yaml("{}").unwrap();
        assert_eq!(config, SpamClassifierConfig::default());
        assert_eq!(config.spam_threshold, 0.15);
        assert_eq!(config.artifact_paths(), ArtifactPaths::default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
model_path: models/email_spam_model.yaml
vectorizer_path: models/vectorizer.yaml
spam_threshold: 0.4
"#;
        let config = SpamClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/email_spam_model.yaml"));
        assert_eq!(config.spam_threshold, 0.4);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = SpamClassifierConfig::from_yaml("spam_threshold: 1.5").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spam.yaml");
        std::fs::write(&path, "model_path: model.json\n").unwrap();

        let config = SpamClassifierConfig::from_file(&path).unwrap();
        assert_eq!(config.model_path, dir.path().join("model.json"));
        assert_eq!(config.vectorizer_path, dir.path().join("vectorizer.json"));
    }
}
