//! TF-IDF text vectorizer restored from an exported artifact
//!
//! The artifact carries a fitted vocabulary and, optionally, per-column
//! inverse document frequencies. Transform runs tokenization, n-gram
//! expansion, counting, term-frequency scaling, idf weighting, and row
//! normalization, in that order.

use crate::artifact::Vectorizer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use spamscore_core::{ArtifactKind, Error, FeatureMatrix, Result, SparseRow};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Token pattern used when the artifact does not name one: runs of two or
/// more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Scale rows to unit Euclidean length
    #[default]
    L2,
    /// Scale rows so absolute values sum to one
    L1,
    /// Leave rows unscaled
    #[serde(rename = "none")]
    Identity,
}

impl Norm {
    fn apply(self, row: &mut BTreeMap<usize, f64>) {
        let denom = match self {
            Self::L2 => row.values().map(|v| v * v).sum::<f64>().sqrt(),
            Self::L1 => row.values().map(|v| v.abs()).sum::<f64>(),
            Self::Identity => return,
        };
        if denom > 0.0 {
            for value in row.values_mut() {
                *value /= denom;
            }
        }
    }
}

/// Persisted form of a [`TfidfVectorizer`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizerSpec {
    /// Term (or space-joined n-gram) to column index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column; absent for raw counts
    #[serde(default)]
    pub idf: Option<Vec<f64>>,

    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    /// Inclusive `[min, max]` word n-gram lengths
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default)]
    pub stop_words: Vec<String>,

    /// Clip counts to one
    #[serde(default)]
    pub binary: bool,

    /// Replace tf with `1 + ln(tf)`
    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default)]
    pub norm: Norm,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl TfidfVectorizerSpec {
    /// Spec with library defaults for everything but the vocabulary
    pub fn new(vocabulary: HashMap<String, usize>) -> Self {
        Self {
            vocabulary,
            idf: None,
            lowercase: default_lowercase(),
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            binary: false,
            sublinear_tf: false,
            norm: Norm::default(),
        }
    }

    /// Set idf weights
    pub fn with_idf(mut self, idf: Vec<f64>) -> Self {
        self.idf = Some(idf);
        self
    }

    /// Set n-gram range
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
        self.ngram_range = (min, max);
        self
    }

    /// Set normalization
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TfidfVectorizerSpec", into = "TfidfVectorizerSpec")]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    n_features: usize,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
    sublinear_tf: bool,
    norm: Norm,
}

impl TryFrom<TfidfVectorizerSpec> for TfidfVectorizer {
    type Error = Error;

    fn try_from(spec: TfidfVectorizerSpec) -> Result<Self> {
        let invalid = |reason: String| Error::invalid_artifact(ArtifactKind::Vectorizer, reason);

        if spec.vocabulary.is_empty() {
            return Err(invalid("vocabulary is empty".to_string()));
        }

        let max_column = spec.vocabulary.values().copied().max().unwrap_or(0);
        let n_features = match &spec.idf {
            Some(idf) => {
                if let Some(bad) = idf.iter().position(|v| !v.is_finite()) {
                    return Err(invalid(format!("idf[{}] is not finite", bad)));
                }
                if max_column >= idf.len() {
                    return Err(invalid(format!(
                        "vocabulary column {} out of range for {} idf weights",
                        max_column,
                        idf.len()
                    )));
                }
                idf.len()
            }
            None => max_column.checked_add(1).ok_or_else(|| {
                invalid(format!("vocabulary column {} is too large", max_column))
            })?,
        };

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(invalid(format!(
                "invalid ngram_range [{}, {}]",
                min_n, max_n
            )));
        }

        let token_pattern = Regex::new(&spec.token_pattern)
            .map_err(|e| invalid(format!("invalid token_pattern: {}", e)))?;

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            n_features,
            lowercase: spec.lowercase,
            token_pattern,
            ngram_range: spec.ngram_range,
            stop_words: spec.stop_words.into_iter().collect(),
            binary: spec.binary,
            sublinear_tf: spec.sublinear_tf,
            norm: spec.norm,
        })
    }
}

impl From<TfidfVectorizer> for TfidfVectorizerSpec {
    fn from(v: TfidfVectorizer) -> Self {
        let mut stop_words: Vec<String> = v.stop_words.into_iter().collect();
        stop_words.sort();
        Self {
            vocabulary: v.vocabulary,
            idf: v.idf,
            lowercase: v.lowercase,
            token_pattern: v.token_pattern.as_str().to_string(),
            ngram_range: v.ngram_range,
            stop_words,
            binary: v.binary,
            sublinear_tf: v.sublinear_tf,
            norm: v.norm,
        }
    }
}

impl TfidfVectorizer {
    /// Build a vectorizer from its persisted form
    pub fn from_spec(spec: TfidfVectorizerSpec) -> Result<Self> {
        Self::try_from(spec)
    }

    /// Width of every produced row
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of vocabulary terms
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column of a vocabulary term
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Tokens and n-grams for one document, in document order
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text: Cow<'_, str> = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            grams.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        grams
    }

    fn transform_one(&self, text: &str) -> Result<SparseRow> {
        let mut row: BTreeMap<usize, f64> = BTreeMap::new();
        for gram in self.analyze(text) {
            if let Some(&column) = self.vocabulary.get(&gram) {
                *row.entry(column).or_insert(0.0) += 1.0;
            }
        }

        for (&column, value) in row.iter_mut() {
            if self.binary {
                *value = 1.0;
            }
            if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
            if let Some(idf) = &self.idf {
                let weight = idf.get(column).ok_or_else(|| {
                    Error::transform(format!("no idf weight for column {}", column))
                })?;
                *value *= weight;
            }
        }

        self.norm.apply(&mut row);
        Ok(SparseRow::from_map(&row))
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, texts: &[&str]) -> Result<FeatureMatrix> {
        let mut matrix = FeatureMatrix::with_capacity(self.n_features, texts.len());
        for text in texts {
            matrix.push_row(self.transform_one(text)?)?;
        }
        Ok(matrix)
    }
}
