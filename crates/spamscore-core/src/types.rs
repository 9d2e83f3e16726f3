//! Core types for spamscore

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which half of a vectorizer/classifier pair an artifact is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Text vectorizer (vocabulary and weighting)
    Vectorizer,
    /// Probabilistic classifier (model weights)
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vectorizer => f.write_str("vectorizer"),
            Self::Model => f.write_str("model"),
        }
    }
}

/// One sparse row of a feature matrix.
///
/// Column indices are strictly increasing; `values[i]` belongs to
/// `indices[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SparseRowParts", into = "SparseRowParts")]
pub struct SparseRow {
    indices: Vec<usize>,
    values: Vec<f64>,
}

/// Unchecked serialized form of a [`SparseRow`]
#[derive(Serialize, Deserialize)]
struct SparseRowParts {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl TryFrom<SparseRowParts> for SparseRow {
    type Error = Error;

    fn try_from(parts: SparseRowParts) -> Result<Self> {
        Self::new(parts.indices, parts.values)
    }
}

impl From<SparseRow> for SparseRowParts {
    fn from(row: SparseRow) -> Self {
        Self {
            indices: row.indices,
            values: row.values,
        }
    }
}

impl SparseRow {
    /// Create a row from parallel index/value vectors
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(Error::transform(format!(
                "sparse row has {} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::transform(
                "sparse row indices must be strictly increasing",
            ));
        }
        Ok(Self { indices, values })
    }

    /// Create a row from a column-ordered map
    pub fn from_map(entries: &BTreeMap<usize, f64>) -> Self {
        let (indices, values) = entries.iter().map(|(&i, &v)| (i, v)).unzip();
        Self { indices, values }
    }

    /// Create a row from a dense slice, keeping non-zero entries
    pub fn from_dense(dense: &[f64]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self { indices, values }
    }

    /// Column indices of the stored entries
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Values of the stored entries
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// True if the row has no stored entries
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest column index, if any
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Dot product against a dense weight vector.
    ///
    /// Entries beyond the end of `weights` contribute nothing; callers check
    /// widths first.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| weights.get(i).map(|w| w * v))
            .sum()
    }

    /// Expand to a dense vector of the given width
    pub fn to_dense(&self, width: usize) -> Vec<f64> {
        let mut dense = vec![0.0; width];
        for (i, v) in self.iter() {
            if let Some(slot) = dense.get_mut(i) {
                *slot = v;
            }
        }
        dense
    }
}

/// Row-oriented sparse feature matrix with a fixed width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FeatureMatrixParts", into = "FeatureMatrixParts")]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<SparseRow>,
}

#[derive(Serialize, Deserialize)]
struct FeatureMatrixParts {
    n_features: usize,
    rows: Vec<SparseRow>,
}

impl TryFrom<FeatureMatrixParts> for FeatureMatrix {
    type Error = Error;

    fn try_from(parts: FeatureMatrixParts) -> Result<Self> {
        let mut matrix = Self::with_capacity(parts.n_features, parts.rows.len());
        for row in parts.rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }
}

impl From<FeatureMatrix> for FeatureMatrixParts {
    fn from(matrix: FeatureMatrix) -> Self {
        Self {
            n_features: matrix.n_features,
            rows: matrix.rows,
        }
    }
}

impl FeatureMatrix {
    /// Create an empty matrix of the given width
    pub fn new(n_features: usize) -> Self {
        Self {
            n_features,
            rows: Vec::new(),
        }
    }

    /// Create an empty matrix with room for `rows` rows
    pub fn with_capacity(n_features: usize, rows: usize) -> Self {
        Self {
            n_features,
            rows: Vec::with_capacity(rows),
        }
    }

    /// Build a matrix from dense rows, all of the given width
    pub fn from_dense(n_features: usize, rows: &[Vec<f64>]) -> Result<Self> {
        let mut matrix = Self::with_capacity(n_features, rows.len());
        for row in rows {
            if row.len() != n_features {
                return Err(Error::transform(format!(
                    "dense row has {} columns, expected {}",
                    row.len(),
                    n_features
                )));
            }
            matrix.push_row(SparseRow::from_dense(row))?;
        }
        Ok(matrix)
    }

    /// Append a row, rejecting columns outside the matrix width
    pub fn push_row(&mut self, row: SparseRow) -> Result<()> {
        if let Some(max) = row.max_index() {
            if max >= self.n_features {
                return Err(Error::transform(format!(
                    "column {} out of range for {} features",
                    max, self.n_features
                )));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// True if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in input order
    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Row by position
    pub fn row(&self, index: usize) -> Option<&SparseRow> {
        self.rows.get(index)
    }
}
