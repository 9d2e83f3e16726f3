//! spamscore core
//!
//! Types shared across spamscore components.
//!
//! This crate provides:
//! - The error type and result alias used by every loader and classifier
//! - The sparse feature matrix passed from a vectorizer to a classifier
//! - Artifact identifiers used in load diagnostics

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ArtifactKind, FeatureMatrix, SparseRow};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ArtifactKind, FeatureMatrix, SparseRow};
}
