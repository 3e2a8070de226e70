//! Classifier capability contract and the shared model slot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::features::domain::FeatureRecord;

/// Per-class probabilities, one row per input record.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbaMatrix {
    rows: Vec<Vec<f64>>,
}

impl ProbaMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Matrix holding one row.
    pub fn single(row: Vec<f64>) -> Self {
        Self { rows: vec![row] }
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

/// Reasons a classifier refuses a row.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClassifierError {
    #[error("columns are missing: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("could not convert string to float in column {column:?}: {value:?}")]
    NotNumeric { column: String, value: String },
    #[error("{0}")]
    Rejected(String),
}

impl ClassifierError {
    /// Diagnostic safe for logs: names columns, never submitted values.
    pub fn redacted(&self) -> String {
        match self {
            Self::MissingColumns(columns) => format!("columns are missing: {columns:?}"),
            Self::NotNumeric { column, .. } => format!("non-numeric value in column {column:?}"),
            Self::Rejected(_) => "classifier rejected the row".to_string(),
        }
    }
}

/// A loaded, read-only model able to estimate class probabilities.
///
/// Implementations are shared between request threads and must not mutate
/// themselves during inference.
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, rows: &[FeatureRecord]) -> Result<ProbaMatrix, ClassifierError>;

    fn name(&self) -> &str {
        "classifier"
    }
}

/// Process-wide handle to the classifier, decided once at startup.
#[derive(Clone)]
pub enum ModelSlot {
    Ready(Arc<dyn Classifier>),
    Unavailable { expected: PathBuf, reason: String },
}

impl ModelSlot {
    pub fn ready<C: Classifier + 'static>(classifier: C) -> Self {
        Self::Ready(Arc::new(classifier))
    }

    pub fn unavailable(expected: &Path, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            expected: expected.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl std::fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(c) => f.debug_tuple("Ready").field(&c.name()).finish(),
            Self::Unavailable { expected, reason } => f
                .debug_struct("Unavailable")
                .field("expected", expected)
                .field("reason", reason)
                .finish(),
        }
    }
}
