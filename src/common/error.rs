//! Error handling primitives shared across the core.
//!
//! Coercion problems never show up here: they degrade to missing values and
//! travel as `CoercionWarning`s. Only failures that must reach the caller do.

use thiserror::Error;

/// Stable error codes that cross the FFI boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// The classifier artefact failed to load at startup.
    ModelUnavailable = 1,
    /// The classifier rejected the aligned feature row.
    PredictionFailed = 2,
    /// Caller payload could not be interpreted.
    InvalidInput = 3,
    /// Catch-all for bugs.
    Internal = 4,
}

/// Canonical error type for the core.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RiskError {
    #[error("Model not loaded. Check server logs. Expected file: {expected}")]
    ModelUnavailable { expected: String },
    #[error("Error during prediction: {0}")]
    PredictionFailed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the crate.
pub type RiskResult<T> = Result<T, RiskError>;

impl RiskError {
    /// Model missing helper.
    pub fn model_unavailable(expected: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            expected: expected.into(),
        }
    }

    /// Classifier refusal; `detail` is shown to the user.
    pub fn prediction_failed(detail: impl Into<String>) -> Self {
        Self::PredictionFailed(detail.into())
    }

    /// Validation helper.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Failure inside the core itself, not caused by the caller or the model.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Machine parsable code for this error.
    pub fn code(&self) -> RiskCode {
        match self {
            Self::ModelUnavailable { .. } => RiskCode::ModelUnavailable,
            Self::PredictionFailed(_) => RiskCode::PredictionFailed,
            Self::InvalidInput(_) => RiskCode::InvalidInput,
            Self::Internal(_) => RiskCode::Internal,
        }
    }
}
