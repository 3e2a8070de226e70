//! Classifier Adapter: one aligned row in, positive-class probability out.

use tracing::warn;

use crate::common::error::{RiskError, RiskResult};
use crate::features::domain::FeatureRecord;

use super::domain::{ModelSlot, ProbaMatrix};

/// Column conventionally holding the positive class in two-column output.
const POSITIVE_COLUMN: usize = 1;

/// Ask the classifier for the positive-class probability of `record`.
pub fn predict_positive_proba(record: &FeatureRecord, model: &ModelSlot) -> RiskResult<f64> {
    let classifier = match model {
        ModelSlot::Ready(classifier) => classifier,
        ModelSlot::Unavailable { expected, .. } => {
            return Err(RiskError::model_unavailable(expected.display().to_string()));
        }
    };

    let matrix = classifier
        .predict_proba(std::slice::from_ref(record))
        .map_err(|err| {
            warn!(
                ev = "prediction_rejected",
                classifier = classifier.name(),
                detail = %err.redacted()
            );
            RiskError::prediction_failed(err.to_string())
        })?;
    positive_column(&matrix)
}

/// Pick the positive-class probability out of the first row.
///
/// Two or more columns: column 1. Exactly one column: that column is the score.
pub fn positive_column(matrix: &ProbaMatrix) -> RiskResult<f64> {
    let row = matrix
        .row(0)
        .ok_or_else(|| RiskError::prediction_failed("classifier returned no rows"))?;

    let p = match row.len() {
        0 => return Err(RiskError::prediction_failed("classifier returned no columns")),
        1 => row[0],
        _ => row[POSITIVE_COLUMN],
    };

    if p.is_nan() {
        return Err(RiskError::prediction_failed("classifier returned NaN probability"));
    }
    Ok(p)
}
