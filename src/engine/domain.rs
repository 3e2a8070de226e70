//! Per-request states and the assessment handed to the presentation layer.

use crate::common::error::{RiskError, RiskResult};
use crate::decision::domain::PredictionResult;
use crate::features::domain::CoercionWarning;

/// Where a request is in the pipeline. The last three are terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Received,
    Coerced,
    ModelUnavailable,
    PredictionFailed,
    Decided,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Coerced => "coerced",
            Stage::ModelUnavailable => "model_unavailable",
            Stage::PredictionFailed => "prediction_failed",
            Stage::Decided => "decided",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Stage::ModelUnavailable | Stage::PredictionFailed | Stage::Decided
        )
    }
}

/// Result of one request: coercion warnings are kept even when prediction fails.
#[derive(Clone, Debug, PartialEq)]
pub struct Assessment {
    pub warnings: Vec<CoercionWarning>,
    pub outcome: RiskResult<PredictionResult>,
}

impl Assessment {
    /// Terminal stage reached by this request.
    pub fn stage(&self) -> Stage {
        match &self.outcome {
            Ok(_) => Stage::Decided,
            Err(RiskError::ModelUnavailable { .. }) => Stage::ModelUnavailable,
            Err(_) => Stage::PredictionFailed,
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.outcome.as_ref().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::service::decide;

    #[test]
    fn stage_follows_outcome() {
        let decided = Assessment {
            warnings: Vec::new(),
            outcome: Ok(decide(0.2, 0.15)),
        };
        assert_eq!(decided.stage(), Stage::Decided);
        assert!(decided.result().unwrap().decision);

        let missing = Assessment {
            warnings: Vec::new(),
            outcome: Err(RiskError::model_unavailable("m.json")),
        };
        assert_eq!(missing.stage(), Stage::ModelUnavailable);
        assert!(missing.result().is_none());

        let failed = Assessment {
            warnings: Vec::new(),
            outcome: Err(RiskError::prediction_failed("shape")),
        };
        assert_eq!(failed.stage(), Stage::PredictionFailed);
    }

    #[test]
    fn only_outcomes_are_terminal() {
        assert!(!Stage::Received.is_terminal());
        assert!(!Stage::Coerced.is_terminal());
        assert!(Stage::ModelUnavailable.is_terminal());
        assert!(Stage::PredictionFailed.is_terminal());
        assert!(Stage::Decided.is_terminal());
        assert_eq!(Stage::Decided.as_str(), "decided");
    }
}
