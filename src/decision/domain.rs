//! Decision record returned for a scored submission.
//!
//! The threshold travels with the result so callers can show which
//! operating point produced the call.

use serde::Serialize;

/// Outcome of one successful classifier invocation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Estimated probability of the positive class, in [0, 1].
    pub probability: f64,
    /// `probability >= threshold`.
    pub decision: bool,
    pub threshold: f64,
}

impl PredictionResult {
    /// Decision as the 0/1 label shown to users.
    pub fn label(&self) -> u8 {
        u8::from(self.decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_follows_decision() {
        let positive = PredictionResult {
            probability: 0.15,
            decision: true,
            threshold: 0.15,
        };
        assert_eq!(positive.label(), 1);
        let negative = PredictionResult {
            decision: false,
            ..positive
        };
        assert_eq!(negative.label(), 0);
    }
}
