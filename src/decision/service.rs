//! Decision Engine.

use super::domain::PredictionResult;

/// Apply `threshold` to `probability`. Equality counts as positive.
///
/// Out-of-range probabilities are clamped into [0, 1] first.
pub fn decide(probability: f64, threshold: f64) -> PredictionResult {
    let probability = probability.clamp(0.0, 1.0);
    PredictionResult {
        probability,
        decision: probability >= threshold,
        threshold,
    }
}
