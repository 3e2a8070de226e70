//! Feature Coercer: raw form fields in, schema-aligned typed row out.
//!
//! Malformed input never aborts a request. Empty values become missing,
//! unparsable declared-numeric values become missing plus a warning.

use tracing::warn;

use crate::schema::domain::{CoercionStrategy, FeatureSchema};

use super::domain::{Coerced, CoercionWarning, FeatureRecord, FeatureValue, RawSubmission};

/// Align `raw` to `schema` and type every value.
pub fn coerce(raw: &RawSubmission, schema: &FeatureSchema) -> Coerced {
    if schema.is_open() {
        return coerce_open(raw);
    }

    let mut out = Coerced {
        record: FeatureRecord::with_capacity(schema.expected_names().len()),
        warnings: Vec::new(),
    };

    for name in schema.expected_names() {
        let value = raw.get(name).unwrap_or("").trim();
        let cell = if value.is_empty() {
            FeatureValue::Missing
        } else {
            match schema.strategy() {
                CoercionStrategy::DeclaredNumeric if schema.is_declared_numeric(name) => {
                    match parse_number(value) {
                        Some(n) => FeatureValue::Number(n),
                        None => {
                            warn!(
                                ev = "coercion_warning",
                                field = %name,
                                "numeric field unparsable"
                            );
                            out.warnings.push(CoercionWarning {
                                field: name.clone(),
                            });
                            FeatureValue::Missing
                        }
                    }
                }
                CoercionStrategy::DeclaredNumeric => FeatureValue::Text(value.to_string()),
                CoercionStrategy::Opportunistic => opportunistic(value),
            }
        };
        out.record.push(name.as_str(), cell);
    }

    out
}

// Without declared names every submitted key becomes a column, in submission
// order, and nothing is known to be numeric.
fn coerce_open(raw: &RawSubmission) -> Coerced {
    let record = raw
        .iter()
        .map(|(key, value)| {
            let value = value.trim();
            let cell = if value.is_empty() {
                FeatureValue::Missing
            } else {
                opportunistic(value)
            };
            (key, cell)
        })
        .collect();

    Coerced {
        record,
        warnings: Vec::new(),
    }
}

fn opportunistic(value: &str) -> FeatureValue {
    match parse_number(value) {
        Some(n) => FeatureValue::Number(n),
        None => FeatureValue::Text(value.to_string()),
    }
}

/// Parse a float literal. NaN and infinities do not count as numbers.
pub fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
