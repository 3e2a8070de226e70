//! JSON-serialised logistic pipeline: per-column imputation, standard scaling
//! for numeric columns, one-hot weights for categorical columns, logistic link.
//!
//! Columns are matched by name, so the row may carry extra fields; every
//! column the artefact declares must be present in the row.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::domain::{FeatureRecord, FeatureValue};
use crate::features::service::parse_number;

use super::domain::{Classifier, ClassifierError, ProbaMatrix};

/// One input column of the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnSpec {
    Numeric {
        name: String,
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
        weight: f64,
        /// Imputed for missing cells; the training mean when absent.
        #[serde(default)]
        fill: Option<f64>,
    },
    Categorical {
        name: String,
        /// Weight per known category; unknown categories contribute nothing.
        weights: HashMap<String, f64>,
        #[serde(default)]
        fill: Option<String>,
    },
}

/// Category keys are strings, so a coerced number is matched by value:
/// `2` finds `"2"`, `"2.0"` or `"002"`. Ties go to the smallest key.
fn numeric_category_weight(weights: &HashMap<String, f64>, n: f64) -> Option<f64> {
    if let Some(w) = weights.get(&n.to_string()) {
        return Some(*w);
    }
    weights
        .iter()
        .filter(|(key, _)| parse_number(key) == Some(n))
        .min_by(|a, b| a.0.cmp(b.0))
        .map(|(_, w)| *w)
}

fn unit_scale() -> f64 {
    1.0
}

fn two_columns() -> usize {
    2
}

impl ColumnSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }

    fn contribution(&self, value: &FeatureValue) -> Result<f64, ClassifierError> {
        match self {
            Self::Numeric {
                name,
                mean,
                scale,
                weight,
                fill,
            } => {
                let x = match value {
                    FeatureValue::Number(n) => *n,
                    FeatureValue::Missing => fill.unwrap_or(*mean),
                    FeatureValue::Text(s) => {
                        return Err(ClassifierError::NotNumeric {
                            column: name.clone(),
                            value: s.clone(),
                        })
                    }
                };
                Ok(weight * (x - mean) / scale)
            }
            Self::Categorical { weights, fill, .. } => {
                let weight = match value {
                    FeatureValue::Text(s) => weights.get(s).copied(),
                    FeatureValue::Number(n) => numeric_category_weight(weights, *n),
                    FeatureValue::Missing => fill.as_ref().and_then(|c| weights.get(c).copied()),
                };
                Ok(weight.unwrap_or(0.0))
            }
        }
    }

    fn check(&self) -> Result<(), ModelLoadError> {
        let bad = |what: &str| ModelLoadError::Invalid(format!("column {:?}: {what}", self.name()));
        match self {
            Self::Numeric {
                mean,
                scale,
                weight,
                fill,
                ..
            } => {
                if !mean.is_finite() || !weight.is_finite() || !fill.unwrap_or(0.0).is_finite() {
                    return Err(bad("non-finite parameter"));
                }
                if !scale.is_finite() || *scale == 0.0 {
                    return Err(bad("scale must be finite and non-zero"));
                }
            }
            Self::Categorical { weights, .. } => {
                if weights.values().any(|w| !w.is_finite()) {
                    return Err(bad("non-finite category weight"));
                }
            }
        }
        Ok(())
    }
}

/// Serialised model artefact.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogisticPipeline {
    pub model_id: String,
    #[serde(default)]
    pub model_version: String,
    pub columns: Vec<ColumnSpec>,
    pub bias: f64,
    /// 2 reports `[1 - p, p]`, 1 reports `[p]`.
    #[serde(default = "two_columns")]
    pub output_columns: usize,
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model: {0}")]
    Invalid(String),
}

impl LogisticPipeline {
    /// Validate that the artefact is structurally sound.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.columns.is_empty() {
            return Err(ModelLoadError::Invalid("no input columns".into()));
        }
        if !matches!(self.output_columns, 1 | 2) {
            return Err(ModelLoadError::Invalid(format!(
                "output_columns must be 1 or 2, got {}",
                self.output_columns
            )));
        }
        if !self.bias.is_finite() {
            return Err(ModelLoadError::Invalid(format!("non-finite bias: {}", self.bias)));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(ModelLoadError::Invalid(format!(
                    "duplicate column {:?}",
                    column.name()
                )));
            }
            column.check()?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Names of the columns the artefact reads.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSpec::name)
    }

    fn positive_proba(&self, row: &FeatureRecord) -> Result<f64, ClassifierError> {
        let absent: Vec<String> = self
            .column_names()
            .filter(|name| row.get(name).is_none())
            .map(str::to_string)
            .collect();
        if !absent.is_empty() {
            return Err(ClassifierError::MissingColumns(absent));
        }

        let mut z = self.bias;
        for column in &self.columns {
            let value = row.get(column.name()).unwrap_or(&FeatureValue::Missing);
            z += column.contribution(value)?;
        }
        Ok(sigmoid(z))
    }
}

impl Classifier for LogisticPipeline {
    fn predict_proba(&self, rows: &[FeatureRecord]) -> Result<ProbaMatrix, ClassifierError> {
        let rows = rows
            .iter()
            .map(|row| {
                let p = self.positive_proba(row)?;
                Ok(if self.output_columns == 1 {
                    vec![p]
                } else {
                    vec![1.0 - p, p]
                })
            })
            .collect::<Result<Vec<_>, ClassifierError>>()?;
        Ok(ProbaMatrix::new(rows))
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "model_id": "heart-logreg",
        "model_version": "1.0.0",
        "bias": -1.0,
        "columns": [
            {"type": "numeric", "name": "Age", "mean": 50.0, "scale": 10.0, "weight": 0.5},
            {"type": "categorical", "name": "Smoking",
             "weights": {"Yes": 1.0, "No": 0.0}, "fill": "No"}
        ]
    }"#;

    fn row(age: FeatureValue, smoking: FeatureValue) -> FeatureRecord {
        [("Age", age), ("Smoking", smoking)].into_iter().collect()
    }

    #[test]
    fn sigmoid_properties() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(1000.0).is_finite());
        assert!(sigmoid(-1000.0).is_finite());
        assert!(sigmoid(10.0) > 0.999);
    }

    #[test]
    fn two_column_output() {
        let model = LogisticPipeline::from_json(MODEL).unwrap();
        let out = model
            .predict_proba(&[row(FeatureValue::Number(60.0), FeatureValue::Text("Yes".into()))])
            .unwrap();
        // z = -1 + 0.5 * 1 + 1 = 0.5
        let r = out.row(0).unwrap();
        assert_eq!(r.len(), 2);
        assert!((r[1] - sigmoid(0.5)).abs() < 1e-12);
        assert!((r[0] + r[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_cells_are_imputed() {
        let model = LogisticPipeline::from_json(MODEL).unwrap();
        let out = model
            .predict_proba(&[row(FeatureValue::Missing, FeatureValue::Missing)])
            .unwrap();
        assert!((out.row(0).unwrap()[1] - sigmoid(-1.0)).abs() < 1e-12);
    }

    #[test]
    fn unknown_category_is_ignored() {
        let model = LogisticPipeline::from_json(MODEL).unwrap();
        let smoking = FeatureValue::Text("Sometimes".into());
        let out = model
            .predict_proba(&[row(FeatureValue::Number(50.0), smoking)])
            .unwrap();
        assert!((out.row(0).unwrap()[1] - sigmoid(-1.0)).abs() < 1e-12);
    }

    #[test]
    fn numeric_categories_match_by_value() {
        let model = LogisticPipeline::from_json(
            r#"{"model_id": "m", "bias": 0.0, "columns": [
                {"type": "categorical", "name": "GenHealth", "weights": {"2.0": 3.0, "007": 3.0}}
            ]}"#,
        )
        .unwrap();
        for n in [2.0, 7.0] {
            let cell = FeatureValue::Number(n);
            let record: FeatureRecord = [("GenHealth", cell)].into_iter().collect();
            let p = model.predict_proba(&[record]).unwrap().row(0).unwrap()[1];
            assert!((p - sigmoid(3.0)).abs() < 1e-12, "category {n} scored {p}");
        }

        let exact: HashMap<String, f64> = [("2".to_string(), 1.0), ("2.0".to_string(), 5.0)].into();
        assert_eq!(numeric_category_weight(&exact, 2.0), Some(1.0));
        assert_eq!(numeric_category_weight(&exact, 3.0), None);
    }

    #[test]
    fn single_column_output() {
        let json = MODEL.replace("\"bias\": -1.0,", "\"bias\": -1.0, \"output_columns\": 1,");
        let model = LogisticPipeline::from_json(&json).unwrap();
        let out = model
            .predict_proba(&[row(FeatureValue::Number(50.0), FeatureValue::Missing)])
            .unwrap();
        assert_eq!(out.row(0).unwrap().len(), 1);
    }

    #[test]
    fn rejects_text_in_numeric_column() {
        let model = LogisticPipeline::from_json(MODEL).unwrap();
        let err = model
            .predict_proba(&[row(FeatureValue::Text("old".into()), FeatureValue::Missing)])
            .unwrap_err();
        assert_eq!(
            err,
            ClassifierError::NotNumeric {
                column: "Age".into(),
                value: "old".into()
            }
        );
    }

    #[test]
    fn rejects_missing_columns() {
        let model = LogisticPipeline::from_json(MODEL).unwrap();
        let only_age: FeatureRecord = [("Age", FeatureValue::Number(40.0))].into_iter().collect();
        let err = model.predict_proba(&[only_age]).unwrap_err();
        assert_eq!(err, ClassifierError::MissingColumns(vec!["Smoking".into()]));
    }

    #[test]
    fn validation_catches_bad_artefacts() {
        let zero_scale = MODEL.replace("\"scale\": 10.0", "\"scale\": 0.0");
        assert!(matches!(
            LogisticPipeline::from_json(&zero_scale),
            Err(ModelLoadError::Invalid(_))
        ));
        let dup = MODEL.replace("\"name\": \"Smoking\"", "\"name\": \"Age\"");
        assert!(matches!(
            LogisticPipeline::from_json(&dup),
            Err(ModelLoadError::Invalid(_))
        ));
        let three = MODEL.replace("\"bias\": -1.0,", "\"bias\": -1.0, \"output_columns\": 3,");
        assert!(matches!(
            LogisticPipeline::from_json(&three),
            Err(ModelLoadError::Invalid(_))
        ));
        assert!(matches!(
            LogisticPipeline::from_json("{\"model_id\": 1}"),
            Err(ModelLoadError::Parse(_))
        ));
    }
}
