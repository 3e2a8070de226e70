//! Filesystem reader for the optional metadata document.
//!
//! The document is a JSON object with two recognised keys, `features` and
//! `threshold`. Nothing here fails: every problem is recorded as a
//! `SchemaIssue` and the affected field is left unset.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use super::domain::valid_threshold;

/// Why the metadata document could not be used as-is.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaIssue {
    #[error("metadata document not found")]
    Missing,
    #[error("metadata document unreadable: {0}")]
    Unreadable(String),
    #[error("metadata document is not valid JSON: {0}")]
    Malformed(String),
    #[error("metadata document is not a JSON object")]
    NotAnObject,
    #[error("`features` is absent")]
    FeaturesAbsent,
    #[error("`features` must be a list of strings")]
    FeaturesWrongShape,
    #[error("`features` repeats {0:?}; later occurrences dropped")]
    DuplicateFeature(String),
    #[error("`threshold` is absent")]
    ThresholdAbsent,
    #[error("`threshold` {0} is not a probability")]
    ThresholdInvalid(String),
}

/// Fields recovered from the metadata document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataDoc {
    pub features: Option<Vec<String>>,
    pub threshold: Option<f64>,
    pub issues: Vec<SchemaIssue>,
}

impl MetadataDoc {
    fn degraded(issue: SchemaIssue) -> Self {
        Self {
            issues: vec![issue],
            ..Self::default()
        }
    }
}

/// Read and interpret the document at `path`.
pub fn read_metadata(path: &Path) -> MetadataDoc {
    match fs::read_to_string(path) {
        Ok(text) => parse_metadata(&text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            MetadataDoc::degraded(SchemaIssue::Missing)
        }
        Err(err) => MetadataDoc::degraded(SchemaIssue::Unreadable(err.to_string())),
    }
}

/// Interpret a document already loaded into memory.
pub fn parse_metadata(text: &str) -> MetadataDoc {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => return MetadataDoc::degraded(SchemaIssue::Malformed(err.to_string())),
    };
    let Value::Object(map) = value else {
        return MetadataDoc::degraded(SchemaIssue::NotAnObject);
    };

    let mut doc = MetadataDoc::default();
    doc.features = extract_features(&map, &mut doc.issues);
    doc.threshold = extract_threshold(&map, &mut doc.issues);
    doc
}

fn extract_features(
    map: &Map<String, Value>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<Vec<String>> {
    let raw = match map.get("features") {
        None | Some(Value::Null) => {
            issues.push(SchemaIssue::FeaturesAbsent);
            return None;
        }
        Some(raw) => raw,
    };

    let names = match raw {
        Value::Array(items) => {
            let names: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            match names {
                Some(names) => names,
                None => {
                    issues.push(SchemaIssue::FeaturesWrongShape);
                    return None;
                }
            }
        }
        Value::String(name) => vec![name.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Object(_) | Value::Null => {
            issues.push(SchemaIssue::FeaturesWrongShape);
            return None;
        }
    };

    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if unique.contains(&name) {
            issues.push(SchemaIssue::DuplicateFeature(name));
        } else {
            unique.push(name);
        }
    }
    Some(unique)
}

fn extract_threshold(map: &Map<String, Value>, issues: &mut Vec<SchemaIssue>) -> Option<f64> {
    let raw = match map.get("threshold") {
        None | Some(Value::Null) => {
            issues.push(SchemaIssue::ThresholdAbsent);
            return None;
        }
        Some(raw) => raw,
    };

    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed.and_then(valid_threshold) {
        Some(t) => Some(t),
        None => {
            issues.push(SchemaIssue::ThresholdInvalid(raw.to_string()));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_both_fields() {
        let doc = parse_metadata(r#"{"features": ["Age", "Smoking"], "threshold": 0.3}"#);
        assert_eq!(doc.features, Some(vec!["Age".to_string(), "Smoking".to_string()]));
        assert_eq!(doc.threshold, Some(0.3));
        assert!(doc.issues.is_empty());
    }

    #[test]
    fn scalar_feature_becomes_single_column() {
        let doc = parse_metadata(r#"{"features": "Age"}"#);
        assert_eq!(doc.features, Some(vec!["Age".to_string()]));
        assert_eq!(doc.issues, vec![SchemaIssue::ThresholdAbsent]);
    }

    #[test]
    fn mixed_list_is_rejected() {
        let doc = parse_metadata(r#"{"features": ["Age", 3], "threshold": "0.2"}"#);
        assert_eq!(doc.features, None);
        assert_eq!(doc.threshold, Some(0.2));
        assert_eq!(doc.issues, vec![SchemaIssue::FeaturesWrongShape]);
    }

    #[test]
    fn out_of_range_threshold_is_dropped() {
        let doc = parse_metadata(r#"{"features": [], "threshold": 15}"#);
        assert_eq!(doc.features, Some(vec![]));
        assert_eq!(doc.threshold, None);
        assert_eq!(doc.issues, vec![SchemaIssue::ThresholdInvalid("15".to_string())]);

        let doc = parse_metadata(r#"{"threshold": "high"}"#);
        assert_eq!(doc.threshold, None);
    }

    #[test]
    fn duplicates_are_dropped() {
        let doc = parse_metadata(r#"{"features": ["BMI", "Age", "BMI"], "threshold": 0.5}"#);
        assert_eq!(doc.features, Some(vec!["BMI".to_string(), "Age".to_string()]));
        assert_eq!(doc.issues, vec![SchemaIssue::DuplicateFeature("BMI".to_string())]);
    }

    #[test]
    fn garbage_degrades() {
        assert_eq!(parse_metadata("[1, 2]").issues, vec![SchemaIssue::NotAnObject]);
        let doc = parse_metadata("{not json");
        assert!(matches!(doc.issues.as_slice(), [SchemaIssue::Malformed(_)]));
        assert_eq!(doc.features, None);
        assert_eq!(doc.threshold, None);
    }

    #[test]
    fn missing_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let doc = read_metadata(&dir.path().join("metadata.json"));
        assert_eq!(doc.issues, vec![SchemaIssue::Missing]);
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"features": ["Age"], "threshold": 0.15}}"#).unwrap();
        let doc = read_metadata(file.path());
        assert_eq!(doc.features, Some(vec!["Age".to_string()]));
        assert_eq!(doc.threshold, Some(0.15));
    }
}
