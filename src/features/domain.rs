//! Submission and feature record types.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Form fields exactly as received: string keys and values in submission order.
///
/// Inserting a key twice replaces the value and keeps the first position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSubmission {
    fields: Vec<(String, String)>,
}

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Fields in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawSubmission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (k, v) in iter {
            raw.insert(k, v);
        }
        raw
    }
}

impl Serialize for RawSubmission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One typed cell of a feature row.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FeatureValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// A single row aligned to the schema: column order is significant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            columns: Vec::with_capacity(cap),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.columns.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Column names in row order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FeatureValue)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (K, FeatureValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A declared-numeric field whose value could not be parsed and was treated as missing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoercionWarning {
    pub field: String,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not parse numeric field {}. Treating as missing.",
            self.field
        )
    }
}

/// Output of the coercer: the row plus any non-fatal warnings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coerced {
    pub record: FeatureRecord,
    pub warnings: Vec<CoercionWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_keeps_first_position_on_overwrite() {
        let mut raw = RawSubmission::new();
        raw.insert("Smoking", "no");
        raw.insert("Age", "40");
        raw.insert("Smoking", "yes");
        let pairs: Vec<_> = raw.iter().collect();
        assert_eq!(pairs, vec![("Smoking", "yes"), ("Age", "40")]);
        assert_eq!(raw.get("Age"), Some("40"));
        assert_eq!(raw.get("BMI"), None);
    }

    #[test]
    fn submission_serializes_in_order() {
        let raw: RawSubmission = [("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(serde_json::to_string(&raw).unwrap(), r#"{"b":"1","a":"2"}"#);
    }

    #[test]
    fn warning_message() {
        let w = CoercionWarning {
            field: "Age".to_string(),
        };
        assert_eq!(w.to_string(), "Could not parse numeric field Age. Treating as missing.");
    }
}
