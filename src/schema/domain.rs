//! Feature schema types: expected column names, declared numeric columns and
//! the decision threshold for one deployment.

use std::collections::HashSet;
use std::fmt;

/// Threshold used when neither the metadata document nor the config supply one.
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// Form fields the heart-disease pipeline was trained on, in column order.
pub const BUILTIN_FEATURES: [&str; 19] = [
    "Age",
    "Gender",
    "Blood Pressure",
    "Cholesterol Level",
    "Exercise Habits",
    "Smoking",
    "Family Heart Disease",
    "Diabetes",
    "BMI",
    "High Blood Pressure",
    "High LDL Cholesterol",
    "Alcohol Consumption",
    "Stress Level",
    "Sleep Hours",
    "Sugar Consumption",
    "Triglyceride Level",
    "Fasting Blood Sugar",
    "CRP Level",
    "Homocysteine Level",
];

/// Subset of `BUILTIN_FEATURES` parsed as floats.
pub const BUILTIN_NUMERIC: [&str; 9] = [
    "Age",
    "Blood Pressure",
    "Cholesterol Level",
    "BMI",
    "Sleep Hours",
    "Triglyceride Level",
    "Fasting Blood Sugar",
    "CRP Level",
    "Homocysteine Level",
];

/// Where the expected feature list comes from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SchemaSource {
    /// Compiled-in field list and numeric set; the document may still set the threshold.
    Builtin,
    /// Field list read from the metadata document, no declared numeric set.
    Metadata,
}

impl SchemaSource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "builtin" | "fixed" => Some(Self::Builtin),
            "metadata" | "document" => Some(Self::Metadata),
            _ => None,
        }
    }

    /// Coercion strategy a deployment gets unless configured otherwise.
    pub fn default_strategy(&self) -> CoercionStrategy {
        match self {
            Self::Builtin => CoercionStrategy::DeclaredNumeric,
            Self::Metadata => CoercionStrategy::Opportunistic,
        }
    }
}

/// How non-empty submitted values are typed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoercionStrategy {
    /// Only names in `numeric_names` are parsed; failures become missing plus a warning.
    DeclaredNumeric,
    /// Every value is parsed when possible and kept as text otherwise.
    Opportunistic,
}

impl CoercionStrategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "declared" | "declared-numeric" | "declared_numeric" => Some(Self::DeclaredNumeric),
            "opportunistic" | "all" => Some(Self::Opportunistic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeclaredNumeric => "declared-numeric",
            Self::Opportunistic => "opportunistic",
        }
    }
}

impl fmt::Display for CoercionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable schema shared by every request.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSchema {
    expected_names: Vec<String>,
    numeric_names: HashSet<String>,
    threshold: f64,
    strategy: CoercionStrategy,
}

impl FeatureSchema {
    /// Build a schema, dropping repeated names and numeric names not in the list.
    ///
    /// `threshold` must already be a probability; anything else falls back to
    /// `DEFAULT_THRESHOLD`.
    pub fn new<I, N, S, T>(
        expected_names: I,
        numeric_names: N,
        threshold: f64,
        strategy: CoercionStrategy,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        N: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut seen = HashSet::new();
        let expected_names: Vec<String> = expected_names
            .into_iter()
            .map(Into::into)
            .filter(|name| seen.insert(name.clone()))
            .collect();
        let numeric_names = numeric_names
            .into_iter()
            .map(Into::into)
            .filter(|name| seen.contains(name))
            .collect();

        Self {
            expected_names,
            numeric_names,
            threshold: valid_threshold(threshold).unwrap_or(DEFAULT_THRESHOLD),
            strategy,
        }
    }

    /// The compiled-in heart-disease schema.
    pub fn builtin(threshold: f64, strategy: CoercionStrategy) -> Self {
        Self::new(BUILTIN_FEATURES, BUILTIN_NUMERIC, threshold, strategy)
    }

    pub fn expected_names(&self) -> &[String] {
        &self.expected_names
    }

    pub fn numeric_names(&self) -> &HashSet<String> {
        &self.numeric_names
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strategy(&self) -> CoercionStrategy {
        self.strategy
    }

    /// True when the schema accepts whatever keys the caller submits.
    pub fn is_open(&self) -> bool {
        self.expected_names.is_empty()
    }

    pub fn is_declared_numeric(&self, name: &str) -> bool {
        self.numeric_names.contains(name)
    }
}

/// `Some(t)` when `t` is a finite value in [0, 1].
pub fn valid_threshold(t: f64) -> Option<f64> {
    (t.is_finite() && (0.0..=1.0).contains(&t)).then_some(t)
}
