//! Runtime configuration loaded from the process environment.
//!
//! Every value has a default so the core starts without any variables set.
//! Empty or unparsable variables keep the default.

use std::env;
use std::path::PathBuf;

use crate::schema::domain::{CoercionStrategy, SchemaSource, DEFAULT_THRESHOLD};

pub const MODEL_FILENAME: &str = "heart_disease_predictor.json";
pub const META_FILENAME: &str = "metadata.json";

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub model_path: PathBuf,
    pub metadata_path: PathBuf,
    pub schema_source: SchemaSource,
    pub coercion: CoercionStrategy,
    pub default_threshold: f64,
    pub log_level: String,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let schema_source = get("HEARTRISK_SCHEMA_SOURCE")
            .and_then(|v| SchemaSource::parse(&v))
            .unwrap_or(SchemaSource::Builtin);
        let coercion = get("HEARTRISK_COERCION")
            .and_then(|v| CoercionStrategy::parse(&v))
            .unwrap_or_else(|| schema_source.default_strategy());
        let default_threshold = get("HEARTRISK_DEFAULT_THRESHOLD")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|t| (0.0..=1.0).contains(t))
            .unwrap_or(DEFAULT_THRESHOLD);

        Self {
            model_path: get("HEARTRISK_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(MODEL_FILENAME)),
            metadata_path: get("HEARTRISK_METADATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(META_FILENAME)),
            schema_source,
            coercion,
            default_threshold,
            log_level: get("HEARTRISK_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for AppCfg {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
