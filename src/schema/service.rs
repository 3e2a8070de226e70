//! Schema Provider: combines compiled-in defaults with the metadata document.

use tracing::{info, warn};

use crate::common::config::AppCfg;

use super::domain::{FeatureSchema, SchemaSource};
use super::repo_fs::{self, MetadataDoc};

/// Load the schema for this process. Never fails; problems with the metadata
/// document are logged and defaults are used instead.
pub fn load(cfg: &AppCfg) -> FeatureSchema {
    let doc = repo_fs::read_metadata(&cfg.metadata_path);
    for issue in &doc.issues {
        warn!(
            ev = "schema_load_degraded",
            path = %cfg.metadata_path.display(),
            %issue,
            "falling back to defaults"
        );
    }

    let schema = from_metadata(cfg, doc);
    info!(
        ev = "schema_loaded",
        source = ?cfg.schema_source,
        features = schema.expected_names().len(),
        numeric = schema.numeric_names().len(),
        threshold = schema.threshold(),
        strategy = %schema.strategy(),
        "feature schema ready"
    );
    schema
}

/// Apply an already-read metadata document on top of the configured defaults.
pub fn from_metadata(cfg: &AppCfg, doc: MetadataDoc) -> FeatureSchema {
    let threshold = doc.threshold.unwrap_or(cfg.default_threshold);
    match cfg.schema_source {
        SchemaSource::Builtin => FeatureSchema::builtin(threshold, cfg.coercion),
        SchemaSource::Metadata => {
            let names = doc.features.unwrap_or_default();
            // no numeric set travels with the document
            let numeric: [&str; 0] = [];
            FeatureSchema::new(names, numeric, threshold, cfg.coercion)
        }
    }
}
