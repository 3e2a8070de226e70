//! Loads the classifier artefact from disk exactly once at startup.

use std::path::Path;

use tracing::{error, info};

use super::domain::ModelSlot;
use super::model::LogisticPipeline;

/// Load the artefact at `path`. A missing or corrupt file yields an
/// unavailable slot instead of an error so the process keeps serving.
pub fn load_model(path: &Path) -> ModelSlot {
    if !path.exists() {
        error!(ev = "model_missing", path = %path.display(), "model file not found");
        return ModelSlot::unavailable(path, "model file not found");
    }

    match LogisticPipeline::from_file(path) {
        Ok(model) => {
            info!(
                ev = "model_loaded",
                path = %path.display(),
                model_id = %model.model_id,
                version = %model.model_version,
                columns = model.columns.len(),
                "loaded model"
            );
            ModelSlot::ready(model)
        }
        Err(err) => {
            error!(
                ev = "model_load_failed",
                path = %path.display(),
                error = %err,
                "failed to load model"
            );
            ModelSlot::unavailable(path, err.to_string())
        }
    }
}
