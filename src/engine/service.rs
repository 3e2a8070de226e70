//! Request pipeline: coerce, classify, decide.
//!
//! The schema and the model slot are fixed at construction and only read
//! afterwards, so one engine can serve concurrent requests behind an `Arc`
//! or by shared reference.

use std::time::Instant;

use tracing::{debug, warn};

use crate::common::config::AppCfg;
use crate::common::time;
use crate::decision::service::decide;
use crate::features::domain::RawSubmission;
use crate::features::service::coerce;
use crate::inference::domain::ModelSlot;
use crate::inference::{repo_fs, service as inference_service};
use crate::schema::domain::FeatureSchema;
use crate::schema::service as schema_service;

use super::domain::{Assessment, Stage};

#[derive(Clone, Debug)]
pub struct RiskEngine {
    schema: FeatureSchema,
    model: ModelSlot,
}

impl RiskEngine {
    /// Build an engine around an already-loaded schema and model.
    pub fn new(schema: FeatureSchema, model: ModelSlot) -> Self {
        Self { schema, model }
    }

    /// Load schema and model from the locations named in `cfg`.
    pub fn from_config(cfg: &AppCfg) -> Self {
        let schema = schema_service::load(cfg);
        let model = repo_fs::load_model(&cfg.model_path);
        Self::new(schema, model)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &ModelSlot {
        &self.model
    }

    /// Run one submission through the pipeline.
    pub fn assess(&self, raw: &RawSubmission) -> Assessment {
        let start = Instant::now();
        let mut stage = Stage::Received;
        debug!(ev = "request", stage = stage.as_str(), fields = raw.len());

        let coerced = coerce(raw, &self.schema);
        stage = Stage::Coerced;
        debug!(
            ev = "request",
            stage = stage.as_str(),
            columns = coerced.record.len(),
            warnings = coerced.warnings.len()
        );

        let outcome = inference_service::predict_positive_proba(&coerced.record, &self.model)
            .map(|p| decide(p, self.schema.threshold()));

        let assessment = Assessment {
            warnings: coerced.warnings,
            outcome,
        };
        stage = assessment.stage();
        match &assessment.outcome {
            Ok(result) => debug!(
                ev = "request",
                stage = stage.as_str(),
                probability = result.probability,
                decision = result.decision,
                dur_ms = time::elapsed_ms(start)
            ),
            Err(err) => {
                let code = err.code() as u32;
                warn!(
                    ev = "request",
                    stage = stage.as_str(),
                    code,
                    dur_ms = time::elapsed_ms(start)
                )
            }
        }
        assessment
    }
}
