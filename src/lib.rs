// lib.rs - heart-disease risk core: schema -> features -> inference -> decision
pub mod api;
pub mod common;
pub mod decision;
pub mod engine;
pub mod features;
pub mod inference;
pub mod schema;

pub use api::ffi::{heartrisk_engine_close, heartrisk_engine_open, heartrisk_predict};
pub use common::{RiskCode, RiskError, RiskResult};
pub use decision::{decide, PredictionResult};
pub use engine::{Assessment, RiskEngine, Stage};
pub use features::{FeatureRecord, FeatureValue, RawSubmission};
pub use inference::{Classifier, ModelSlot};
pub use schema::FeatureSchema;
