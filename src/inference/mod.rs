//! Inference domain: the classifier capability and the adapter around it.

pub mod domain;
pub mod model;
pub mod repo_fs;
pub mod service;

pub use domain::{Classifier, ClassifierError, ModelSlot, ProbaMatrix};
pub use model::LogisticPipeline;
