//! Schema domain: which columns the classifier expects and at what threshold
//! its probability becomes a positive decision.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{CoercionStrategy, FeatureSchema, SchemaSource};
pub use repo_fs::SchemaIssue;
