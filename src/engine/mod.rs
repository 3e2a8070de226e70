//! Engine domain: the per-request state machine over schema, features,
//! inference and decision.

pub mod domain;
pub mod service;

pub use domain::{Assessment, Stage};
pub use service::RiskEngine;
