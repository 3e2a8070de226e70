//! Decision domain: turning a probability into a binary risk call.

pub mod domain;
pub mod service;

pub use domain::PredictionResult;
pub use service::decide;
