//! Feature domain: typing and aligning submitted form values.

pub mod domain;
pub mod service;

pub use domain::{Coerced, CoercionWarning, FeatureRecord, FeatureValue, RawSubmission};
