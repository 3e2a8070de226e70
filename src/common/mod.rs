//! Shared utilities that glue the different domains together.
pub mod config;
pub mod error;
pub mod log;
pub mod time;

pub use error::{RiskCode, RiskError, RiskResult};
