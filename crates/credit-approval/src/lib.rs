//! Credit approval backend.
//!
//! Registers customers, derives approved borrowing limits, scores loan history, evaluates
//! eligibility for new loans and records the loans that pass.

pub mod config;
pub mod error;
pub mod ingest;
pub mod lending;
pub mod telemetry;
