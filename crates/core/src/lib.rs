//! Deterministic narrative analysis and production-qualification resolution.
//!
//! Every function in this crate is pure: no I/O, no shared state, no clock
//! reads. Callers own persistence and retries.

pub mod error;
pub mod hashing;
pub mod nuance;
pub mod qualifications;
pub mod style_deviation;
pub mod text_metrics;
pub mod threshold_validation;
pub mod types;
