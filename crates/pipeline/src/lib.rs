//! `greenlight-pipeline` -- orchestration around the pure core.
//!
//! Wires environment configuration, structured logging and the core
//! analysis functions into the calls a generation run makes: review a
//! draft, pick between attempts, resolve qualifications before a run.

pub mod attempts;
pub mod config;
pub mod error;
pub mod qualification;
pub mod review;

pub use attempts::choose_attempt;
pub use config::ReviewConfig;
pub use error::{PipelineError, PipelineResult};
pub use qualification::{resolve_for_run, RunQualifications};
pub use review::{assess_similarity, review_draft, DraftReview};
