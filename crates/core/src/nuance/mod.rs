//! Narrative nuance policy: metric extraction, lane-aware gating, repair
//! directives and anti-repetition fingerprints.

pub mod fingerprint;
pub mod gate;
pub mod lane;
pub mod metrics;
pub mod repair;

pub use gate::{run_gate, FailureCode, GateOptions, GateResult};
pub use lane::{Lane, NuanceCaps};
pub use metrics::{extract_nuance_metrics, melodrama_score, NuanceMetrics};
pub use repair::{build_instruction, build_style_repair};
