//! Nuance gate: lane-aware pass/fail policy over [`NuanceMetrics`].
//!
//! The gate never errors. Absent conditions simply produce no failures,
//! and `pass` is true exactly when the failure list is empty.

use serde::{Deserialize, Serialize};

use crate::nuance::lane::{Lane, NuanceCaps};
use crate::nuance::metrics::{melodrama_score, NuanceMetrics};
use crate::types::round_to;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Named factions allowed above `faction_cap` before the gate flags
/// overcomplexity.
pub const OVERCOMPLEXITY_MARGIN: u32 = 2;

/// Upper bound of the restraint scale.
pub const MAX_RESTRAINT: u8 = 100;

/// Share of the melodrama threshold removed at maximum restraint.
pub const RESTRAINT_TIGHTENING: f64 = 0.3;

/// Named factions at which the opposition needs a legitimate point of view.
pub const ANTAGONIST_FACTION_MIN: usize = 2;

// ---------------------------------------------------------------------------
// Failure codes
// ---------------------------------------------------------------------------

/// Named gate failures, in the order the gate evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    SubtextMissing,
    QuietBeatsMissing,
    Melodrama,
    TwistOveruse,
    Overcomplexity,
    CostMissing,
    AntagonistFlat,
    TemplateSimilarity,
}

impl FailureCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubtextMissing => "SUBTEXT_MISSING",
            Self::QuietBeatsMissing => "QUIET_BEATS_MISSING",
            Self::Melodrama => "MELODRAMA",
            Self::TwistOveruse => "TWIST_OVERUSE",
            Self::Overcomplexity => "OVERCOMPLEXITY",
            Self::CostMissing => "COST_MISSING",
            Self::AntagonistFlat => "ANTAGONIST_FLAT",
            Self::TemplateSimilarity => "TEMPLATE_SIMILARITY",
        }
    }
}

// ---------------------------------------------------------------------------
// Options and result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOptions {
    pub lane: Lane,
    pub caps: NuanceCaps,
    /// Enables the template-similarity check.
    pub diversify_enabled: bool,
    /// Similarity against recent output, in `[0, 1]`.
    pub similarity_risk: f64,
    /// Restraint level `0..=100`; higher values tighten the melodrama threshold.
    pub restraint: Option<u8>,
}

impl GateOptions {
    /// Options using the lane's own caps, with diversification off.
    pub fn for_lane(lane: Lane) -> Self {
        Self {
            lane,
            caps: lane.caps(),
            diversify_enabled: false,
            similarity_risk: 0.0,
            restraint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub pass: bool,
    pub failures: Vec<FailureCode>,
    pub melodrama_score: f64,
    pub melodrama_threshold: f64,
    pub similarity_threshold: f64,
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Melodrama threshold for `lane`, tightened by `restraint` when given.
pub fn effective_melodrama_threshold(lane: Lane, restraint: Option<u8>) -> f64 {
    let base = lane.melodrama_threshold();
    match restraint {
        None => base,
        Some(level) => {
            let level = f64::from(level.min(MAX_RESTRAINT)) / f64::from(MAX_RESTRAINT);
            round_to(base * (1.0 - RESTRAINT_TIGHTENING * level), 4)
        }
    }
}

/// Evaluate `metrics` against the lane policy in `opts`.
pub fn run_gate(metrics: &NuanceMetrics, opts: &GateOptions) -> GateResult {
    let caps = &opts.caps;
    let melodrama = melodrama_score(metrics);
    let melodrama_threshold = effective_melodrama_threshold(opts.lane, opts.restraint);
    let similarity_threshold = opts.lane.similarity_threshold();

    let mut failures = Vec::new();

    if metrics.subtext_scenes < caps.subtext_scenes_min as usize {
        failures.push(FailureCode::SubtextMissing);
    }
    if metrics.quiet_beats < caps.quiet_beats_min as usize {
        failures.push(FailureCode::QuietBeatsMissing);
    }
    if melodrama > melodrama_threshold {
        failures.push(FailureCode::Melodrama);
    }
    if metrics.twist_rate > caps.twist_cap {
        failures.push(FailureCode::TwistOveruse);
    }
    let faction_limit = caps.faction_cap.saturating_add(OVERCOMPLEXITY_MARGIN) as usize;
    if metrics.named_factions > faction_limit {
        failures.push(FailureCode::Overcomplexity);
    }
    if caps.stakes_escalation && metrics.cost_markers == 0 {
        failures.push(FailureCode::CostMissing);
    }
    if metrics.named_factions >= ANTAGONIST_FACTION_MIN && !metrics.antagonist_legitimacy {
        failures.push(FailureCode::AntagonistFlat);
    }
    if opts.diversify_enabled && opts.similarity_risk > similarity_threshold {
        failures.push(FailureCode::TemplateSimilarity);
    }

    GateResult {
        pass: failures.is_empty(),
        failures,
        melodrama_score: melodrama,
        melodrama_threshold,
        similarity_threshold,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
