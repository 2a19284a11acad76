//! Anti-repetition fingerprints.
//!
//! A [`NarrativeFingerprint`] names the structural choices behind a story
//! (stakes, engine, causal grammar, conflict mode, setting texture).
//! Comparing a candidate against recent output yields the similarity risk
//! consumed by the nuance gate. Storage of the history belongs to the caller.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::nuance::lane::Lane;
use crate::types::round_to;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

pub const STAKES_WEIGHT: f64 = 0.20;
pub const SETTING_TEXTURE_WEIGHT: f64 = 0.20;
pub const STORY_ENGINE_WEIGHT: f64 = 0.25;
pub const CAUSAL_GRAMMAR_WEIGHT: f64 = 0.15;
pub const CONFLICT_MODE_WEIGHT: f64 = 0.20;

/// Number of most recent fingerprints compared by default.
pub const DEFAULT_SIMILARITY_WINDOW: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeFingerprint {
    pub stakes_type: String,
    #[serde(default)]
    pub setting_texture: Vec<String>,
    pub story_engine: String,
    pub causal_grammar: String,
    pub conflict_mode: String,
    pub lane: Lane,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRisk {
    pub risk: f64,
    /// Index into the history slice of the closest fingerprint.
    pub closest_index: Option<usize>,
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

fn same_id(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

fn texture_jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<String> = a.iter().map(|t| t.trim().to_lowercase()).collect();
    let set_b: HashSet<String> = b.iter().map(|t| t.trim().to_lowercase()).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

/// Weighted structural similarity in `[0, 1]`. Fingerprints from different
/// lanes never count as similar.
pub fn fingerprint_similarity(a: &NarrativeFingerprint, b: &NarrativeFingerprint) -> f64 {
    if a.lane != b.lane {
        return 0.0;
    }
    let flag = |matched: bool, weight: f64| if matched { weight } else { 0.0 };
    let total = flag(same_id(&a.stakes_type, &b.stakes_type), STAKES_WEIGHT)
        + SETTING_TEXTURE_WEIGHT * texture_jaccard(&a.setting_texture, &b.setting_texture)
        + flag(same_id(&a.story_engine, &b.story_engine), STORY_ENGINE_WEIGHT)
        + flag(same_id(&a.causal_grammar, &b.causal_grammar), CAUSAL_GRAMMAR_WEIGHT)
        + flag(same_id(&a.conflict_mode, &b.conflict_mode), CONFLICT_MODE_WEIGHT);
    round_to(total.clamp(0.0, 1.0), 3)
}

/// Highest similarity between `candidate` and the last `window` entries of
/// `recent` (ordered oldest first).
pub fn compute_similarity_risk(
    candidate: &NarrativeFingerprint,
    recent: &[NarrativeFingerprint],
    window: usize,
) -> SimilarityRisk {
    let start = recent.len().saturating_sub(window);
    recent
        .iter()
        .enumerate()
        .skip(start)
        .map(|(i, fp)| (i, fingerprint_similarity(candidate, fp)))
        .fold(
            SimilarityRisk {
                risk: 0.0,
                closest_index: None,
            },
            |best, (i, sim)| {
                if best.closest_index.is_none() || sim > best.risk {
                    SimilarityRisk {
                        risk: sim,
                        closest_index: Some(i),
                    }
                } else {
                    best
                }
            },
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
