//! Draft review: one pass of every analysis a generated draft goes through
//! before it is accepted or sent back with a repair instruction.

use serde::{Deserialize, Serialize};

use greenlight_core::hashing::sha256_hex;
use greenlight_core::nuance::fingerprint::{
    compute_similarity_risk, NarrativeFingerprint, SimilarityRisk,
};
use greenlight_core::nuance::{
    build_instruction, build_style_repair, extract_nuance_metrics, run_gate, GateResult, Lane,
    NuanceMetrics,
};
use greenlight_core::style_deviation::{
    score, validate_style_target, StyleDeviation, StyleTarget, ACCEPTABLE_SCORE,
};
use greenlight_core::text_metrics::{extract, StyleFingerprint};

use crate::config::ReviewConfig;
use crate::error::PipelineResult;

/// Everything learned about one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftReview {
    /// SHA-256 hex of the reviewed text.
    pub content_hash: String,
    pub lane: Lane,
    pub fingerprint: StyleFingerprint,
    pub nuance: NuanceMetrics,
    pub gate: GateResult,
    /// Present only when a style target was supplied.
    pub style: Option<StyleDeviation>,
    /// Directive for the next attempt. Present when the gate failed or the
    /// style drifted beyond low.
    pub repair_instruction: Option<String>,
    /// Gate passed and, when scored, style met [`ACCEPTABLE_SCORE`].
    pub accepted: bool,
}

/// Review a generated draft against the configured lane and an optional
/// style target.
///
/// Fails only when `style_target` carries out-of-range values.
pub fn review_draft(
    text: &str,
    config: &ReviewConfig,
    style_target: Option<&StyleTarget>,
    similarity_risk: f64,
) -> PipelineResult<DraftReview> {
    if let Some(target) = style_target {
        validate_style_target(target)?;
    }

    let fingerprint = extract(text);
    let nuance = extract_nuance_metrics(text);
    tracing::debug!(
        word_count = fingerprint.word_count,
        scene_count = nuance.scene_count,
        dialogue_ratio = fingerprint.dialogue_ratio,
        "Extracted draft metrics",
    );

    let opts = config.gate_options(similarity_risk);
    let gate = run_gate(&nuance, &opts);
    if !gate.pass {
        let codes: Vec<&str> = gate.failures.iter().map(|c| c.as_str()).collect();
        tracing::warn!(
            lane = %config.lane,
            failures = ?codes,
            melodrama_score = gate.melodrama_score,
            "Nuance gate failed",
        );
    }

    let style = style_target.map(|target| score(&fingerprint, target));
    if let Some(deviation) = &style {
        tracing::debug!(
            score = deviation.score,
            drift = deviation.drift_level.as_str(),
            drivers = ?deviation.top_3_drivers,
            "Scored style deviation",
        );
    }

    let style_repair = style.as_ref().and_then(build_style_repair);
    let repair_instruction = if gate.pass && style_repair.is_none() {
        None
    } else {
        let base = build_instruction(
            &gate.failures,
            &opts.caps,
            &config.anti_tropes,
            Some(config.lane),
        );
        Some(match style_repair {
            Some(style_block) => format!("{style_block}\n\n{base}"),
            None => base,
        })
    };

    let style_ok = style
        .as_ref()
        .map_or(true, |deviation| deviation.score >= ACCEPTABLE_SCORE);
    let accepted = gate.pass && style_ok;

    tracing::info!(
        lane = %config.lane,
        accepted,
        gate_pass = gate.pass,
        style_score = style.as_ref().map(|d| d.score),
        "Draft reviewed",
    );

    Ok(DraftReview {
        content_hash: sha256_hex(text.as_bytes()),
        lane: config.lane,
        fingerprint,
        nuance,
        gate,
        style,
        repair_instruction,
        accepted,
    })
}

/// Similarity risk of `candidate` against the configured window of
/// `recent` fingerprints.
pub fn assess_similarity(
    candidate: &NarrativeFingerprint,
    recent: &[NarrativeFingerprint],
    config: &ReviewConfig,
) -> SimilarityRisk {
    let risk = compute_similarity_risk(candidate, recent, config.similarity_window);
    tracing::debug!(
        risk = risk.risk,
        closest_index = ?risk.closest_index,
        window = config.similarity_window,
        history = recent.len(),
        "Assessed template similarity",
    );
    risk
}
