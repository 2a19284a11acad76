//! Style deviation scoring against a target voice profile.
//!
//! Compares a [`StyleFingerprint`] with a caller-supplied [`StyleTarget`]
//! and produces a bounded fidelity score, a drift bucket and the three
//! dimensions that contributed most to the drift. Also hosts the
//! attempt-selection policy that consumes those scores.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::text_metrics::{DescriptionDensity, StyleFingerprint};
use crate::threshold_validation::{validate_band, validate_unit_range};
use crate::types::round_to;

// ---------------------------------------------------------------------------
// Penalty weights
// ---------------------------------------------------------------------------

/// Maximum penalty for dialogue-ratio distance.
pub const DIALOGUE_WEIGHT: f64 = 0.25;
/// Dialogue-ratio distance at which the full penalty applies.
pub const DIALOGUE_NORMALIZER: f64 = 0.25;
/// Maximum penalty for sentence length outside the target band.
pub const SENTENCE_BAND_WEIGHT: f64 = 0.20;
/// Words outside the band at which the full penalty applies.
pub const SENTENCE_BAND_NORMALIZER: f64 = 10.0;
pub const DENSITY_WEIGHT: f64 = 0.12;
pub const PACE_WEIGHT: f64 = 0.12;
pub const HUMOR_WEIGHT: f64 = 0.08;
pub const SUBTEXT_WEIGHT: f64 = 0.08;

// ---------------------------------------------------------------------------
// Drift and acceptance thresholds
// ---------------------------------------------------------------------------

/// Scores at or above this are low drift.
pub const LOW_DRIFT_MIN_SCORE: f64 = 0.80;
/// Scores at or above this (and below low drift) are medium drift.
pub const MEDIUM_DRIFT_MIN_SCORE: f64 = 0.60;
/// Minimum score for a generated attempt to be considered acceptable.
pub const ACCEPTABLE_SCORE: f64 = 0.60;

/// Number of driver strings reported.
pub const MAX_DRIVERS: usize = 3;

// ---------------------------------------------------------------------------
// Categorical labels
// ---------------------------------------------------------------------------

/// Where the target voice profile came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceSource {
    TeamVoice,
    WritingVoice,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Fast,
    Medium,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumorLevel {
    None,
    Light,
    Witty,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtextLevel {
    Low,
    Medium,
    High,
}

impl Pace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }
}

impl HumorLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Light => "light",
            Self::Witty => "witty",
            Self::High => "high",
        }
    }
}

impl SubtextLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

// ---------------------------------------------------------------------------
// Inference tables
// ---------------------------------------------------------------------------

/// Pace by average sentence length: `(exclusive upper bound, label)`.
pub const PACE_THRESHOLDS: &[(f64, Pace)] = &[(10.0, Pace::Fast), (16.0, Pace::Medium)];
pub const PACE_FALLBACK: Pace = Pace::Slow;

/// Humor by humor markers per 1k words.
pub const HUMOR_THRESHOLDS: &[(f64, HumorLevel)] = &[
    (0.5, HumorLevel::None),
    (2.0, HumorLevel::Light),
    (5.0, HumorLevel::Witty),
];
pub const HUMOR_FALLBACK: HumorLevel = HumorLevel::High;

/// Subtext by subtext markers per 1k words.
pub const SUBTEXT_THRESHOLDS: &[(f64, SubtextLevel)] =
    &[(1.0, SubtextLevel::Low), (3.0, SubtextLevel::Medium)];
pub const SUBTEXT_FALLBACK: SubtextLevel = SubtextLevel::High;

/// Return the label of the first band whose upper bound exceeds `value`.
pub fn classify_by_table<T: Copy>(value: f64, table: &[(f64, T)], fallback: T) -> T {
    table
        .iter()
        .find(|(upper, _)| value < *upper)
        .map(|(_, label)| *label)
        .unwrap_or(fallback)
}

pub fn infer_pace(fp: &StyleFingerprint) -> Pace {
    classify_by_table(fp.avg_sentence_length, PACE_THRESHOLDS, PACE_FALLBACK)
}

pub fn infer_humor(fp: &StyleFingerprint) -> HumorLevel {
    classify_by_table(fp.humor_per_1k, HUMOR_THRESHOLDS, HUMOR_FALLBACK)
}

pub fn infer_subtext(fp: &StyleFingerprint) -> SubtextLevel {
    classify_by_table(fp.subtext_per_1k, SUBTEXT_THRESHOLDS, SUBTEXT_FALLBACK)
}

// ---------------------------------------------------------------------------
// Target and result types
// ---------------------------------------------------------------------------

/// Target voice profile. Every dimension is optional; absent dimensions are
/// not scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTarget {
    pub dialogue_ratio: Option<f64>,
    /// Inclusive `[lo, hi]` band for average sentence length in words.
    pub sentence_length_band: Option<(f64, f64)>,
    pub description_density: Option<DescriptionDensity>,
    pub pace: Option<Pace>,
    pub humor: Option<HumorLevel>,
    pub subtext: Option<SubtextLevel>,
    pub voice_source: VoiceSource,
}

/// Validate numeric target fields.
pub fn validate_style_target(target: &StyleTarget) -> Result<(), CoreError> {
    if let Some(ratio) = target.dialogue_ratio {
        validate_unit_range(ratio, "dialogue_ratio")?;
    }
    if let Some((lo, hi)) = target.sentence_length_band {
        validate_band(lo, hi, "sentence_length_band")?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleDimension {
    DialogueRatio,
    SentenceLength,
    DescriptionDensity,
    Pace,
    Humor,
    Subtext,
}

impl StyleDimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DialogueRatio => "dialogue_ratio",
            Self::SentenceLength => "sentence_length",
            Self::DescriptionDensity => "description_density",
            Self::Pace => "pace",
            Self::Humor => "humor",
            Self::Subtext => "subtext",
        }
    }
}

/// One scored dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDelta {
    pub dimension: StyleDimension,
    pub target: String,
    pub actual: String,
    pub penalty: f64,
}

impl StyleDelta {
    /// Human-readable `"dimension: target=X, actual=Y"` form.
    pub fn describe(&self) -> String {
        format!(
            "{}: target={}, actual={}",
            self.dimension.as_str(),
            self.target,
            self.actual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftLevel {
    Low,
    Medium,
    High,
}

impl DriftLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= LOW_DRIFT_MIN_SCORE {
            Self::Low
        } else if score >= MEDIUM_DRIFT_MIN_SCORE {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDeviation {
    pub score: f64,
    pub drift_level: DriftLevel,
    pub deltas: Vec<StyleDelta>,
    pub top_3_drivers: Vec<String>,
}

impl StyleDeviation {
    fn unenforced() -> Self {
        Self {
            score: 1.0,
            drift_level: DriftLevel::Low,
            deltas: Vec::new(),
            top_3_drivers: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score how closely `fp` matches `target`.
///
/// Returns a perfect, low-drift result without deltas when the target has
/// no voice source.
pub fn score(fp: &StyleFingerprint, target: &StyleTarget) -> StyleDeviation {
    if target.voice_source == VoiceSource::None {
        return StyleDeviation::unenforced();
    }

    let mut deltas = Vec::new();

    if let Some(want) = target.dialogue_ratio {
        let distance = (fp.dialogue_ratio - want).abs();
        deltas.push(StyleDelta {
            dimension: StyleDimension::DialogueRatio,
            target: format!("{want:.2}"),
            actual: format!("{:.2}", fp.dialogue_ratio),
            penalty: capped_penalty(distance, DIALOGUE_NORMALIZER, DIALOGUE_WEIGHT),
        });
    }

    if let Some((lo, hi)) = target.sentence_length_band {
        let avg = fp.avg_sentence_length;
        let distance = if avg < lo {
            lo - avg
        } else if avg > hi {
            avg - hi
        } else {
            0.0
        };
        deltas.push(StyleDelta {
            dimension: StyleDimension::SentenceLength,
            target: format!("{lo}-{hi}"),
            actual: format!("{avg:.1}"),
            penalty: capped_penalty(distance, SENTENCE_BAND_NORMALIZER, SENTENCE_BAND_WEIGHT),
        });
    }

    if let Some(want) = target.description_density {
        deltas.push(categorical_delta(
            StyleDimension::DescriptionDensity,
            want.as_str(),
            fp.description_density.as_str(),
            DENSITY_WEIGHT,
        ));
    }

    if let Some(want) = target.pace {
        deltas.push(categorical_delta(
            StyleDimension::Pace,
            want.as_str(),
            infer_pace(fp).as_str(),
            PACE_WEIGHT,
        ));
    }

    if let Some(want) = target.humor {
        deltas.push(categorical_delta(
            StyleDimension::Humor,
            want.as_str(),
            infer_humor(fp).as_str(),
            HUMOR_WEIGHT,
        ));
    }

    if let Some(want) = target.subtext {
        deltas.push(categorical_delta(
            StyleDimension::Subtext,
            want.as_str(),
            infer_subtext(fp).as_str(),
            SUBTEXT_WEIGHT,
        ));
    }

    let total_penalty: f64 = deltas.iter().map(|d| d.penalty).sum();
    let score = round_to((1.0 - total_penalty).clamp(0.0, 1.0), 2);

    StyleDeviation {
        score,
        drift_level: DriftLevel::from_score(score),
        top_3_drivers: top_drivers(&deltas),
        deltas,
    }
}

fn capped_penalty(distance: f64, normalizer: f64, weight: f64) -> f64 {
    weight * (distance / normalizer).min(1.0)
}

fn categorical_delta(
    dimension: StyleDimension,
    target: &str,
    actual: &str,
    weight: f64,
) -> StyleDelta {
    StyleDelta {
        dimension,
        target: target.to_string(),
        actual: actual.to_string(),
        penalty: if target == actual { 0.0 } else { weight },
    }
}

/// Highest-penalty dimensions first; equal penalties keep evaluation order.
fn top_drivers(deltas: &[StyleDelta]) -> Vec<String> {
    let mut ranked: Vec<&StyleDelta> = deltas.iter().filter(|d| d.penalty > 0.0).collect();
    ranked.sort_by(|a, b| b.penalty.partial_cmp(&a.penalty).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(MAX_DRIVERS)
        .map(StyleDelta::describe)
        .collect()
}

// ---------------------------------------------------------------------------
// Attempt selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptChoice {
    First,
    Second,
}

/// Choose between two scored attempts.
///
/// The second attempt wins if it scores strictly higher, or if it crosses
/// the [`ACCEPTABLE_SCORE`] line that the first attempt missed.
pub fn select_best_attempt(first: f64, second: f64) -> AttemptChoice {
    if second > first || (first < ACCEPTABLE_SCORE && second >= ACCEPTABLE_SCORE) {
        AttemptChoice::Second
    } else {
        AttemptChoice::First
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
