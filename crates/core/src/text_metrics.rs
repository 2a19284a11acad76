//! Style fingerprint extraction for prose and screenplay text.
//!
//! [`extract`] is total: any input, including empty or whitespace-only text,
//! yields a well-formed [`StyleFingerprint`]. Screenplay structure is read
//! with a small line classifier (sluglines, character cues, parentheticals)
//! driven by an explicit dialogue state.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::round_to;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rates are normalized to occurrences per this many words.
pub const RATE_BASIS_WORDS: f64 = 1000.0;

/// Number of leading tokens sampled for lexical variety.
pub const LEXICAL_SAMPLE_TOKENS: usize = 1000;

/// Sentence fragments with this many words or fewer are discarded.
pub const MAX_DISCARDED_FRAGMENT_WORDS: usize = 2;

/// Average sentence length above which description reads as dense.
pub const HIGH_DENSITY_SENTENCE_WORDS: f64 = 18.0;
/// Action-line ratio required (with long sentences) for dense description.
pub const HIGH_DENSITY_ACTION_RATIO: f64 = 0.55;
/// Average sentence length below which description reads as sparse.
pub const LOW_DENSITY_SENTENCE_WORDS: f64 = 12.0;
/// Dialogue ratio above which description reads as sparse.
pub const LOW_DENSITY_DIALOGUE_RATIO: f64 = 0.6;

/// Phrases signalling unspoken meaning or withheld reaction.
pub const SUBTEXT_MARKERS: &[&str] = &[
    "beat",
    "pause",
    "silence",
    "doesn't answer",
    "does not answer",
    "looks away",
    "avoids",
    "unspoken",
    "hesitates",
    "almost says",
    "instead of",
    "says nothing",
    "a long look",
    "changes the subject",
    "forced smile",
    "too quickly",
];

/// Phrases signalling comic register.
pub const HUMOR_MARKERS: &[&str] = &[
    "laughs",
    "grins",
    "smirks",
    "chuckles",
    "jokes",
    "deadpan",
    "wry",
    "sarcastic",
    "snorts",
    "teases",
    "funny",
];

pub const ELLIPSIS_MARKERS: &[&str] = &["...", "\u{2026}"];
pub const DASH_MARKERS: &[&str] = &["\u{2014}", "\u{2013}", "--"];
pub const EXCLAMATION_MARKERS: &[&str] = &["!"];
pub const QUESTION_MARKERS: &[&str] = &["?"];

// ---------------------------------------------------------------------------
// Line patterns
// ---------------------------------------------------------------------------

/// Scene heading, optionally preceded by a scene number.
static SLUGLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+[A-Z]?\.?\s+)?(?:INT\./EXT\.|INT\.|EXT\.|I-E\.|I/E\.)(?:\s|$)")
        .expect("valid regex")
});

/// All-caps character name (1-40 chars) with an optional parenthetical extension.
static CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Z][A-Z0-9 .'\-]{0,39}(?:\s*\([^)]*\))?\s*$").expect("valid regex")
});

/// A line consisting only of a parenthetical direction.
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\([^)]*\)\s*$").expect("valid regex"));

/// Sentence terminator followed by whitespace or end of text.
static SENTENCE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Coarse description density bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionDensity {
    #[default]
    Low,
    Medium,
    High,
}

impl DescriptionDensity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Punctuation usage per 1,000 words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PunctuationProfile {
    pub ellipses_per_1k: f64,
    pub dashes_per_1k: f64,
    pub exclamations_per_1k: f64,
    pub questions_per_1k: f64,
}

/// Numeric and categorical summary of a text's surface style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleFingerprint {
    pub char_count: usize,
    pub line_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_line_length: f64,
    pub avg_sentence_length: f64,
    pub sentence_length_p50: f64,
    pub sentence_length_p90: f64,
    pub dialogue_ratio: f64,
    pub character_cue_count: usize,
    pub parenthetical_count: usize,
    pub action_line_ratio: f64,
    pub description_density: DescriptionDensity,
    pub subtext_per_1k: f64,
    pub humor_per_1k: f64,
    pub punctuation: PunctuationProfile,
    pub lexical_variety: f64,
}

/// Classification of a single line of screenplay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Slugline,
    Cue,
    Parenthetical,
    Dialogue,
    Action,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DialogueState {
    #[default]
    Outside,
    Inside,
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// Classify every line of `text`.
///
/// A cue opens a dialogue block; a blank line or a slugline closes it.
/// Non-parenthetical lines inside an open block are dialogue.
pub fn classify_lines(text: &str) -> Vec<LineKind> {
    let mut state = DialogueState::Outside;
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                state = DialogueState::Outside;
                LineKind::Blank
            } else if SLUGLINE_RE.is_match(line) {
                state = DialogueState::Outside;
                LineKind::Slugline
            } else if CUE_RE.is_match(line) {
                state = DialogueState::Inside;
                LineKind::Cue
            } else if PARENTHETICAL_RE.is_match(line) {
                LineKind::Parenthetical
            } else if state == DialogueState::Inside {
                LineKind::Dialogue
            } else {
                LineKind::Action
            }
        })
        .collect()
}

/// Returns `true` if `line` is a scene heading.
pub fn is_slugline(line: &str) -> bool {
    SLUGLINE_RE.is_match(line)
}

// ---------------------------------------------------------------------------
// Shared counting helpers
// ---------------------------------------------------------------------------

/// Count non-overlapping, case-insensitive occurrences of every marker in
/// `text_lower` (which must already be lowercased).
pub fn count_markers(text_lower: &str, markers: &[&str]) -> usize {
    markers
        .iter()
        .map(|m| m.to_lowercase())
        .filter(|m| !m.is_empty())
        .map(|m| text_lower.matches(m.as_str()).count())
        .sum()
}

/// Occurrences of `markers` per 1,000 words, rounded to 2 decimals.
pub fn rate_per_1k(text_lower: &str, markers: &[&str], word_count: usize) -> f64 {
    per_1k(count_markers(text_lower, markers), word_count)
}

/// Normalize a raw count to a per-1,000-word rate, rounded to 2 decimals.
pub fn per_1k(count: usize, word_count: usize) -> f64 {
    round_to(
        count as f64 * RATE_BASIS_WORDS / word_count.max(1) as f64,
        2,
    )
}

/// Word counts of every sentence longer than the discard threshold.
pub fn sentence_lengths(text: &str) -> Vec<usize> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(|s| s.split_whitespace().count())
        .filter(|&n| n > MAX_DISCARDED_FRAGMENT_WORDS)
        .collect()
}

/// Nearest-rank percentile over an ascending-sorted slice.
///
/// Index is `ceil(p/100 * n) - 1`, clamped at 0. Empty input yields 0.
pub fn percentile(sorted: &[usize], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx] as f64
}

/// Ratio of distinct tokens among the first [`LEXICAL_SAMPLE_TOKENS`] tokens.
pub fn lexical_variety(text_lower: &str) -> f64 {
    let tokens: Vec<&str> = text_lower
        .split_whitespace()
        .take(LEXICAL_SAMPLE_TOKENS)
        .collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = tokens.iter().copied().collect();
    round_to(unique.len() as f64 / tokens.len() as f64, 3)
}

/// Bucket description density from sentence length and line mix.
pub fn infer_description_density(
    avg_sentence_length: f64,
    action_line_ratio: f64,
    dialogue_ratio: f64,
) -> DescriptionDensity {
    if avg_sentence_length > HIGH_DENSITY_SENTENCE_WORDS
        && action_line_ratio > HIGH_DENSITY_ACTION_RATIO
    {
        DescriptionDensity::High
    } else if avg_sentence_length < LOW_DENSITY_SENTENCE_WORDS
        || dialogue_ratio > LOW_DENSITY_DIALOGUE_RATIO
    {
        DescriptionDensity::Low
    } else {
        DescriptionDensity::Medium
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Compute the style fingerprint of `text`.
pub fn extract(text: &str) -> StyleFingerprint {
    let text = text.trim();
    if text.is_empty() {
        return StyleFingerprint::default();
    }

    let kinds = classify_lines(text);
    let count_of = |kind: LineKind| kinds.iter().filter(|&&k| k == kind).count();
    let non_empty = kinds.len() - count_of(LineKind::Blank);
    let dialogue = count_of(LineKind::Dialogue);
    let cues = count_of(LineKind::Cue);
    let parentheticals = count_of(LineKind::Parenthetical);

    let (dialogue_ratio, action_line_ratio) = if non_empty == 0 {
        (0.0, 0.0)
    } else {
        let action = non_empty.saturating_sub(dialogue + cues + parentheticals);
        (
            round_to(dialogue as f64 / non_empty as f64, 3),
            round_to(action as f64 / non_empty as f64, 3),
        )
    };

    let line_lengths: Vec<usize> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.chars().count())
        .collect();
    let avg_line_length = mean(&line_lengths);

    let mut lengths = sentence_lengths(text);
    lengths.sort_unstable();
    let avg_sentence_length = mean(&lengths);

    let lower = text.to_lowercase();
    let word_count = lower.split_whitespace().count();

    StyleFingerprint {
        char_count: text.chars().count(),
        line_count: non_empty,
        word_count,
        sentence_count: lengths.len(),
        avg_line_length,
        avg_sentence_length,
        sentence_length_p50: percentile(&lengths, 50.0),
        sentence_length_p90: percentile(&lengths, 90.0),
        dialogue_ratio,
        character_cue_count: cues,
        parenthetical_count: parentheticals,
        action_line_ratio,
        description_density: infer_description_density(
            avg_sentence_length,
            action_line_ratio,
            dialogue_ratio,
        ),
        subtext_per_1k: rate_per_1k(&lower, SUBTEXT_MARKERS, word_count),
        humor_per_1k: rate_per_1k(&lower, HUMOR_MARKERS, word_count),
        punctuation: PunctuationProfile {
            ellipses_per_1k: rate_per_1k(&lower, ELLIPSIS_MARKERS, word_count),
            dashes_per_1k: rate_per_1k(&lower, DASH_MARKERS, word_count),
            exclamations_per_1k: rate_per_1k(&lower, EXCLAMATION_MARKERS, word_count),
            questions_per_1k: rate_per_1k(&lower, QUESTION_MARKERS, word_count),
        },
        lexical_variety: lexical_variety(&lower),
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round_to(
        values.iter().sum::<usize>() as f64 / values.len() as f64,
        2,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
