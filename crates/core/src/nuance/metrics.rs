//! Narrative-content metrics used by the nuance gate.
//!
//! Markers are matched on word boundaries, case-insensitively. Scenes are
//! delimited by sluglines when the text has any, otherwise by blank-line
//! paragraphs.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text_metrics::{is_slugline, per_1k, SUBTEXT_MARKERS};
use crate::types::round_to;

// ---------------------------------------------------------------------------
// Marker vocabularies
// ---------------------------------------------------------------------------

pub const ABSOLUTE_WORDS: &[&str] = &[
    "always",
    "never",
    "everything",
    "nothing",
    "everyone",
    "no one",
    "forever",
    "completely",
    "totally",
    "absolutely",
    "utterly",
    "ultimate",
    "greatest",
    "worst",
    "most",
    "biggest",
    "deadliest",
    "unbelievable",
    "unimaginable",
];

pub const TWIST_KEYWORDS: &[&str] = &[
    "twist",
    "reveal",
    "reveals",
    "revealed",
    "turns out",
    "secretly",
    "all along",
    "betray",
    "betrays",
    "betrayed",
    "betrayal",
    "double-cross",
    "double-crossed",
    "real identity",
    "shocking truth",
    "was actually",
];

pub const CONSPIRACY_MARKERS: &[&str] = &[
    "conspiracy",
    "cover-up",
    "cover up",
    "cabal",
    "secret society",
    "puppet master",
    "pulling the strings",
    "behind it all",
    "shadow government",
];

pub const QUIET_BEAT_MARKERS: &[&str] = &[
    "silence",
    "silent",
    "quiet",
    "stillness",
    "a beat",
    "pause",
    "pauses",
    "sits alone",
    "stares out",
    "breathes",
    "lingers",
    "says nothing",
];

pub const MEANING_SHIFT_MARKERS: &[&str] = &[
    "realizes",
    "realises",
    "understands",
    "for the first time",
    "no longer",
    "it was never about",
    "changes her mind",
    "changes his mind",
    "changes their mind",
    "finally sees",
];

pub const ANTAGONIST_LEGITIMACY_MARKERS: &[&str] = &[
    "has a point",
    "not wrong",
    "understandable",
    "their reasons",
    "his reasons",
    "her reasons",
    "believes he is right",
    "believes she is right",
    "believes they are right",
    "wants to protect",
    "justified",
];

pub const COST_MARKERS: &[&str] = &[
    "cost",
    "costs",
    "sacrifice",
    "sacrifices",
    "price",
    "gives up",
    "gave up",
    "loses",
    "lost",
    "at the expense of",
    "consequence",
    "consequences",
];

pub const SHOCK_KEYWORDS: &[&str] = &[
    "explodes",
    "explosion",
    "gunshot",
    "gunfire",
    "murder",
    "murdered",
    "killed",
    "kills",
    "stabbed",
    "shot dead",
    "blood",
    "screams",
    "crash",
    "dead body",
    "corpse",
];

/// Nouns that turn a proper name into a named faction ("the Varga Cartel").
pub const FACTION_NOUNS: &[&str] = &[
    "Clan",
    "Family",
    "Cartel",
    "Syndicate",
    "Order",
    "Guild",
    "Council",
    "Brotherhood",
    "Alliance",
    "Faction",
    "Gang",
    "Corporation",
    "Agency",
    "Crew",
    "Union",
    "Party",
    "Empire",
    "Republic",
    "Church",
    "Circle",
    "Society",
];

/// Leading share of the text in which shock events count as early.
pub const EARLY_SHOCK_FRACTION: f64 = 0.2;

// ---------------------------------------------------------------------------
// Melodrama weights
// ---------------------------------------------------------------------------

pub const MELODRAMA_ABSOLUTE_WEIGHT: f64 = 0.35;
pub const MELODRAMA_TWIST_WEIGHT: f64 = 0.25;
pub const MELODRAMA_CONSPIRACY_WEIGHT: f64 = 0.20;
pub const MELODRAMA_SHOCK_WEIGHT: f64 = 0.20;

/// Absolute words per 1k at which that component saturates.
pub const ABSOLUTE_RATE_CEILING: f64 = 80.0;
/// Twist keywords per 1k at which that component saturates.
pub const TWIST_RATE_CEILING: f64 = 40.0;
pub const CONSPIRACY_COUNT_CEILING: f64 = 3.0;
pub const EARLY_SHOCK_COUNT_CEILING: f64 = 2.0;

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

fn marker_regex(markers: &[&str]) -> Regex {
    let alternation = markers
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid regex")
}

static ABSOLUTE_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(ABSOLUTE_WORDS));
static TWIST_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(TWIST_KEYWORDS));
static CONSPIRACY_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(CONSPIRACY_MARKERS));
static SUBTEXT_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(SUBTEXT_MARKERS));
static QUIET_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(QUIET_BEAT_MARKERS));
static MEANING_SHIFT_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(MEANING_SHIFT_MARKERS));
static LEGITIMACY_RE: LazyLock<Regex> =
    LazyLock::new(|| marker_regex(ANTAGONIST_LEGITIMACY_MARKERS));
static COST_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(COST_MARKERS));
static SHOCK_RE: LazyLock<Regex> = LazyLock::new(|| marker_regex(SHOCK_KEYWORDS));

/// One or more capitalized words followed by a faction noun.
static FACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:[A-Z][a-z]+\s+)+(?:{})\b",
        FACTION_NOUNS.join("|")
    ))
    .expect("valid regex")
});

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NuanceMetrics {
    pub word_count: usize,
    pub scene_count: usize,
    /// Absolute and superlative words per 1,000 words.
    pub absolute_rate: f64,
    /// Twist keywords per 1,000 words.
    pub twist_rate: f64,
    pub conspiracy_markers: usize,
    pub subtext_scenes: usize,
    pub quiet_beats: usize,
    pub meaning_shifts: usize,
    pub named_factions: usize,
    pub antagonist_legitimacy: bool,
    pub cost_markers: usize,
    /// Shock keywords occurring in the first 20% of the text.
    pub early_shock_events: usize,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract narrative metrics from `text`. Empty text yields all zeros.
pub fn extract_nuance_metrics(text: &str) -> NuanceMetrics {
    let text = text.trim();
    if text.is_empty() {
        return NuanceMetrics::default();
    }

    let word_count = text.split_whitespace().count();
    let scenes = split_scenes(text);

    NuanceMetrics {
        word_count,
        scene_count: scenes.len(),
        absolute_rate: per_1k(ABSOLUTE_RE.find_iter(text).count(), word_count),
        twist_rate: per_1k(TWIST_RE.find_iter(text).count(), word_count),
        conspiracy_markers: CONSPIRACY_RE.find_iter(text).count(),
        subtext_scenes: scenes.iter().filter(|s| SUBTEXT_RE.is_match(s)).count(),
        quiet_beats: QUIET_RE.find_iter(text).count(),
        meaning_shifts: MEANING_SHIFT_RE.find_iter(text).count(),
        named_factions: count_named_factions(text),
        antagonist_legitimacy: LEGITIMACY_RE.is_match(text),
        cost_markers: COST_RE.find_iter(text).count(),
        early_shock_events: count_early_shocks(text),
    }
}

/// Split `text` into scenes: at sluglines when present, otherwise at
/// blank-line paragraph breaks. Blank scenes are dropped.
pub fn split_scenes(text: &str) -> Vec<String> {
    if text.lines().any(is_slugline) {
        let mut scenes: Vec<String> = Vec::new();
        let mut current = String::new();
        for line in text.lines() {
            if is_slugline(line) && !current.trim().is_empty() {
                scenes.push(std::mem::take(&mut current));
            }
            current.push_str(line);
            current.push('\n');
        }
        if !current.trim().is_empty() {
            scenes.push(current);
        }
        scenes
    } else {
        PARAGRAPH_BREAK_RE
            .split(text)
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Count distinct named factions, ignoring a leading "The".
pub fn count_named_factions(text: &str) -> usize {
    FACTION_RE
        .find_iter(text)
        .map(|m| {
            let name = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            let lower = name.to_lowercase();
            lower
                .strip_prefix("the ")
                .map(str::to_string)
                .unwrap_or(lower)
        })
        .collect::<HashSet<_>>()
        .len()
}

fn count_early_shocks(text: &str) -> usize {
    let cutoff = (text.len() as f64 * EARLY_SHOCK_FRACTION) as usize;
    SHOCK_RE
        .find_iter(text)
        .take_while(|m| m.start() < cutoff)
        .count()
}

// ---------------------------------------------------------------------------
// Melodrama
// ---------------------------------------------------------------------------

/// Weighted melodrama score in `[0, 1]`, rounded to 3 decimals.
///
/// Each component saturates at its ceiling before weighting.
pub fn melodrama_score(m: &NuanceMetrics) -> f64 {
    let saturate = |value: f64, ceiling: f64| (value / ceiling).min(1.0);
    let score = MELODRAMA_ABSOLUTE_WEIGHT * saturate(m.absolute_rate, ABSOLUTE_RATE_CEILING)
        + MELODRAMA_TWIST_WEIGHT * saturate(m.twist_rate, TWIST_RATE_CEILING)
        + MELODRAMA_CONSPIRACY_WEIGHT
            * saturate(m.conspiracy_markers as f64, CONSPIRACY_COUNT_CEILING)
        + MELODRAMA_SHOCK_WEIGHT * saturate(m.early_shock_events as f64, EARLY_SHOCK_COUNT_CEILING);
    round_to(score.clamp(0.0, 1.0), 3)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
