//! Repair directives assembled from gate failures and style drift.
//!
//! The output is plain text meant to be appended to the context of the
//! next generation attempt.

use crate::nuance::gate::FailureCode;
use crate::nuance::lane::{Lane, NuanceCaps};
use crate::style_deviation::{DriftLevel, StyleDeviation};

/// Closing rules appended to every repair instruction.
pub const CRITICAL_REPAIR_RULES: &str = "CRITICAL REPAIR RULES:\n\
- Do NOT add new plot elements, characters or subplots.\n\
- Do NOT change the ending or the core premise.\n\
- Preserve names, locations and established facts.\n\
- Fix only what is listed above and keep everything else as written.";

fn lane_priorities(lane: Lane) -> &'static str {
    match lane {
        Lane::VerticalDrama => {
            "REPAIR PRIORITIES (vertical drama):\n\
             - Keep the opening hook and the closing cliffhanger intact.\n\
             - Trim spectacle before trimming momentum; every beat must still land in seconds.\n\
             - Prefer one sharp reversal over stacked shocks."
        }
        Lane::Series => {
            "REPAIR PRIORITIES (series):\n\
             - Protect the episode's A-story spine and the season arc it feeds.\n\
             - Let tension carry across scenes instead of resolving it with a twist.\n\
             - Keep recurring characters consistent with earlier episodes."
        }
        Lane::FeatureFilm => {
            "REPAIR PRIORITIES (feature film):\n\
             - Favour character interiority over plot mechanics.\n\
             - Earn the climax through accumulated cost, not late revelations.\n\
             - Keep the cast and subplots lean."
        }
        Lane::Documentary => {
            "REPAIR PRIORITIES (documentary):\n\
             - Stay with observable fact and remove dramatized speculation.\n\
             - Let subjects speak for themselves; cut editorial superlatives.\n\
             - Never invent conflict the material does not support."
        }
    }
}

fn failure_block(code: FailureCode, caps: &NuanceCaps) -> String {
    match code {
        FailureCode::Melodrama => format!(
            "REDUCE MELODRAMA:\n\
             - Cut superlatives and absolutes (\"always\", \"never\", \"the most\").\n\
             - Remove conspiracy framing and betrayal reveals that are not set up.\n\
             - Replace violent or shocking openers with a grounded situation.\n\
             - Stay within a drama budget of {} major dramatic spikes.",
            caps.drama_budget
        ),
        FailureCode::SubtextMissing => format!(
            "ADD SUBTEXT:\n\
             - Write at least {} scenes where characters want something they do not say aloud.\n\
             - Show reactions through behaviour (a look away, a pause, a changed subject) \
             rather than stated feelings.",
            caps.subtext_scenes_min
        ),
        FailureCode::QuietBeatsMissing => format!(
            "ADD QUIET BEATS:\n\
             - Include at least {} quiet beats: silence, stillness, a character alone with a decision.\n\
             - Let at least one scene breathe without new information.",
            caps.quiet_beats_min
        ),
        FailureCode::TwistOveruse => format!(
            "LIMIT TWISTS:\n\
             - Keep twists to no more than {} per 1,000 words.\n\
             - Every remaining reveal must be set up earlier in the text.",
            caps.twist_cap
        ),
        FailureCode::Overcomplexity => format!(
            "SIMPLIFY:\n\
             - Reduce named factions to at most {}.\n\
             - Keep to {} plot threads and introduce no more than {} new characters.\n\
             - Merge groups that serve the same dramatic function.",
            caps.faction_cap, caps.plot_thread_cap, caps.new_character_cap
        ),
        FailureCode::CostMissing => format!(
            "ADD COST:\n\
             - Every major choice must cost the protagonist something concrete.\n\
             - Let the biggest cost land after {}% of the story.",
            (caps.late_stakes_threshold * 100.0).round()
        ),
        FailureCode::AntagonistFlat => "GIVE THE OPPOSITION A POINT:\n\
             - The antagonist acts from reasons an audience could understand.\n\
             - Show at least one moment where the opposing side is not wrong."
            .to_string(),
        FailureCode::TemplateSimilarity => "BREAK THE TEMPLATE:\n\
             - Change the story engine or conflict mode used by recent stories.\n\
             - Use a different setting texture and causal structure than recent output."
            .to_string(),
    }
}

fn anti_trope_block(anti_tropes: &[String]) -> Option<String> {
    if anti_tropes.is_empty() {
        return None;
    }
    let items: Vec<String> = anti_tropes
        .iter()
        .enumerate()
        .map(|(i, trope)| format!("{}. {}", i + 1, trope.replace('_', " ")))
        .collect();
    Some(format!("AVOID THESE TROPES:\n{}", items.join("\n")))
}

/// Build the repair directive for a set of gate failures.
///
/// Sections appear in this order: lane priorities (when `lane` is given),
/// one block per failure in `failures` order, the anti-trope list (when
/// non-empty), then [`CRITICAL_REPAIR_RULES`].
pub fn build_instruction(
    failures: &[FailureCode],
    caps: &NuanceCaps,
    anti_tropes: &[String],
    lane: Option<Lane>,
) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(failures.len() + 3);
    if let Some(lane) = lane {
        sections.push(lane_priorities(lane).to_string());
    }
    sections.extend(failures.iter().map(|&code| failure_block(code, caps)));
    sections.extend(anti_trope_block(anti_tropes));
    sections.push(CRITICAL_REPAIR_RULES.to_string());
    sections.join("\n\n")
}

/// Directive for a drifting style score, or `None` when drift is low.
pub fn build_style_repair(deviation: &StyleDeviation) -> Option<String> {
    if deviation.drift_level == DriftLevel::Low || deviation.top_3_drivers.is_empty() {
        return None;
    }
    let lines: Vec<String> = deviation
        .top_3_drivers
        .iter()
        .map(|driver| format!("- Move toward the target on {driver}"))
        .collect();
    Some(format!(
        "STYLE CORRECTION (score {:.2}, drift {}):\n{}",
        deviation.score,
        deviation.drift_level.as_str(),
        lines.join("\n")
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
