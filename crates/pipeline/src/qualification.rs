use serde::{Deserialize, Serialize};

use greenlight_core::nuance::Lane;
use greenlight_core::qualifications::{is_stale, resolve, QualificationInput, ResolveResult};

/// Qualifications resolved ahead of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunQualifications {
    #[serde(flatten)]
    pub result: ResolveResult,
    /// Nuance lane implied by the resolved format, if any.
    pub lane: Option<Lane>,
    /// Content stored under `previous_hash` no longer matches the criteria.
    pub stale: bool,
}

/// Resolve qualifications for a run and compare against the hash stored
/// with previously generated content.
pub fn resolve_for_run(input: &QualificationInput, previous_hash: Option<&str>) -> RunQualifications {
    let result = resolve(input);
    let resolved = &result.resolved;

    for error in &result.errors {
        tracing::warn!(field = error.field.as_str(), message = %error.message, "Qualification error");
    }
    for warning in &result.warnings {
        tracing::debug!(
            field = warning.field.map(|f| f.as_str()),
            message = %warning.message,
            "Qualification warning",
        );
    }

    let stale = is_stale(previous_hash, resolved);
    if stale && previous_hash.is_some() {
        tracing::info!(
            previous = previous_hash,
            current = %result.resolver_hash,
            "Qualification criteria changed since last run",
        );
    }

    tracing::info!(
        format = %resolved.format,
        is_series = resolved.is_series,
        errors = result.errors.len(),
        hash = %result.resolver_hash,
        "Qualifications resolved",
    );

    RunQualifications {
        lane: Lane::from_format(&resolved.format),
        stale,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(duration: f64) -> QualificationInput {
        let mut input = QualificationInput {
            format_subtype: Some("vertical_drama".to_string()),
            ..Default::default()
        };
        input.project.episode_target_duration_seconds = Some(duration);
        input
    }

    #[test]
    fn first_run_is_stale() {
        let run = resolve_for_run(&vertical(60.0), None);
        assert!(run.stale);
        assert_eq!(run.lane, Some(Lane::VerticalDrama));
        assert!(run.result.is_valid());
    }

    #[test]
    fn unchanged_criteria_are_fresh() {
        let first = resolve_for_run(&vertical(60.0), None);
        let second = resolve_for_run(&vertical(60.0), Some(&first.result.resolver_hash));
        assert!(!second.stale);
    }

    #[test]
    fn changed_criteria_are_stale() {
        let first = resolve_for_run(&vertical(60.0), None);
        let second = resolve_for_run(&vertical(90.0), Some(&first.result.resolver_hash));
        assert!(second.stale);
    }

    #[test]
    fn unknown_format_has_no_lane() {
        let input = QualificationInput {
            format_subtype: Some("podcast".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_for_run(&input, None).lane, None);
    }
}
