//! Four-tier qualification resolution.
//!
//! Every field resolves independently through the same precedence chain:
//! project value, explicit overrides, guardrail overrides, format default.
//! A value of exactly zero counts as absent. Problems are reported as data
//! in [`ResolveResult::errors`] and [`ResolveResult::warnings`]; the function
//! always returns a complete result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::qualifications::formats::{
    format_defaults, is_series_format, normalize_format, FormatDefaults,
};
use crate::qualifications::hash::compute_resolver_hash;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shortest episode duration accepted, in seconds.
pub const MIN_DURATION_SECONDS: i64 = 5;

/// Smallest episode count accepted.
pub const MIN_EPISODE_COUNT: i64 = 1;

/// Shortest feature runtime accepted, in minutes.
pub const MIN_RUNTIME_MINUTES: i64 = 1;

// ---------------------------------------------------------------------------
// Fields and sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationField {
    EpisodeTargetDurationSeconds,
    EpisodeDurationMinSeconds,
    EpisodeDurationMaxSeconds,
    SeasonEpisodeCount,
    TargetRuntimeMinLow,
    TargetRuntimeMinHigh,
}

impl QualificationField {
    pub const ALL: [QualificationField; 6] = [
        Self::EpisodeTargetDurationSeconds,
        Self::EpisodeDurationMinSeconds,
        Self::EpisodeDurationMaxSeconds,
        Self::SeasonEpisodeCount,
        Self::TargetRuntimeMinLow,
        Self::TargetRuntimeMinHigh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EpisodeTargetDurationSeconds => "episode_target_duration_seconds",
            Self::EpisodeDurationMinSeconds => "episode_duration_min_seconds",
            Self::EpisodeDurationMaxSeconds => "episode_duration_max_seconds",
            Self::SeasonEpisodeCount => "season_episode_count",
            Self::TargetRuntimeMinLow => "target_runtime_min_low",
            Self::TargetRuntimeMinHigh => "target_runtime_min_high",
        }
    }

    /// Fields that only apply to series formats.
    pub fn is_episode_field(self) -> bool {
        !self.is_runtime_field()
    }

    /// Fields that only apply to film formats.
    pub fn is_runtime_field(self) -> bool {
        matches!(self, Self::TargetRuntimeMinLow | Self::TargetRuntimeMinHigh)
    }

    fn is_duration_field(self) -> bool {
        matches!(
            self,
            Self::EpisodeTargetDurationSeconds
                | Self::EpisodeDurationMinSeconds
                | Self::EpisodeDurationMaxSeconds
        )
    }

    fn default_from(self, defaults: &FormatDefaults) -> Option<i64> {
        match self {
            Self::EpisodeTargetDurationSeconds => defaults.episode_target_duration_seconds,
            Self::SeasonEpisodeCount => defaults.season_episode_count,
            Self::TargetRuntimeMinLow => defaults.target_runtime_min_low,
            Self::TargetRuntimeMinHigh => defaults.target_runtime_min_high,
            Self::EpisodeDurationMinSeconds | Self::EpisodeDurationMaxSeconds => None,
        }
    }
}

/// Precedence tier that supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualificationSource {
    Project,
    Overrides,
    Guardrails,
    Defaults,
}

/// Tiers in precedence order, highest first.
pub const PRECEDENCE: [QualificationSource; 4] = [
    QualificationSource::Project,
    QualificationSource::Overrides,
    QualificationSource::Guardrails,
    QualificationSource::Defaults,
];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One tier of candidate values. Missing, `null` and `0` are all absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationLayer {
    pub episode_target_duration_seconds: Option<f64>,
    pub episode_duration_min_seconds: Option<f64>,
    pub episode_duration_max_seconds: Option<f64>,
    pub season_episode_count: Option<f64>,
    pub target_runtime_min_low: Option<f64>,
    pub target_runtime_min_high: Option<f64>,
}

impl QualificationLayer {
    pub fn get(&self, field: QualificationField) -> Option<f64> {
        match field {
            QualificationField::EpisodeTargetDurationSeconds => {
                self.episode_target_duration_seconds
            }
            QualificationField::EpisodeDurationMinSeconds => self.episode_duration_min_seconds,
            QualificationField::EpisodeDurationMaxSeconds => self.episode_duration_max_seconds,
            QualificationField::SeasonEpisodeCount => self.season_episode_count,
            QualificationField::TargetRuntimeMinLow => self.target_runtime_min_low,
            QualificationField::TargetRuntimeMinHigh => self.target_runtime_min_high,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationInput {
    pub format_subtype: Option<String>,
    pub project: QualificationLayer,
    pub overrides: QualificationLayer,
    pub guardrails: QualificationLayer,
    /// Fields only the project tier may set.
    pub locked_fields: Vec<QualificationField>,
    /// Last edit of the project criteria. Carried through, never hashed.
    pub updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationError {
    pub field: QualificationField,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationWarning {
    pub field: Option<QualificationField>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedQualifications {
    pub format: String,
    pub is_series: bool,
    pub episode_target_duration_seconds: Option<i64>,
    pub episode_duration_min_seconds: Option<i64>,
    pub episode_duration_max_seconds: Option<i64>,
    pub season_episode_count: Option<i64>,
    pub season_target_runtime_seconds: Option<i64>,
    pub target_runtime_min_low: Option<i64>,
    pub target_runtime_min_high: Option<i64>,
    pub sources: BTreeMap<QualificationField, QualificationSource>,
    pub criteria_updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub resolved: ResolvedQualifications,
    pub errors: Vec<QualificationError>,
    pub warnings: Vec<QualificationWarning>,
    pub resolver_hash: String,
}

impl ResolveResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Single-field resolution
// ---------------------------------------------------------------------------

/// Outcome of resolving one field through the precedence chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldResolution {
    pub value: Option<f64>,
    pub source: Option<QualificationSource>,
    pub warnings: Vec<QualificationWarning>,
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Resolve one field from `candidates`, given in [`PRECEDENCE`] order.
///
/// A locked field prefers the project value and warns if a lower tier also
/// tried to set it. A locked field without a project value warns and falls
/// through to normal precedence.
pub fn resolve_field(
    field: QualificationField,
    candidates: [Option<f64>; 4],
    locked: bool,
) -> FieldResolution {
    let candidates = candidates.map(present);
    let mut warnings = Vec::new();

    if locked {
        let [project, overrides, guardrails, _] = candidates;
        match project {
            Some(value) => {
                if overrides.is_some() || guardrails.is_some() {
                    warnings.push(QualificationWarning {
                        field: Some(field),
                        message: format!(
                            "{} is locked; override ignored in favour of project value",
                            field.as_str()
                        ),
                    });
                }
                return FieldResolution {
                    value: Some(value),
                    source: Some(QualificationSource::Project),
                    warnings,
                };
            }
            None => warnings.push(QualificationWarning {
                field: Some(field),
                message: format!(
                    "{} is locked but the project has no value; falling through to overrides and defaults",
                    field.as_str()
                ),
            }),
        }
    }

    let winner = PRECEDENCE
        .iter()
        .zip(candidates)
        .find_map(|(&source, value)| value.map(|v| (v, source)));

    FieldResolution {
        value: winner.map(|(v, _)| v),
        source: winner.map(|(_, s)| s),
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

struct Resolution {
    values: BTreeMap<QualificationField, i64>,
    sources: BTreeMap<QualificationField, QualificationSource>,
    errors: Vec<QualificationError>,
    warnings: Vec<QualificationWarning>,
}

impl Resolution {
    fn get(&self, field: QualificationField) -> Option<i64> {
        self.values.get(&field).copied()
    }

    fn error(&mut self, field: QualificationField, message: String) {
        self.errors.push(QualificationError { field, message });
    }

    fn reject(&mut self, field: QualificationField, message: String) {
        self.values.remove(&field);
        self.sources.remove(&field);
        self.error(field, message);
    }

    /// Copy `from` into `to` (value and source) when `from` is set.
    fn mirror(&mut self, from: QualificationField, to: QualificationField) {
        if let Some(value) = self.get(from) {
            self.values.insert(to, value);
            if let Some(&source) = self.sources.get(&from) {
                self.sources.insert(to, source);
            }
        }
    }
}

/// Resolve production qualifications for one project.
pub fn resolve(input: &QualificationInput) -> ResolveResult {
    let format = normalize_format(input.format_subtype.as_deref().unwrap_or(""));
    let is_series = is_series_format(&format);
    let defaults = format_defaults(&format);

    let mut res = Resolution {
        values: BTreeMap::new(),
        sources: BTreeMap::new(),
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    if defaults.is_none() {
        res.warnings.push(QualificationWarning {
            field: None,
            message: format!("Unknown format '{format}'; no format defaults applied"),
        });
    }

    for field in QualificationField::ALL {
        let applies = if is_series {
            field.is_episode_field()
        } else {
            field.is_runtime_field()
        };
        let explicit = [&input.project, &input.overrides, &input.guardrails]
            .map(|layer| present(layer.get(field)));

        if !applies {
            if explicit.iter().any(Option::is_some) {
                res.warnings.push(QualificationWarning {
                    field: Some(field),
                    message: format!("{} does not apply to format '{format}'; ignored", field.as_str()),
                });
            }
            continue;
        }

        let default = defaults
            .as_ref()
            .and_then(|d| field.default_from(d))
            .map(|v| v as f64);
        let [project, overrides, guardrails] = explicit;
        let outcome = resolve_field(
            field,
            [project, overrides, guardrails, default],
            input.locked_fields.contains(&field),
        );
        res.warnings.extend(outcome.warnings);

        if let (Some(value), Some(source)) = (outcome.value, outcome.source) {
            if source == QualificationSource::Defaults {
                res.warnings.push(QualificationWarning {
                    field: Some(field),
                    message: format!("{} defaulted to {value} for '{format}'", field.as_str()),
                });
            }
            res.values.insert(field, value.round() as i64);
            res.sources.insert(field, source);
        }
    }

    validate_ranges(&mut res);
    if is_series {
        reconcile_duration_band(&mut res);
        require_series_fields(&mut res);
    } else {
        check_runtime_band(&mut res);
    }

    let season_target_runtime_seconds = season_runtime(&res);

    let resolved = ResolvedQualifications {
        format,
        is_series,
        episode_target_duration_seconds: res.get(QualificationField::EpisodeTargetDurationSeconds),
        episode_duration_min_seconds: res.get(QualificationField::EpisodeDurationMinSeconds),
        episode_duration_max_seconds: res.get(QualificationField::EpisodeDurationMaxSeconds),
        season_episode_count: res.get(QualificationField::SeasonEpisodeCount),
        season_target_runtime_seconds,
        target_runtime_min_low: res.get(QualificationField::TargetRuntimeMinLow),
        target_runtime_min_high: res.get(QualificationField::TargetRuntimeMinHigh),
        sources: res.sources,
        criteria_updated_at: input.updated_at,
    };
    let resolver_hash = compute_resolver_hash(&resolved);

    ResolveResult {
        resolved,
        errors: res.errors,
        warnings: res.warnings,
        resolver_hash,
    }
}

/// Null out and report values below their minimums.
fn validate_ranges(res: &mut Resolution) {
    for field in QualificationField::ALL {
        let Some(value) = res.get(field) else {
            continue;
        };
        let (min, unit) = if field.is_duration_field() {
            (MIN_DURATION_SECONDS, "seconds")
        } else if field == QualificationField::SeasonEpisodeCount {
            (MIN_EPISODE_COUNT, "episodes")
        } else {
            (MIN_RUNTIME_MINUTES, "minutes")
        };
        if value < min {
            res.reject(
                field,
                format!("{} must be at least {min} {unit}, got {value}", field.as_str()),
            );
        }
    }
}

/// Fill a missing duration band from the scalar or the other bound, and
/// report an inverted band without discarding it.
fn reconcile_duration_band(res: &mut Resolution) {
    use QualificationField::*;

    match (
        res.get(EpisodeDurationMinSeconds),
        res.get(EpisodeDurationMaxSeconds),
    ) {
        (None, None) => {
            res.mirror(EpisodeTargetDurationSeconds, EpisodeDurationMinSeconds);
            res.mirror(EpisodeTargetDurationSeconds, EpisodeDurationMaxSeconds);
        }
        (Some(_), None) => res.mirror(EpisodeDurationMinSeconds, EpisodeDurationMaxSeconds),
        (None, Some(_)) => res.mirror(EpisodeDurationMaxSeconds, EpisodeDurationMinSeconds),
        (Some(min), Some(max)) if min > max => res.error(
            EpisodeDurationMinSeconds,
            format!("episode duration band is inverted: min {min}s exceeds max {max}s"),
        ),
        (Some(_), Some(_)) => {}
    }
}

fn require_series_fields(res: &mut Resolution) {
    use QualificationField::*;

    let has_duration = res.get(EpisodeTargetDurationSeconds).is_some()
        || res.get(EpisodeDurationMinSeconds).is_some();
    if !has_duration {
        res.error(
            EpisodeTargetDurationSeconds,
            "Series formats require an episode duration or duration band".to_string(),
        );
    }
    if res.get(SeasonEpisodeCount).is_none() {
        res.error(
            SeasonEpisodeCount,
            "Series formats require a season episode count".to_string(),
        );
    }
}

fn check_runtime_band(res: &mut Resolution) {
    use QualificationField::*;

    if let (Some(low), Some(high)) = (res.get(TargetRuntimeMinLow), res.get(TargetRuntimeMinHigh)) {
        if low > high {
            res.error(
                TargetRuntimeMinLow,
                format!("runtime band is inverted: low {low} min exceeds high {high} min"),
            );
        }
    }
}

/// Band midpoint (or scalar duration) times episode count.
fn season_runtime(res: &Resolution) -> Option<i64> {
    use QualificationField::*;

    let count = res.get(SeasonEpisodeCount)?;
    let per_episode = match (
        res.get(EpisodeDurationMinSeconds),
        res.get(EpisodeDurationMaxSeconds),
    ) {
        (Some(min), Some(max)) => (min as f64 + max as f64) / 2.0,
        _ => res.get(EpisodeTargetDurationSeconds)? as f64,
    };
    Some((per_episode * count as f64).round() as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use super::QualificationField::*;

    fn series_input(format: &str) -> QualificationInput {
        QualificationInput {
            format_subtype: Some(format.to_string()),
            ..Default::default()
        }
    }

    // -- resolve_field precedence --

    #[test]
    fn project_wins_over_all_tiers() {
        let r = resolve_field(
            SeasonEpisodeCount,
            [Some(8.0), Some(12.0), Some(20.0), Some(30.0)],
            false,
        );
        assert_eq!(r.value, Some(8.0));
        assert_eq!(r.source, Some(QualificationSource::Project));
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn tiers_promote_in_order() {
        let r = resolve_field(SeasonEpisodeCount, [None, Some(12.0), Some(20.0), Some(30.0)], false);
        assert_eq!(r.source, Some(QualificationSource::Overrides));
        let r = resolve_field(SeasonEpisodeCount, [None, None, Some(20.0), Some(30.0)], false);
        assert_eq!(r.source, Some(QualificationSource::Guardrails));
        let r = resolve_field(SeasonEpisodeCount, [None, None, None, Some(30.0)], false);
        assert_eq!(r.source, Some(QualificationSource::Defaults));
        let r = resolve_field(SeasonEpisodeCount, [None, None, None, None], false);
        assert_eq!(r.value, None);
        assert_eq!(r.source, None);
    }

    #[test]
    fn zero_counts_as_absent() {
        let r = resolve_field(SeasonEpisodeCount, [Some(0.0), Some(12.0), None, None], false);
        assert_eq!(r.value, Some(12.0));
        assert_eq!(r.source, Some(QualificationSource::Overrides));
    }

    #[test]
    fn locked_field_warns_when_override_attempted() {
        let r = resolve_field(SeasonEpisodeCount, [Some(8.0), Some(12.0), None, None], true);
        assert_eq!(r.value, Some(8.0));
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].message.contains("locked"));
    }

    #[test]
    fn locked_field_without_project_falls_through() {
        let r = resolve_field(SeasonEpisodeCount, [None, Some(12.0), None, Some(30.0)], true);
        assert_eq!(r.value, Some(12.0));
        assert_eq!(r.source, Some(QualificationSource::Overrides));
        assert_eq!(r.warnings.len(), 1);
    }

    // -- format branching --

    #[test]
    fn film_resolves_runtime_band_only() {
        let result = resolve(&series_input("film"));
        let q = &result.resolved;
        assert!(!q.is_series);
        assert_eq!(q.target_runtime_min_low, Some(90));
        assert_eq!(q.target_runtime_min_high, Some(120));
        assert_eq!(q.episode_target_duration_seconds, None);
        assert_eq!(q.season_episode_count, None);
        assert_eq!(q.season_target_runtime_seconds, None);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn missing_format_defaults_to_film() {
        let result = resolve(&QualificationInput::default());
        assert_eq!(result.resolved.format, "film");
        assert!(result.is_valid());
    }

    #[test]
    fn underscored_vertical_drama_uses_defaults() {
        let result = resolve(&series_input("vertical_drama"));
        let q = &result.resolved;
        assert_eq!(q.format, "vertical-drama");
        assert!(q.is_series);
        assert_eq!(q.episode_target_duration_seconds, Some(60));
        assert_eq!(q.season_episode_count, Some(30));
        assert_eq!(q.sources[&SeasonEpisodeCount], QualificationSource::Defaults);
        assert!(result.errors.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == Some(EpisodeTargetDurationSeconds)));
    }

    #[test]
    fn film_ignores_episode_fields_with_warning() {
        let mut input = series_input("film");
        input.project.season_episode_count = Some(10.0);
        let result = resolve(&input);
        assert_eq!(result.resolved.season_episode_count, None);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == Some(SeasonEpisodeCount) && w.message.contains("does not apply")));
    }

    #[test]
    fn unknown_format_warns_and_has_no_defaults() {
        let result = resolve(&series_input("podcast"));
        assert!(!result.resolved.is_series);
        assert_eq!(result.resolved.target_runtime_min_low, None);
        assert!(result.warnings.iter().any(|w| w.field.is_none()));
        assert!(result.errors.is_empty());
    }

    // -- derived runtime --

    #[test]
    fn season_runtime_from_scalar_duration() {
        let mut input = series_input("tv-series");
        input.project.episode_target_duration_seconds = Some(2700.0);
        input.project.season_episode_count = Some(10.0);
        let q = resolve(&input).resolved;
        assert_eq!(q.episode_duration_min_seconds, Some(2700));
        assert_eq!(q.episode_duration_max_seconds, Some(2700));
        assert_eq!(q.season_target_runtime_seconds, Some(27000));
    }

    #[test]
    fn season_runtime_from_band_midpoint() {
        let mut input = series_input("tv-series");
        input.project.episode_duration_min_seconds = Some(2400.0);
        input.project.episode_duration_max_seconds = Some(3000.0);
        input.project.season_episode_count = Some(8.0);
        let q = resolve(&input).resolved;
        assert_eq!(q.season_target_runtime_seconds, Some(21600));
    }

    #[test]
    fn huge_band_saturates_instead_of_overflowing() {
        let mut input = series_input("tv-series");
        input.project.episode_duration_min_seconds = Some(1e19);
        input.project.episode_duration_max_seconds = Some(1e19);
        input.project.season_episode_count = Some(10.0);
        let result = resolve(&input);
        assert_eq!(result.resolved.episode_duration_min_seconds, Some(i64::MAX));
        assert_eq!(result.resolved.season_target_runtime_seconds, Some(i64::MAX));
        assert!(result.resolver_hash.starts_with("qr-"));
    }

    // -- validation --

    #[test]
    fn durations_rounded_to_integers() {
        let mut input = series_input("tv-series");
        input.overrides.episode_target_duration_seconds = Some(1799.6);
        let q = resolve(&input).resolved;
        assert_eq!(q.episode_target_duration_seconds, Some(1800));
        assert_eq!(q.sources[&EpisodeTargetDurationSeconds], QualificationSource::Overrides);
    }

    #[test]
    fn short_duration_rejected_not_clamped() {
        let mut input = series_input("vertical-drama");
        input.project.episode_target_duration_seconds = Some(3.0);
        let result = resolve(&input);
        assert_eq!(result.resolved.episode_target_duration_seconds, None);
        assert!(!result.resolved.sources.contains_key(&EpisodeTargetDurationSeconds));
        assert_matches!(
            result.errors.as_slice(),
            [QualificationError { field: EpisodeTargetDurationSeconds, .. }, ..]
        );
    }

    #[test]
    fn negative_count_rejected() {
        let mut input = series_input("tv-series");
        input.project.season_episode_count = Some(-2.0);
        let result = resolve(&input);
        assert_eq!(result.resolved.season_episode_count, None);
        assert!(result.errors.iter().any(|e| e.field == SeasonEpisodeCount));
    }

    #[test]
    fn single_band_bound_mirrored() {
        let mut input = series_input("tv-series");
        input.guardrails.episode_duration_max_seconds = Some(2400.0);
        let q = resolve(&input).resolved;
        assert_eq!(q.episode_duration_min_seconds, Some(2400));
        assert_eq!(q.sources[&EpisodeDurationMinSeconds], QualificationSource::Guardrails);
    }

    #[test]
    fn inverted_band_reported_and_retained() {
        let mut input = series_input("tv-series");
        input.project.episode_duration_min_seconds = Some(3000.0);
        input.project.episode_duration_max_seconds = Some(2400.0);
        let result = resolve(&input);
        assert_eq!(result.resolved.episode_duration_min_seconds, Some(3000));
        assert_eq!(result.resolved.episode_duration_max_seconds, Some(2400));
        assert!(result.errors.iter().any(|e| e.field == EpisodeDurationMinSeconds));
    }

    #[test]
    fn inverted_runtime_band_reported() {
        let mut input = series_input("film");
        input.project.target_runtime_min_low = Some(130.0);
        let result = resolve(&input);
        assert!(result.errors.iter().any(|e| e.field == TargetRuntimeMinLow));
        assert_eq!(result.resolved.target_runtime_min_low, Some(130));
    }

    #[test]
    fn series_missing_required_after_rejection() {
        let mut input = series_input("limited-series");
        input.project.season_episode_count = Some(0.4);
        let result = resolve(&input);
        // 0.4 is non-zero, so it wins over the default and then fails validation.
        assert_eq!(result.resolved.season_episode_count, None);
        let count_errors: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.field == SeasonEpisodeCount)
            .collect();
        assert_eq!(count_errors.len(), 2);
    }

    #[test]
    fn defaults_prevent_missing_field_errors() {
        let result = resolve(&series_input("anim-series"));
        assert!(result.errors.is_empty());
        assert_eq!(result.resolved.season_target_runtime_seconds, Some(1320 * 12));
    }

    // -- locked fields end to end --

    #[test]
    fn locked_field_keeps_project_value() {
        let mut input = series_input("tv-series");
        input.project.season_episode_count = Some(6.0);
        input.overrides.season_episode_count = Some(13.0);
        input.locked_fields = vec![SeasonEpisodeCount];
        let result = resolve(&input);
        assert_eq!(result.resolved.season_episode_count, Some(6));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == Some(SeasonEpisodeCount) && w.message.contains("locked")));
    }
}
