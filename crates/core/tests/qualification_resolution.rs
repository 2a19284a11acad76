//! End-to-end checks for qualification resolution and the resolver hash.

use greenlight_core::qualifications::{
    compute_resolver_hash, is_stale, resolve, QualificationField, QualificationInput,
    QualificationLayer, QualificationSource,
};

fn count_layer(value: f64) -> QualificationLayer {
    QualificationLayer {
        season_episode_count: Some(value),
        ..Default::default()
    }
}

fn tv_series() -> QualificationInput {
    QualificationInput {
        format_subtype: Some("tv_series".to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: four-tier precedence
// ---------------------------------------------------------------------------

#[test]
fn precedence_promotes_tier_by_tier() {
    let field = QualificationField::SeasonEpisodeCount;
    let mut input = QualificationInput {
        project: count_layer(8.0),
        overrides: count_layer(12.0),
        guardrails: count_layer(20.0),
        ..tv_series()
    };

    let expectations = [
        (8, QualificationSource::Project),
        (12, QualificationSource::Overrides),
        (20, QualificationSource::Guardrails),
        (10, QualificationSource::Defaults),
    ];

    for (step, (value, source)) in expectations.into_iter().enumerate() {
        let result = resolve(&input);
        assert_eq!(result.resolved.season_episode_count, Some(value), "step {step}");
        assert_eq!(result.resolved.sources[&field], source, "step {step}");
        match step {
            0 => input.project = QualificationLayer::default(),
            1 => input.overrides = QualificationLayer::default(),
            2 => input.guardrails = QualificationLayer::default(),
            _ => {}
        }
    }
}

#[test]
fn zero_project_value_falls_through() {
    let input = QualificationInput {
        project: count_layer(0.0),
        overrides: count_layer(12.0),
        ..tv_series()
    };
    let result = resolve(&input);
    assert_eq!(result.resolved.season_episode_count, Some(12));
    assert!(result.errors.is_empty());
}

// ---------------------------------------------------------------------------
// Test: format branching and derived runtime
// ---------------------------------------------------------------------------

#[test]
fn film_resolves_runtime_band() {
    let input = QualificationInput {
        format_subtype: Some("film".to_string()),
        ..Default::default()
    };
    let result = resolve(&input);
    assert!(!result.resolved.is_series);
    assert!(result.resolved.target_runtime_min_low.is_some());
    assert!(result.resolved.target_runtime_min_high.is_some());
    assert_eq!(result.resolved.episode_target_duration_seconds, None);
    assert_eq!(result.resolved.season_episode_count, None);
    assert!(result.errors.is_empty());
}

#[test]
fn underscored_vertical_drama_normalizes() {
    let input = QualificationInput {
        format_subtype: Some("vertical_drama".to_string()),
        ..Default::default()
    };
    let resolved = resolve(&input).resolved;
    assert_eq!(resolved.format, "vertical-drama");
    assert!(resolved.is_series);
    assert_eq!(resolved.episode_target_duration_seconds, Some(60));
    assert_eq!(resolved.season_episode_count, Some(30));
}

#[test]
fn season_runtime_is_duration_times_count() {
    let input = QualificationInput {
        project: QualificationLayer {
            episode_target_duration_seconds: Some(2700.0),
            season_episode_count: Some(10.0),
            ..Default::default()
        },
        ..tv_series()
    };
    assert_eq!(resolve(&input).resolved.season_target_runtime_seconds, Some(27000));
}

// ---------------------------------------------------------------------------
// Test: errors are data
// ---------------------------------------------------------------------------

#[test]
fn invalid_values_reported_without_failing_other_fields() {
    let input = QualificationInput {
        project: QualificationLayer {
            episode_target_duration_seconds: Some(2.0),
            season_episode_count: Some(10.0),
            ..Default::default()
        },
        ..tv_series()
    };
    let result = resolve(&input);
    assert!(!result.is_valid());
    assert_eq!(result.resolved.episode_target_duration_seconds, None);
    assert_eq!(result.resolved.season_episode_count, Some(10));
    assert!(result
        .errors
        .iter()
        .any(|e| e.field == QualificationField::EpisodeTargetDurationSeconds));
}

// ---------------------------------------------------------------------------
// Test: hash determinism and staleness
// ---------------------------------------------------------------------------

#[test]
fn hash_is_stable_and_value_sensitive() {
    let with_duration = |seconds: f64| QualificationInput {
        project: QualificationLayer {
            episode_target_duration_seconds: Some(seconds),
            ..Default::default()
        },
        ..tv_series()
    };
    let a = resolve(&with_duration(60.0));
    assert_eq!(compute_resolver_hash(&a.resolved), a.resolver_hash);
    assert_eq!(resolve(&with_duration(60.0)).resolver_hash, a.resolver_hash);
    assert_ne!(resolve(&with_duration(120.0)).resolver_hash, a.resolver_hash);
}

#[test]
fn metadata_and_null_fields_do_not_change_hash() {
    let base: QualificationInput =
        serde_json::from_str(r#"{"format_subtype": "limited-series"}"#).unwrap();
    let noisy: QualificationInput = serde_json::from_str(
        r#"{
            "format_subtype": "limited-series",
            "updated_at": "2026-03-01T12:00:00Z",
            "overrides": {"season_episode_count": null}
        }"#,
    )
    .unwrap();
    let base = resolve(&base);
    let noisy = resolve(&noisy);
    assert_eq!(base.resolver_hash, noisy.resolver_hash);
    assert!(noisy.resolved.criteria_updated_at.is_some());
    assert!(!is_stale(Some(&base.resolver_hash), &noisy.resolved));
}
