use greenlight_core::nuance::fingerprint::DEFAULT_SIMILARITY_WINDOW;
use greenlight_core::nuance::gate::{GateOptions, MAX_RESTRAINT};
use greenlight_core::nuance::Lane;

use crate::error::{PipelineError, PipelineResult};

pub const ENV_LANE: &str = "GREENLIGHT_LANE";
pub const ENV_DIVERSIFY: &str = "GREENLIGHT_DIVERSIFY";
pub const ENV_RESTRAINT: &str = "GREENLIGHT_RESTRAINT";
pub const ENV_ANTI_TROPES: &str = "GREENLIGHT_ANTI_TROPES";
pub const ENV_SIMILARITY_WINDOW: &str = "GREENLIGHT_SIMILARITY_WINDOW";

/// Draft review configuration loaded from environment variables.
///
/// Every field has a default, so an empty environment yields a usable
/// feature-film configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewConfig {
    /// Nuance lane whose caps and thresholds apply (default: `feature-film`).
    pub lane: Lane,
    /// Enables the template-similarity gate check (default: `false`).
    pub diversify_enabled: bool,
    /// Restraint level `0..=100` (default: unset).
    pub restraint: Option<u8>,
    /// Trope ids listed in every repair instruction.
    pub anti_tropes: Vec<String>,
    /// Recent fingerprints compared for similarity risk (default: `10`).
    pub similarity_window: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            lane: Lane::FeatureFilm,
            diversify_enabled: false,
            restraint: None,
            anti_tropes: Vec::new(),
            similarity_window: DEFAULT_SIMILARITY_WINDOW,
        }
    }
}

impl ReviewConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default        |
    /// |--------------------------------|----------------|
    /// | `GREENLIGHT_LANE`              | `feature-film` |
    /// | `GREENLIGHT_DIVERSIFY`         | `false`        |
    /// | `GREENLIGHT_RESTRAINT`         | unset          |
    /// | `GREENLIGHT_ANTI_TROPES`       | empty          |
    /// | `GREENLIGHT_SIMILARITY_WINDOW` | `10`           |
    pub fn from_env() -> PipelineResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let lane = match get(ENV_LANE) {
            Some(raw) => Lane::parse(&raw)?,
            None => defaults.lane,
        };

        let diversify_enabled = match get(ENV_DIVERSIFY) {
            Some(raw) => parse_bool(ENV_DIVERSIFY, &raw)?,
            None => defaults.diversify_enabled,
        };

        let restraint = match get(ENV_RESTRAINT) {
            Some(raw) => {
                let level: u8 = raw.parse().map_err(|_| PipelineError::Config {
                    var: ENV_RESTRAINT,
                    message: format!("expected an integer 0..={MAX_RESTRAINT}, got '{raw}'"),
                })?;
                if level > MAX_RESTRAINT {
                    return Err(PipelineError::Config {
                        var: ENV_RESTRAINT,
                        message: format!("must be at most {MAX_RESTRAINT}, got {level}"),
                    });
                }
                Some(level)
            }
            None => defaults.restraint,
        };

        let anti_tropes: Vec<String> = get(ENV_ANTI_TROPES)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let similarity_window = match get(ENV_SIMILARITY_WINDOW) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(PipelineError::Config {
                        var: ENV_SIMILARITY_WINDOW,
                        message: format!("expected a positive integer, got '{raw}'"),
                    })
                }
            },
            None => defaults.similarity_window,
        };

        Ok(Self {
            lane,
            diversify_enabled,
            restraint,
            anti_tropes,
            similarity_window,
        })
    }

    /// Gate options for this configuration at the given similarity risk.
    pub fn gate_options(&self, similarity_risk: f64) -> GateOptions {
        GateOptions {
            diversify_enabled: self.diversify_enabled,
            similarity_risk,
            restraint: self.restraint,
            ..GateOptions::for_lane(self.lane)
        }
    }
}

fn parse_bool(var: &'static str, raw: &str) -> PipelineResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PipelineError::Config {
            var,
            message: format!("expected a boolean, got '{raw}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use assert_matches::assert_matches;
    use greenlight_core::error::CoreError;

    fn load(pairs: &[(&str, &str)]) -> PipelineResult<ReviewConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReviewConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(load(&[]).unwrap(), ReviewConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            (ENV_LANE, "vertical_drama"),
            (ENV_DIVERSIFY, "TRUE"),
            (ENV_RESTRAINT, "40"),
            (ENV_ANTI_TROPES, "secret_twin, amnesia_reset,,"),
            (ENV_SIMILARITY_WINDOW, "5"),
        ])
        .unwrap();
        assert_eq!(config.lane, Lane::VerticalDrama);
        assert!(config.diversify_enabled);
        assert_eq!(config.restraint, Some(40));
        assert_eq!(config.anti_tropes, vec!["secret_twin", "amnesia_reset"]);
        assert_eq!(config.similarity_window, 5);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[(ENV_LANE, "  "), (ENV_RESTRAINT, "")]).unwrap();
        assert_eq!(config.lane, Lane::FeatureFilm);
        assert_eq!(config.restraint, None);
    }

    #[test]
    fn unknown_lane_is_core_error() {
        assert_matches!(
            load(&[(ENV_LANE, "radio-play")]),
            Err(PipelineError::Core(CoreError::UnknownLane(_)))
        );
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert_matches!(
            load(&[(ENV_RESTRAINT, "101")]),
            Err(PipelineError::Config { var: ENV_RESTRAINT, .. })
        );
        assert_matches!(
            load(&[(ENV_RESTRAINT, "lots")]),
            Err(PipelineError::Config { var: ENV_RESTRAINT, .. })
        );
        assert_matches!(
            load(&[(ENV_DIVERSIFY, "maybe")]),
            Err(PipelineError::Config { var: ENV_DIVERSIFY, .. })
        );
        assert_matches!(
            load(&[(ENV_SIMILARITY_WINDOW, "0")]),
            Err(PipelineError::Config { var: ENV_SIMILARITY_WINDOW, .. })
        );
    }

    #[test]
    fn gate_options_carry_config() {
        let config = ReviewConfig {
            lane: Lane::Series,
            diversify_enabled: true,
            restraint: Some(50),
            ..Default::default()
        };
        let opts = config.gate_options(0.4);
        assert_eq!(opts.lane, Lane::Series);
        assert_eq!(opts.caps, Lane::Series.caps());
        assert!(opts.diversify_enabled);
        assert_eq!(opts.similarity_risk, 0.4);
        assert_eq!(opts.restraint, Some(50));
    }
}
