//! Production lanes and their nuance policy tables.
//!
//! Vertical drama is the most permissive lane and documentary the
//! strictest. Every lane carries a complete [`NuanceCaps`] record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::qualifications::formats::{
    is_series_format, normalize_slug, FORMAT_ANIM_FEATURE, FORMAT_DOCUMENTARY_SERIES, FORMAT_FILM,
    FORMAT_SHORT_FILM, FORMAT_VERTICAL_DRAMA,
};
use crate::threshold_validation::{validate_non_negative, validate_unit_range};

// ---------------------------------------------------------------------------
// Lane
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lane {
    VerticalDrama,
    Series,
    FeatureFilm,
    Documentary,
}

/// Film formats that map to the feature-film lane.
const FEATURE_LANE_FORMATS: &[&str] = &[FORMAT_FILM, FORMAT_ANIM_FEATURE, FORMAT_SHORT_FILM];

impl Lane {
    pub const ALL: [Lane; 4] = [
        Lane::VerticalDrama,
        Lane::Series,
        Lane::FeatureFilm,
        Lane::Documentary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VerticalDrama => "vertical-drama",
            Self::Series => "series",
            Self::FeatureFilm => "feature-film",
            Self::Documentary => "documentary",
        }
    }

    /// Parse a lane name. Case, underscores and spaces are normalized and a
    /// few short aliases are accepted.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match normalize_slug(s).as_str() {
            "vertical-drama" | "vertical" => Ok(Self::VerticalDrama),
            "series" | "tv-series" | "tv" => Ok(Self::Series),
            "feature-film" | "feature" | "film" => Ok(Self::FeatureFilm),
            "documentary" | "doc" => Ok(Self::Documentary),
            _ => Err(CoreError::UnknownLane(s.to_string())),
        }
    }

    /// Map a normalized production format to its lane.
    pub fn from_format(format: &str) -> Option<Self> {
        if format == FORMAT_VERTICAL_DRAMA {
            Some(Self::VerticalDrama)
        } else if format == FORMAT_DOCUMENTARY_SERIES {
            Some(Self::Documentary)
        } else if is_series_format(format) {
            Some(Self::Series)
        } else if FEATURE_LANE_FORMATS.contains(&format) {
            Some(Self::FeatureFilm)
        } else {
            None
        }
    }

    pub fn caps(self) -> NuanceCaps {
        match self {
            Self::VerticalDrama => VERTICAL_DRAMA_CAPS,
            Self::Series => SERIES_CAPS,
            Self::FeatureFilm => FEATURE_FILM_CAPS,
            Self::Documentary => DOCUMENTARY_CAPS,
        }
    }

    /// Melodrama score above which the gate fails.
    pub fn melodrama_threshold(self) -> f64 {
        match self {
            Self::VerticalDrama => 0.62,
            Self::Series => 0.55,
            Self::FeatureFilm => 0.50,
            Self::Documentary => 0.15,
        }
    }

    /// Template similarity risk above which the gate fails.
    pub fn similarity_threshold(self) -> f64 {
        match self {
            Self::VerticalDrama => 0.70,
            Self::Series => 0.65,
            Self::FeatureFilm => 0.60,
            Self::Documentary => 0.50,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Caps
// ---------------------------------------------------------------------------

/// Lane-specific narrative policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NuanceCaps {
    /// Major dramatic spikes allowed per piece.
    pub drama_budget: u32,
    /// Twist keywords allowed per 1,000 words.
    pub twist_cap: f64,
    pub new_character_cap: u32,
    pub plot_thread_cap: u32,
    pub faction_cap: u32,
    pub subtext_scenes_min: u32,
    pub quiet_beats_min: u32,
    /// Whether the lane requires stakes that escalate and cost something.
    pub stakes_escalation: bool,
    /// Fraction of the story after which the largest stakes should land.
    pub late_stakes_threshold: f64,
}

pub const VERTICAL_DRAMA_CAPS: NuanceCaps = NuanceCaps {
    drama_budget: 6,
    twist_cap: 6.0,
    new_character_cap: 8,
    plot_thread_cap: 5,
    faction_cap: 4,
    subtext_scenes_min: 1,
    quiet_beats_min: 1,
    stakes_escalation: true,
    late_stakes_threshold: 0.5,
};

pub const SERIES_CAPS: NuanceCaps = NuanceCaps {
    drama_budget: 4,
    twist_cap: 4.0,
    new_character_cap: 6,
    plot_thread_cap: 4,
    faction_cap: 3,
    subtext_scenes_min: 2,
    quiet_beats_min: 2,
    stakes_escalation: true,
    late_stakes_threshold: 0.6,
};

pub const FEATURE_FILM_CAPS: NuanceCaps = NuanceCaps {
    drama_budget: 3,
    twist_cap: 2.5,
    new_character_cap: 5,
    plot_thread_cap: 3,
    faction_cap: 3,
    subtext_scenes_min: 3,
    quiet_beats_min: 2,
    stakes_escalation: true,
    late_stakes_threshold: 0.7,
};

pub const DOCUMENTARY_CAPS: NuanceCaps = NuanceCaps {
    drama_budget: 1,
    twist_cap: 1.0,
    new_character_cap: 3,
    plot_thread_cap: 2,
    faction_cap: 2,
    subtext_scenes_min: 3,
    quiet_beats_min: 3,
    stakes_escalation: false,
    late_stakes_threshold: 0.8,
};

/// Validate a caller-supplied caps record.
pub fn validate_caps(caps: &NuanceCaps) -> Result<(), CoreError> {
    validate_non_negative(caps.twist_cap, "twist_cap")?;
    validate_unit_range(caps.late_stakes_threshold, "late_stakes_threshold")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- parsing --

    #[test]
    fn parse_canonical_and_aliases() {
        assert_eq!(Lane::parse("vertical-drama").unwrap(), Lane::VerticalDrama);
        assert_eq!(Lane::parse("Vertical_Drama").unwrap(), Lane::VerticalDrama);
        assert_eq!(Lane::parse("feature film").unwrap(), Lane::FeatureFilm);
        assert_eq!(Lane::parse("doc").unwrap(), Lane::Documentary);
        assert_eq!(Lane::parse("TV").unwrap(), Lane::Series);
    }

    #[test]
    fn parse_unknown_lane() {
        assert_matches!(Lane::parse("radio-play"), Err(CoreError::UnknownLane(_)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for lane in Lane::ALL {
            assert_eq!(Lane::parse(&lane.to_string()).unwrap(), lane);
        }
    }

    // -- format mapping --

    #[test]
    fn formats_map_to_lanes() {
        assert_eq!(Lane::from_format("vertical-drama"), Some(Lane::VerticalDrama));
        assert_eq!(Lane::from_format("tv-series"), Some(Lane::Series));
        assert_eq!(Lane::from_format("reality"), Some(Lane::Series));
        assert_eq!(Lane::from_format("documentary-series"), Some(Lane::Documentary));
        assert_eq!(Lane::from_format("anim-feature"), Some(Lane::FeatureFilm));
        assert_eq!(Lane::from_format("podcast"), None);
    }

    // -- thresholds --

    #[test]
    fn melodrama_thresholds() {
        assert_eq!(Lane::VerticalDrama.melodrama_threshold(), 0.62);
        assert_eq!(Lane::FeatureFilm.melodrama_threshold(), 0.50);
        assert_eq!(Lane::Documentary.melodrama_threshold(), 0.15);
    }

    #[test]
    fn similarity_thresholds() {
        assert_eq!(Lane::VerticalDrama.similarity_threshold(), 0.70);
        assert_eq!(Lane::FeatureFilm.similarity_threshold(), 0.60);
    }

    #[test]
    fn thresholds_tighten_from_vertical_to_documentary() {
        for pair in Lane::ALL.windows(2) {
            assert!(pair[0].melodrama_threshold() >= pair[1].melodrama_threshold());
            assert!(pair[0].similarity_threshold() >= pair[1].similarity_threshold());
        }
    }

    // -- caps --

    #[test]
    fn caps_loosen_for_serialized_formats() {
        for pair in Lane::ALL.windows(2) {
            let (looser, stricter) = (pair[0].caps(), pair[1].caps());
            assert!(looser.twist_cap >= stricter.twist_cap);
            assert!(looser.faction_cap >= stricter.faction_cap);
            assert!(looser.drama_budget >= stricter.drama_budget);
            assert!(looser.subtext_scenes_min <= stricter.subtext_scenes_min);
            assert!(looser.quiet_beats_min <= stricter.quiet_beats_min);
        }
    }

    #[test]
    fn every_lane_caps_validate() {
        for lane in Lane::ALL {
            assert!(validate_caps(&lane.caps()).is_ok());
        }
    }

    #[test]
    fn invalid_caps_rejected() {
        let caps = NuanceCaps {
            late_stakes_threshold: 1.5,
            ..SERIES_CAPS
        };
        assert!(validate_caps(&caps).is_err());
        let caps = NuanceCaps {
            twist_cap: -1.0,
            ..SERIES_CAPS
        };
        assert!(validate_caps(&caps).is_err());
    }

    #[test]
    fn lane_serializes_kebab_case() {
        let json = serde_json::to_string(&Lane::FeatureFilm).unwrap();
        assert_eq!(json, "\"feature-film\"");
    }
}
