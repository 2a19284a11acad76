//! Production format names and their default qualifications.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Format names
// ---------------------------------------------------------------------------

pub const FORMAT_VERTICAL_DRAMA: &str = "vertical-drama";
pub const FORMAT_LIMITED_SERIES: &str = "limited-series";
pub const FORMAT_TV_SERIES: &str = "tv-series";
pub const FORMAT_ANIM_SERIES: &str = "anim-series";
pub const FORMAT_DOCUMENTARY_SERIES: &str = "documentary-series";
pub const FORMAT_DIGITAL_SERIES: &str = "digital-series";
pub const FORMAT_REALITY: &str = "reality";
pub const FORMAT_FILM: &str = "film";
pub const FORMAT_ANIM_FEATURE: &str = "anim-feature";
pub const FORMAT_SHORT_FILM: &str = "short-film";

/// Format assumed when none is supplied.
pub const DEFAULT_FORMAT: &str = FORMAT_FILM;

/// Episodic formats; these resolve episode fields instead of a runtime band.
pub const SERIES_FORMATS: &[&str] = &[
    FORMAT_VERTICAL_DRAMA,
    FORMAT_LIMITED_SERIES,
    FORMAT_TV_SERIES,
    FORMAT_ANIM_SERIES,
    FORMAT_DOCUMENTARY_SERIES,
    FORMAT_DIGITAL_SERIES,
    FORMAT_REALITY,
];

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Lowest-precedence values for a format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDefaults {
    pub episode_target_duration_seconds: Option<i64>,
    pub season_episode_count: Option<i64>,
    pub target_runtime_min_low: Option<i64>,
    pub target_runtime_min_high: Option<i64>,
}

const fn series(duration_seconds: i64, episodes: i64) -> FormatDefaults {
    FormatDefaults {
        episode_target_duration_seconds: Some(duration_seconds),
        season_episode_count: Some(episodes),
        target_runtime_min_low: None,
        target_runtime_min_high: None,
    }
}

const fn feature(runtime_low: i64, runtime_high: i64) -> FormatDefaults {
    FormatDefaults {
        episode_target_duration_seconds: None,
        season_episode_count: None,
        target_runtime_min_low: Some(runtime_low),
        target_runtime_min_high: Some(runtime_high),
    }
}

/// Default qualifications for a normalized format, or `None` if unknown.
pub fn format_defaults(format: &str) -> Option<FormatDefaults> {
    let defaults = match format {
        FORMAT_VERTICAL_DRAMA => series(60, 30),
        FORMAT_LIMITED_SERIES => series(3000, 6),
        FORMAT_TV_SERIES => series(2700, 10),
        FORMAT_ANIM_SERIES => series(1320, 12),
        FORMAT_DOCUMENTARY_SERIES => series(2700, 6),
        FORMAT_DIGITAL_SERIES => series(600, 10),
        FORMAT_REALITY => series(2640, 10),
        FORMAT_FILM => feature(90, 120),
        FORMAT_ANIM_FEATURE => feature(80, 100),
        FORMAT_SHORT_FILM => feature(5, 30),
        _ => return None,
    };
    Some(defaults)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Lowercase `raw` and collapse runs of `_`, `-` and whitespace into a single
/// `-`, trimming separators from both ends.
pub fn normalize_slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.extend(c.to_lowercase());
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Normalize a format name; empty input becomes [`DEFAULT_FORMAT`].
pub fn normalize_format(raw: &str) -> String {
    let slug = normalize_slug(raw);
    if slug.is_empty() {
        DEFAULT_FORMAT.to_string()
    } else {
        slug
    }
}

pub fn is_series_format(format: &str) -> bool {
    SERIES_FORMATS.contains(&format)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_case() {
        assert_eq!(normalize_format("vertical_drama"), "vertical-drama");
        assert_eq!(normalize_format("  TV  Series "), "tv-series");
        assert_eq!(normalize_format("limited__series"), "limited-series");
        assert_eq!(normalize_format("anim_-_feature"), "anim-feature");
    }

    #[test]
    fn empty_format_defaults_to_film() {
        assert_eq!(normalize_format(""), "film");
        assert_eq!(normalize_format("  _ "), "film");
        assert_eq!(normalize_slug(""), "");
    }

    #[test]
    fn every_series_format_has_episode_defaults() {
        for format in SERIES_FORMATS {
            let d = format_defaults(format).unwrap();
            assert!(d.episode_target_duration_seconds.is_some());
            assert!(d.season_episode_count.is_some());
            assert!(d.target_runtime_min_low.is_none());
        }
    }

    #[test]
    fn film_formats_have_runtime_defaults() {
        for format in [FORMAT_FILM, FORMAT_ANIM_FEATURE, FORMAT_SHORT_FILM] {
            assert!(!is_series_format(format));
            let d = format_defaults(format).unwrap();
            assert!(d.target_runtime_min_low <= d.target_runtime_min_high);
            assert!(d.episode_target_duration_seconds.is_none());
        }
    }

    #[test]
    fn unknown_format_has_no_defaults() {
        assert!(format_defaults("podcast").is_none());
        assert!(!is_series_format("podcast"));
    }
}
