//! Production qualification resolution.

pub mod formats;
pub mod hash;
pub mod resolver;

pub use formats::{format_defaults, is_series_format, normalize_format, FormatDefaults};
pub use hash::{compute_resolver_hash, is_stale, RESOLVER_VERSION};
pub use resolver::{
    resolve, resolve_field, QualificationError, QualificationField, QualificationInput,
    QualificationLayer, QualificationSource, QualificationWarning, ResolveResult,
    ResolvedQualifications,
};
