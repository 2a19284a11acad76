//! Resolver hash for staleness checks.
//!
//! The hash covers the resolved values and the format only. Timestamps,
//! sources and diagnostics are left out so that re-resolving unchanged
//! criteria always yields the same string.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::hashing::base36_digest;
use crate::qualifications::resolver::ResolvedQualifications;

/// Bumped whenever resolution rules change in a way that invalidates
/// previously stored hashes.
pub const RESOLVER_VERSION: u32 = 1;

/// `qr-{RESOLVER_VERSION}-{base36 digest}` over a canonical projection of
/// `resolved`.
pub fn compute_resolver_hash(resolved: &ResolvedQualifications) -> String {
    format!(
        "qr-{RESOLVER_VERSION}-{}",
        base36_digest(canonical_projection(resolved).as_bytes())
    )
}

/// Compact JSON object of the hashed fields with keys in byte order.
fn canonical_projection(resolved: &ResolvedQualifications) -> String {
    let fields: BTreeMap<&str, Value> = BTreeMap::from([
        ("format", json!(resolved.format)),
        (
            "episode_target_duration_seconds",
            json!(resolved.episode_target_duration_seconds),
        ),
        (
            "episode_duration_min_seconds",
            json!(resolved.episode_duration_min_seconds),
        ),
        (
            "episode_duration_max_seconds",
            json!(resolved.episode_duration_max_seconds),
        ),
        ("season_episode_count", json!(resolved.season_episode_count)),
        ("target_runtime_min_low", json!(resolved.target_runtime_min_low)),
        ("target_runtime_min_high", json!(resolved.target_runtime_min_high)),
    ]);
    let body: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{}:{value}", json!(key)))
        .collect();
    format!("{{{}}}", body.join(","))
}

/// Whether content stored under `stored_hash` was produced against criteria
/// that no longer match `resolved`. A missing stored hash counts as stale.
pub fn is_stale(stored_hash: Option<&str>, resolved: &ResolvedQualifications) -> bool {
    match stored_hash {
        Some(stored) => stored != compute_resolver_hash(resolved),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
