//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`HalcyonSettings::default()`]
//! 2. If `~/.halcyon/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply `HALCYON_*` environment overrides (highest priority)
//! 4. Validate cross-field constraints
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::HalcyonSettings;

/// Resolve the path to the settings file (`~/.halcyon/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".halcyon").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<HalcyonSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or violates a cross-field constraint, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<HalcyonSettings> {
    let defaults = serde_json::to_value(HalcyonSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: HalcyonSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are ignored
/// with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut HalcyonSettings) {
    // ── Trust thresholds ────────────────────────────────────────────
    if let Some(v) = read_env_f32("HALCYON_SENSITIVE_THRESHOLD", 0.0, 100.0) {
        settings.trust.sensitive_threshold = v;
    }
    if let Some(v) = read_env_f32("HALCYON_THREAT_CEILING", 0.0, 1.0) {
        settings.trust.threat_ceiling = v;
    }
    if let Some(v) = read_env_f32("HALCYON_LOW_TRUST_THRESHOLD", 0.0, 100.0) {
        settings.trust.low_trust_threshold = v;
    }
    if let Some(v) = read_env_f32("HALCYON_RECOVERY_THRESHOLD", 0.0, 100.0) {
        settings.trust.recovery_threshold = v;
    }

    // ── Persona stickiness ──────────────────────────────────────────
    if let Some(v) = read_env_u32("HALCYON_STICKINESS_COUNT", 1, 100) {
        settings.persona.stickiness_count = v;
    }
    if let Some(v) = read_env_u32("HALCYON_RECOVERY_COUNT", 1, 100) {
        settings.persona.recovery_count = v;
    }

    // ── Identity ────────────────────────────────────────────────────
    if let Some(v) = read_env_f32("HALCYON_MIN_VOICE_CONFIDENCE", 0.0, 1.0) {
        settings.identity.min_voice_confidence = v;
    }
    if let Some(v) = read_env_string("HALCYON_IDENTITY_MAP") {
        settings.identity.map_path = v;
    }

    // ── Session retention ───────────────────────────────────────────
    if let Some(v) = read_env_u64("HALCYON_IDLE_TIMEOUT_SECS", 1, 604_800) {
        settings.session.idle_timeout_secs = v;
    }
    if let Some(v) = read_env_usize("HALCYON_HISTORY_RETENTION", 1, 10_000) {
        settings.session.history_retention = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as an `f32` within an inclusive range.
pub fn parse_f32_range(val: &str, min: f32, max: f32) -> Option<f32> {
    let n: f32 = val.parse().ok()?;
    (n.is_finite() && n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within an inclusive range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within an inclusive range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within an inclusive range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_f32(name: &str, min: f32, max: f32) -> Option<f32> {
    let val = std::env::var(name).ok()?;
    let result = parse_f32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid f32 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
