//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production values. `#[serde(default)]` allows partial
//! JSON — missing fields fall back to their defaults during
//! deserialization.
//!
//! The trust weights deserve a note: escalation is deliberately easier
//! than recovery. Threat outweighs reassurance, and the per-turn gain cap
//! sits below the per-turn loss cap, so trust drains faster than it
//! refills even under saturating inputs.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type for the HALCYON decision core.
///
/// Loaded from `~/.halcyon/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HalcyonSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Trust scorer weights and thresholds.
    pub trust: TrustSettings,
    /// Persona FSM stickiness parameters.
    pub persona: PersonaSettings,
    /// Identity resolver thresholds and map location.
    pub identity: IdentitySettings,
    /// Session store retention and eviction.
    pub session: SessionSettings,
    /// Intent router gating and entity defaults.
    pub router: RouterSettings,
}

impl Default for HalcyonSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "halcyon".to_string(),
            trust: TrustSettings::default(),
            persona: PersonaSettings::default(),
            identity: IdentitySettings::default(),
            session: SessionSettings::default(),
            router: RouterSettings::default(),
        }
    }
}

impl HalcyonSettings {
    /// Validate cross-field constraints.
    ///
    /// Called by the loader after merging; an inconsistent file is an
    /// error rather than a silently corrected value.
    pub fn validate(&self) -> Result<()> {
        let t = &self.trust;
        if t.recovery_threshold < t.low_trust_threshold {
            return Err(SettingsError::InvalidValue(format!(
                "recoveryThreshold ({}) below lowTrustThreshold ({})",
                t.recovery_threshold, t.low_trust_threshold
            )));
        }
        if t.max_step_up > t.max_step_down {
            return Err(SettingsError::InvalidValue(format!(
                "maxStepUp ({}) above maxStepDown ({}); recovery must not outpace loss",
                t.max_step_up, t.max_step_down
            )));
        }
        if t.reassurance_weight > t.threat_weight {
            return Err(SettingsError::InvalidValue(format!(
                "reassuranceWeight ({}) above threatWeight ({})",
                t.reassurance_weight, t.threat_weight
            )));
        }
        let i = &self.identity;
        if i.degrade_confidence > i.min_voice_confidence {
            return Err(SettingsError::InvalidValue(format!(
                "degradeConfidence ({}) above minVoiceConfidence ({})",
                i.degrade_confidence, i.min_voice_confidence
            )));
        }
        Ok(())
    }
}

/// Trust scorer weights and thresholds.
///
/// The score is a hysteretic running value: each decision applies a
/// bounded delta to the prior score rather than recomputing from scratch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustSettings {
    /// Scale applied to the voice-match probability (positive contribution).
    pub voice_weight: f32,
    /// Delta bias for an owner role hint.
    pub owner_bias: f32,
    /// Delta bias for a household role hint.
    pub household_bias: f32,
    /// Delta bias for a guest role hint (negative).
    pub guest_bias: f32,
    /// Delta bias for an unknown speaker (stronger negative).
    pub unknown_bias: f32,
    /// Fixed penalty while the house is in night mode.
    pub night_penalty: f32,
    /// Fixed penalty while the house is in away mode.
    pub away_penalty: f32,
    /// Scale applied to the threat level (subtracted).
    pub threat_weight: f32,
    /// Scale applied to the reassurance level (added). Kept below
    /// `threat_weight`: trust is harder to gain back than to lose.
    pub reassurance_weight: f32,
    /// Per-turn cap on score gain.
    pub max_step_up: f32,
    /// Per-turn cap on score loss. Larger than `max_step_up`.
    pub max_step_down: f32,
    /// Minimum score for sensitive actions.
    pub sensitive_threshold: f32,
    /// Threat level at or above which sensitive actions are refused
    /// regardless of score.
    pub threat_ceiling: f32,
    /// Score at or above which the derived role is owner-equivalent.
    pub owner_band: f32,
    /// Score at or above which the derived role is household-equivalent.
    pub household_band: f32,
    /// Score below which a decision is biased toward SCARLET and the
    /// FSM's low-trust counter increments.
    pub low_trust_threshold: f32,
    /// Score above which a decision may be biased toward HALSTON and the
    /// FSM's recovery counter increments.
    pub recovery_threshold: f32,
    /// Threat level above which the persona bias is SCARLET outright.
    pub scarlet_threat_ceiling: f32,
}

impl Default for TrustSettings {
    fn default() -> Self {
        Self {
            voice_weight: 12.0,
            owner_bias: 6.0,
            household_bias: 2.0,
            guest_bias: -4.0,
            unknown_bias: -8.0,
            night_penalty: 6.0,
            away_penalty: 10.0,
            threat_weight: 25.0,
            reassurance_weight: 10.0,
            max_step_up: 8.0,
            max_step_down: 20.0,
            sensitive_threshold: 70.0,
            threat_ceiling: 0.5,
            owner_band: 75.0,
            household_band: 55.0,
            low_trust_threshold: 40.0,
            recovery_threshold: 60.0,
            scarlet_threat_ceiling: 0.6,
        }
    }
}

/// Persona FSM stickiness parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonaSettings {
    /// Consecutive low-trust decisions required before sticky
    /// escalation to SCARLET (absent an outright SCARLET bias).
    pub stickiness_count: u32,
    /// Consecutive recovered decisions required before returning to
    /// HALSTON. Larger than `stickiness_count` by default: recovery
    /// needs sustained evidence, escalation can be faster.
    pub recovery_count: u32,
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            stickiness_count: 3,
            recovery_count: 4,
        }
    }
}

/// Identity resolver thresholds and persistence location.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentitySettings {
    /// Voice-match probability required to bind a new transient token
    /// to an enrolled identity.
    pub min_voice_confidence: f32,
    /// Probability floor for a known alias: between this and
    /// `min_voice_confidence` the identity still resolves (for audit)
    /// but the role hint degrades to guest. At or below, the speaker is
    /// treated as unresolved.
    pub degrade_confidence: f32,
    /// Path of the write-through identity map, relative to the home
    /// directory unless absolute.
    pub map_path: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            min_voice_confidence: 0.55,
            degrade_confidence: 0.35,
            map_path: ".halcyon/identity_map.json".to_string(),
        }
    }
}

/// Session store retention and eviction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Maximum retained trust-history entries per speaker (FIFO).
    pub history_retention: usize,
    /// Maximum retained conversation-trace entries per speaker (FIFO).
    pub trace_retention: usize,
    /// Seconds of inactivity after which a session may be evicted.
    pub idle_timeout_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            history_retention: 16,
            trace_retention: 32,
            idle_timeout_secs: 3600,
        }
    }
}

/// Intent router gating and entity defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterSettings {
    /// Intent names gated behind `allow_sensitive`.
    pub sensitive_intents: Vec<String>,
    /// Fallback light entity when no slot names one.
    pub default_light: String,
    /// Fallback lock entity.
    pub default_lock: String,
    /// Fallback climate entity.
    pub default_climate: String,
    /// Fallback media player entity.
    pub default_media_player: String,
    /// Garage cover entity.
    pub garage_entity: String,
    /// Alarm panel entity.
    pub alarm_entity: String,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            sensitive_intents: vec![
                "unlock_door".to_string(),
                "open_garage".to_string(),
                "disarm_alarm".to_string(),
            ],
            default_light: "light.living_room".to_string(),
            default_lock: "lock.front_door".to_string(),
            default_climate: "climate.living".to_string(),
            default_media_player: "media_player.living_room".to_string(),
            garage_entity: "cover.garage".to_string(),
            alarm_entity: "alarm_control_panel.home".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
