//! Trust state and decision types.
//!
//! [`TrustState`] is the persisted, per-speaker running score with a
//! bounded history window. [`TrustDecision`] is the per-request scoring
//! outcome; it lives only for the current decision cycle except where the
//! orchestrator writes its score back into `TrustState`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Default starting score for a speaker with no history.
pub const DEFAULT_SCORE: f32 = 50.0;

/// Effective privilege band derived from the numeric score.
///
/// Derived purely from score bands, independent of the enrollment hint —
/// a previously-trusted identity under sustained threat degrades in
/// privilege without re-resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Owner-equivalent privilege (high band).
    Owner,
    /// Household-equivalent privilege (mid band).
    Household,
    /// Guest-equivalent privilege (low band).
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Household => write!(f, "household"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

/// Persona preference expressed by the trust scorer.
///
/// `Neutral` defers the choice to session stickiness in the persona FSM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaBias {
    /// Prefer the HALSTON persona.
    Halston,
    /// Prefer the SCARLET persona.
    Scarlet,
    /// No preference; the FSM holds its current state.
    #[default]
    Neutral,
}

impl fmt::Display for PersonaBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halston => write!(f, "halston"),
            Self::Scarlet => write!(f, "scarlet"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Per-speaker hysteretic trust score with a bounded history window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustState {
    /// Current score, clamped to `[0, 100]` after every update.
    pub score: f32,
    /// When the score last changed.
    pub last_updated: DateTime<Utc>,
    /// Past scores, most-recent-last, bounded FIFO.
    pub history: VecDeque<f32>,
}

impl TrustState {
    /// A fresh state at the default score with empty history.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            score: DEFAULT_SCORE,
            last_updated: now,
            history: VecDeque::new(),
        }
    }

    /// Record a new score, pushing the value into history and evicting
    /// the oldest entry once `retention` is exceeded.
    pub fn record(&mut self, score: f32, retention: usize, now: DateTime<Utc>) {
        self.score = score.clamp(0.0, 100.0);
        self.last_updated = now;
        self.history.push_back(self.score);
        while self.history.len() > retention {
            let _ = self.history.pop_front();
        }
    }
}

/// Output of the trust scorer for one decision cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustDecision {
    /// The updated score in `[0, 100]`.
    pub score: f32,
    /// Score-band-derived privilege role.
    pub role: Role,
    /// Whether sensitive automation intents may execute.
    ///
    /// True only when the score clears the sensitive-action threshold
    /// AND the current threat level sits below the configured ceiling.
    pub allow_sensitive: bool,
    /// Persona preference for this decision.
    pub persona_bias: PersonaBias,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
