//! Persona vocabulary.
//!
//! Two behavioral personas exist: HALSTON (the everyday, reassuring
//! voice) and SCARLET (the security posture). They are a closed tagged
//! variant rather than an open plugin surface; adding a third persona is
//! a matter of widening the enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The active behavioral persona.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Calm, reassuring everyday persona.
    #[default]
    Halston,
    /// Quiet, direct security persona.
    Scarlet,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halston => write!(f, "HALSTON"),
            Self::Scarlet => write!(f, "SCARLET"),
        }
    }
}

/// Per-session persona selector state.
///
/// Initialized to HALSTON on session creation and mutated only by the
/// persona FSM; no other component writes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaState {
    /// Currently active persona.
    pub active: Persona,
    /// When the active persona was entered.
    pub entered_at: DateTime<Utc>,
    /// Consecutive decisions with the score below the low-trust
    /// threshold. Drives sticky escalation.
    pub consecutive_low_trust: u32,
    /// Consecutive decisions with the score above the recovery
    /// threshold. Drives sustained-evidence de-escalation.
    pub consecutive_recovery: u32,
}

impl PersonaState {
    /// Fresh state: HALSTON active, counters zeroed.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            active: Persona::Halston,
            entered_at: now,
            consecutive_low_trust: 0,
            consecutive_recovery: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_start_in_halston() {
        let state = PersonaState::new(Utc::now());
        assert_eq!(state.active, Persona::Halston);
        assert_eq!(state.consecutive_low_trust, 0);
        assert_eq!(state.consecutive_recovery, 0);
    }

    #[test]
    fn persona_display_uses_call_signs() {
        assert_eq!(Persona::Halston.to_string(), "HALSTON");
        assert_eq!(Persona::Scarlet.to_string(), "SCARLET");
    }

    #[test]
    fn persona_serde_snake_case() {
        let json = serde_json::to_string(&Persona::Scarlet).unwrap();
        assert_eq!(json, "\"scarlet\"");
    }
}
