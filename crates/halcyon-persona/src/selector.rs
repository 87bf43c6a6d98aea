//! The persona finite-state machine.
//!
//! States: HALSTON (initial) and SCARLET. No terminal state — the
//! machine runs for the lifetime of the session.
//!
//! Transitions:
//! - HALSTON → SCARLET when the decision's bias is SCARLET, or when the
//!   low-trust streak reaches the stickiness count.
//! - SCARLET → HALSTON only when the bias is HALSTON *and* the score has
//!   stayed above the recovery threshold for the configured number of
//!   consecutive decisions.
//! - A neutral bias holds the current state.
//!
//! A manual operator override pins the persona process-wide until
//! cleared; automatic evaluation resumes afterwards with counters
//! intact.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use halcyon_core::{Persona, PersonaBias, PersonaState, TrustDecision};
use halcyon_settings::{PersonaSettings, TrustSettings};

/// Result of one FSM evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Persona before evaluation.
    pub from: Persona,
    /// Persona after evaluation.
    pub to: Persona,
}

impl Transition {
    /// Whether the persona changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// Whether this evaluation escalated into SCARLET. Drives the
    /// orchestrator's security alert.
    #[must_use]
    pub fn entered_scarlet(&self) -> bool {
        self.changed() && self.to == Persona::Scarlet
    }
}

/// Persona FSM evaluator.
///
/// The per-session state lives in
/// [`PersonaState`]; the selector holds only configuration and the
/// process-wide manual override.
#[derive(Debug)]
pub struct PersonaSelector {
    low_trust_threshold: f32,
    recovery_threshold: f32,
    stickiness_count: u32,
    recovery_count: u32,
    manual_override: RwLock<Option<Persona>>,
}

impl PersonaSelector {
    /// Create a selector from persona and trust settings (the trust
    /// thresholds drive the streak counters).
    #[must_use]
    pub fn new(persona: &PersonaSettings, trust: &TrustSettings) -> Self {
        Self {
            low_trust_threshold: trust.low_trust_threshold,
            recovery_threshold: trust.recovery_threshold,
            stickiness_count: persona.stickiness_count,
            recovery_count: persona.recovery_count,
            manual_override: RwLock::new(None),
        }
    }

    /// Pin the persona to a fixed state, or clear the pin with `None`.
    ///
    /// While pinned, evaluations report the pinned persona and skip
    /// automatic transitions; streak counters keep accumulating so
    /// behavior resumes sensibly once the pin is lifted.
    pub fn set_override(&self, persona: Option<Persona>) {
        match persona {
            Some(p) => info!(persona = %p, "manual persona override set"),
            None => info!("manual persona override cleared"),
        }
        *self.manual_override.write() = persona;
    }

    /// The current manual override, if any.
    #[must_use]
    pub fn current_override(&self) -> Option<Persona> {
        *self.manual_override.read()
    }

    /// Evaluate one trust decision against the session's persona state.
    ///
    /// Mutates `state` in place (the caller persists it) and returns the
    /// transition report.
    pub fn evaluate(
        &self,
        state: &mut PersonaState,
        decision: &TrustDecision,
        now: DateTime<Utc>,
    ) -> Transition {
        let from = state.active;

        // Streak counters update on every decision, pinned or not.
        if decision.score < self.low_trust_threshold {
            state.consecutive_low_trust += 1;
        } else {
            state.consecutive_low_trust = 0;
        }
        if decision.score > self.recovery_threshold {
            state.consecutive_recovery += 1;
        } else {
            state.consecutive_recovery = 0;
        }

        if let Some(pinned) = self.current_override() {
            if state.active != pinned {
                state.active = pinned;
                state.entered_at = now;
            }
            return Transition { from, to: pinned };
        }

        let to = match state.active {
            Persona::Halston => {
                if decision.persona_bias == PersonaBias::Scarlet
                    || state.consecutive_low_trust >= self.stickiness_count
                {
                    Persona::Scarlet
                } else {
                    Persona::Halston
                }
            }
            Persona::Scarlet => {
                if decision.persona_bias == PersonaBias::Halston
                    && state.consecutive_recovery >= self.recovery_count
                {
                    Persona::Halston
                } else {
                    Persona::Scarlet
                }
            }
        };

        if to != from {
            info!(from = %from, to = %to, score = decision.score, "persona transition");
            state.active = to;
            state.entered_at = now;
            // Entering a state clears the opposing streak: leaving it
            // again requires fresh evidence.
            match to {
                Persona::Scarlet => state.consecutive_recovery = 0,
                Persona::Halston => state.consecutive_low_trust = 0,
            }
        }

        Transition { from, to }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
