//! The trust scorer.
//!
//! A pure function of its inputs: the caller (the orchestrator) owns
//! persisting the updated score back into the session. Scoring starts
//! from the prior score and applies a weighted, bounded delta — the
//! score is a smoothed running value, never recomputed from scratch.
//!
//! Asymmetry is enforced twice: threat is weighted more heavily than
//! reassurance, and the per-turn gain cap (`max_step_up`) sits below the
//! per-turn loss cap (`max_step_down`), so the asymmetry survives even
//! saturating inputs.

use tracing::debug;

use halcyon_core::{
    ContextMode, ContextSignal, PersonaBias, Role, RoleHint, TrustDecision, TrustState,
};
use halcyon_settings::TrustSettings;

/// Inputs for one scoring pass.
#[derive(Clone, Copy, Debug)]
pub struct ScoreInputs<'a> {
    /// Effective role hint from identity resolution.
    pub role_hint: RoleHint,
    /// Voice-match probability, if the utterance carried one.
    pub voice_probability: Option<f32>,
    /// Context-signal snapshot taken at call time.
    pub signal: &'a ContextSignal,
    /// The speaker's prior trust state.
    pub prior: &'a TrustState,
}

/// Weighted, hysteretic trust scoring.
#[derive(Clone, Debug)]
pub struct TrustScorer {
    settings: TrustSettings,
}

impl TrustScorer {
    /// Create a scorer from configured weights.
    #[must_use]
    pub fn new(settings: TrustSettings) -> Self {
        Self { settings }
    }

    /// Compute the trust decision for one turn.
    #[must_use]
    pub fn score(&self, inputs: &ScoreInputs<'_>) -> TrustDecision {
        let t = &self.settings;
        let signal = inputs.signal;

        let mut delta = 0.0_f32;
        if let Some(p) = inputs.voice_probability {
            delta += t.voice_weight * p.clamp(0.0, 1.0);
        }
        delta += match inputs.role_hint {
            RoleHint::Owner => t.owner_bias,
            RoleHint::Household => t.household_bias,
            RoleHint::Guest => t.guest_bias,
            RoleHint::Unknown => t.unknown_bias,
        };
        delta -= match signal.context_mode {
            ContextMode::Home => 0.0,
            ContextMode::Night => t.night_penalty,
            ContextMode::Away => t.away_penalty,
        };
        delta -= t.threat_weight * signal.threat_level;
        delta += t.reassurance_weight * signal.reassurance_level;

        // Bounded step: one turn can never swing the score between
        // extremes, and gains are capped tighter than losses.
        let delta = delta.clamp(-t.max_step_down, t.max_step_up);
        let score = (inputs.prior.score + delta).clamp(0.0, 100.0);

        let role = if score >= t.owner_band {
            Role::Owner
        } else if score >= t.household_band {
            Role::Household
        } else {
            Role::Guest
        };

        let allow_sensitive =
            score >= t.sensitive_threshold && signal.threat_level < t.threat_ceiling;

        let persona_bias = if score < t.low_trust_threshold
            || signal.threat_level > t.scarlet_threat_ceiling
        {
            PersonaBias::Scarlet
        } else if score >= t.recovery_threshold {
            PersonaBias::Halston
        } else {
            PersonaBias::Neutral
        };

        debug!(
            prior = inputs.prior.score,
            delta,
            score,
            role = %role,
            allow_sensitive,
            bias = %persona_bias,
            "trust scored"
        );

        TrustDecision {
            score,
            role,
            allow_sensitive,
            persona_bias,
        }
    }

    /// The configured low-trust threshold (shared with the persona FSM).
    #[must_use]
    pub fn low_trust_threshold(&self) -> f32 {
        self.settings.low_trust_threshold
    }

    /// The configured recovery threshold (shared with the persona FSM).
    #[must_use]
    pub fn recovery_threshold(&self) -> f32 {
        self.settings.recovery_threshold
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn scorer() -> TrustScorer {
        TrustScorer::new(TrustSettings::default())
    }

    fn signal(mode: ContextMode, threat: f32, reassurance: f32) -> ContextSignal {
        ContextSignal {
            context_mode: mode,
            threat_level: threat,
            reassurance_level: reassurance,
            timestamp: Utc::now(),
        }
    }

    fn prior(score: f32) -> TrustState {
        let mut state = TrustState::new(Utc::now());
        state.score = score;
        state
    }

    fn inputs<'a>(
        role_hint: RoleHint,
        voice: Option<f32>,
        signal: &'a ContextSignal,
        prior: &'a TrustState,
    ) -> ScoreInputs<'a> {
        ScoreInputs {
            role_hint,
            voice_probability: voice,
            signal,
            prior,
        }
    }

    // ── Hysteresis ──────────────────────────────────────────────────

    #[test]
    fn single_step_is_bounded() {
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        let state = prior(50.0);
        let decision = scorer().score(&inputs(RoleHint::Household, Some(0.2), &sig, &state));

        let settings = TrustSettings::default();
        let change = decision.score - 50.0;
        assert!(change <= settings.max_step_up);
        assert!(change >= -settings.max_step_down);
    }

    #[test]
    fn extreme_inputs_cannot_jump_to_extremes_in_one_turn() {
        let sig = signal(ContextMode::Away, 1.0, 0.0);
        let state = prior(50.0);
        let decision = scorer().score(&inputs(RoleHint::Unknown, None, &sig, &state));
        // Raw delta is far past the cap; bounded to one step down.
        assert!((decision.score - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn score_builds_over_consecutive_good_turns() {
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        let mut state = prior(50.0);
        let scorer = scorer();
        for _ in 0..4 {
            let decision = scorer.score(&inputs(RoleHint::Owner, Some(0.95), &sig, &state));
            state.record(decision.score, 16, Utc::now());
        }
        // Four capped steps of +8 from 50.
        assert!((state.score - 82.0).abs() < 0.001);
    }

    // ── Asymmetry ───────────────────────────────────────────────────

    #[test]
    fn threat_spike_outweighs_equal_reassurance() {
        let scorer = scorer();
        let mut state = prior(50.0);

        let spike = signal(ContextMode::Home, 0.4, 0.0);
        let d1 = scorer.score(&inputs(RoleHint::Household, None, &spike, &state));
        state.record(d1.score, 16, Utc::now());

        let calm = signal(ContextMode::Home, 0.0, 0.4);
        let d2 = scorer.score(&inputs(RoleHint::Household, None, &calm, &state));
        state.record(d2.score, 16, Utc::now());

        // Loss outweighs the equal-magnitude recovery.
        assert!(state.score < 50.0);
    }

    #[test]
    fn asymmetry_survives_saturating_inputs() {
        let scorer = scorer();
        let mut state = prior(50.0);

        let spike = signal(ContextMode::Home, 1.0, 0.0);
        let d1 = scorer.score(&inputs(RoleHint::Household, None, &spike, &state));
        state.record(d1.score, 16, Utc::now());

        let calm = signal(ContextMode::Home, 0.0, 1.0);
        let d2 = scorer.score(&inputs(RoleHint::Household, None, &calm, &state));
        state.record(d2.score, 16, Utc::now());

        // Even with both deltas saturated at their caps, the gain cap is
        // below the loss cap.
        assert!(state.score < 50.0);
    }

    // ── Role bands ──────────────────────────────────────────────────

    #[test]
    fn role_derives_from_score_not_hint() {
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        // An enrolled owner whose score has degraded scores as guest.
        let state = prior(30.0);
        let decision = scorer().score(&inputs(RoleHint::Owner, None, &sig, &state));
        assert_eq!(decision.role, Role::Guest);
    }

    #[test]
    fn high_band_is_owner_equivalent() {
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        let state = prior(80.0);
        let decision = scorer().score(&inputs(RoleHint::Unknown, Some(0.9), &sig, &state));
        assert_eq!(decision.role, Role::Owner);
    }

    #[test]
    fn mid_band_is_household() {
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        let state = prior(60.0);
        let decision = scorer().score(&inputs(RoleHint::Household, None, &sig, &state));
        assert_eq!(decision.role, Role::Household);
    }

    // ── Sensitive gate ──────────────────────────────────────────────

    #[test]
    fn allow_sensitive_requires_both_score_and_calm() {
        let scorer = scorer();
        let state = prior(90.0);

        let calm = signal(ContextMode::Home, 0.0, 0.0);
        assert!(scorer
            .score(&inputs(RoleHint::Owner, Some(0.9), &calm, &state))
            .allow_sensitive);

        // High score but threat at the ceiling: refused.
        let tense = signal(ContextMode::Home, 0.5, 0.0);
        assert!(!scorer
            .score(&inputs(RoleHint::Owner, Some(0.9), &tense, &state))
            .allow_sensitive);
    }

    #[test]
    fn low_score_never_allows_sensitive() {
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        let state = prior(40.0);
        let decision = scorer().score(&inputs(RoleHint::Owner, Some(0.95), &sig, &state));
        assert!(!decision.allow_sensitive);
    }

    // ── Persona bias ────────────────────────────────────────────────

    #[test]
    fn low_score_biases_scarlet() {
        let sig = signal(ContextMode::Night, 0.8, 0.0);
        let state = prior(50.0);
        let decision = scorer().score(&inputs(RoleHint::Unknown, None, &sig, &state));
        assert!(decision.score < 40.0);
        assert_eq!(decision.persona_bias, PersonaBias::Scarlet);
    }

    #[test]
    fn high_threat_biases_scarlet_regardless_of_score() {
        let sig = signal(ContextMode::Home, 0.9, 0.0);
        let state = prior(95.0);
        let decision = scorer().score(&inputs(RoleHint::Owner, Some(0.95), &sig, &state));
        assert_eq!(decision.persona_bias, PersonaBias::Scarlet);
    }

    #[test]
    fn recovered_score_biases_halston() {
        let sig = signal(ContextMode::Home, 0.0, 0.2);
        let state = prior(70.0);
        let decision = scorer().score(&inputs(RoleHint::Household, Some(0.8), &sig, &state));
        assert_eq!(decision.persona_bias, PersonaBias::Halston);
    }

    #[test]
    fn indeterminate_band_is_neutral() {
        // Between low-trust (40) and recovery (60) with no threat:
        // the scorer defers to session stickiness.
        let sig = signal(ContextMode::Home, 0.0, 0.0);
        let state = prior(50.0);
        let decision = scorer().score(&inputs(RoleHint::Guest, None, &sig, &state));
        assert!(decision.score >= 40.0 && decision.score < 60.0);
        assert_eq!(decision.persona_bias, PersonaBias::Neutral);
    }

    // ── Clamp invariant ─────────────────────────────────────────────

    proptest! {
        #[test]
        fn score_always_in_range(
            prior_score in 0.0_f32..=100.0,
            voice in proptest::option::of(0.0_f32..=1.0),
            threat in 0.0_f32..=1.0,
            reassurance in 0.0_f32..=1.0,
            hint_idx in 0_u8..4,
            mode_idx in 0_u8..3,
        ) {
            let hint = match hint_idx {
                0 => RoleHint::Owner,
                1 => RoleHint::Household,
                2 => RoleHint::Guest,
                _ => RoleHint::Unknown,
            };
            let mode = match mode_idx {
                0 => ContextMode::Home,
                1 => ContextMode::Away,
                _ => ContextMode::Night,
            };
            let sig = signal(mode, threat, reassurance);
            let state = prior(prior_score);
            let decision = scorer().score(&inputs(hint, voice, &sig, &state));
            prop_assert!((0.0..=100.0).contains(&decision.score));
        }

        #[test]
        fn repeated_extreme_penalties_stay_clamped(turns in 1_usize..50) {
            let scorer = scorer();
            let sig = signal(ContextMode::Away, 1.0, 0.0);
            let mut state = prior(50.0);
            for _ in 0..turns {
                let decision = scorer.score(&inputs(RoleHint::Unknown, None, &sig, &state));
                prop_assert!((0.0..=100.0).contains(&decision.score));
                state.record(decision.score, 16, Utc::now());
            }
            prop_assert!(state.score >= 0.0);
        }
    }
}
