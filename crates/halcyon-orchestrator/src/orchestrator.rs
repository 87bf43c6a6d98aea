//! The decision pipeline.
//!
//! [`Orchestrator::handle`] runs one utterance through resolution,
//! scoring, persona selection, and routing. The score → persist → FSM →
//! route sequence executes inside the speaker's session critical
//! section, so concurrent requests for the same speaker serialize and no
//! trust update is ever lost. External effects (diagnostics, alert,
//! dispatch) happen only after the session record is durably persisted.

use chrono::Utc;
use tracing::{debug, instrument};

use halcyon_core::{
    DecisionDiagnostics, HalcyonError, IntentRequest, Persona, RequestId, SecurityAlert,
};
use halcyon_identity::{IdentityResolver, IdentityStore};
use halcyon_persona::PersonaSelector;
use halcyon_router::IntentRouter;
use halcyon_session::{MemoryBackend, SessionBackend, SessionKey, SessionStore, TraceEntry};
use halcyon_settings::HalcyonSettings;
use halcyon_trust::{ContextSignalHolder, ScoreInputs, TrustScorer};

use crate::collaborators::Collaborators;
use crate::types::{DecisionOutcome, UtteranceEvent};

/// Longest utterance excerpt kept in the conversation trace.
const TRACE_EXCERPT_CHARS: usize = 160;

/// The top-level decision pipeline.
pub struct Orchestrator<S, B = MemoryBackend> {
    resolver: IdentityResolver<S>,
    sessions: SessionStore<B>,
    signal: ContextSignalHolder,
    scorer: TrustScorer,
    selector: PersonaSelector,
    router: IntentRouter,
    collaborators: Collaborators,
    history_retention: usize,
    trace_retention: usize,
}

impl<S: IdentityStore, B: SessionBackend> Orchestrator<S, B> {
    /// Wire the pipeline from settings, stores, and collaborators.
    pub fn new(
        settings: &HalcyonSettings,
        resolver: IdentityResolver<S>,
        sessions: SessionStore<B>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            resolver,
            sessions,
            signal: ContextSignalHolder::new(Utc::now()),
            scorer: TrustScorer::new(settings.trust.clone()),
            selector: PersonaSelector::new(&settings.persona, &settings.trust),
            router: IntentRouter::new(settings.router.clone()),
            collaborators,
            history_retention: settings.session.history_retention,
            trace_retention: settings.session.trace_retention,
        }
    }

    /// The context-signal holder, for wiring asynchronous environment
    /// updates (threat, reassurance, mode changes).
    #[must_use]
    pub fn context(&self) -> &ContextSignalHolder {
        &self.signal
    }

    /// The persona selector, for operator overrides.
    #[must_use]
    pub fn personas(&self) -> &PersonaSelector {
        &self.selector
    }

    /// The identity resolver, for enrollment hooks.
    #[must_use]
    pub fn identities(&self) -> &IdentityResolver<S> {
        &self.resolver
    }

    /// The session store (read access for monitors and tests).
    #[must_use]
    pub fn sessions(&self) -> &SessionStore<B> {
        &self.sessions
    }

    /// Evict sessions idle past the configured timeout. Returns the
    /// number evicted. The caller owns scheduling; the core never runs
    /// background tasks of its own.
    pub fn evict_idle_sessions(&self) -> usize {
        self.sessions.evict_idle(Utc::now())
    }

    /// Run one utterance plus its pre-extracted intent through the
    /// pipeline.
    ///
    /// Errors only on storage or identity-persistence failures; both
    /// abort the request with no partial state write. Callers speak
    /// [`HalcyonError::spoken_fallback`] on that path rather than
    /// exposing internal detail. An unresolved speaker is not an error
    /// and flows through on the default low-trust profile.
    #[instrument(skip(self, utterance, intent), fields(token = %utterance.transient_token, intent = %intent.intent_name))]
    pub async fn handle(
        &self,
        utterance: UtteranceEvent,
        intent: IntentRequest,
    ) -> Result<DecisionOutcome, HalcyonError> {
        let request_id = RequestId::new();
        let now = Utc::now();

        let (resolution, role_hint) = self
            .resolver
            .resolve(&utterance.transient_token, utterance.voice_match.as_ref())?;

        let key = match resolution.speaker_id() {
            Some(id) => SessionKey::Speaker(id.clone()),
            None => SessionKey::Guest(utterance.transient_token.clone()),
        };
        debug!(session = %key, resolved = resolution.is_known(), "identity resolved");

        // Latest signal at call time; staleness up to the collaborator's
        // update interval is acceptable.
        let signal = self.signal.snapshot();
        let voice_probability = utterance.voice_match.as_ref().map(|vm| vm.probability);

        // The whole read-modify-write runs inside the speaker's critical
        // section and is persisted before any external effect.
        let (decision, transition, routed, turn) =
            self.sessions.with_session(&key, now, |record| {
                let decision = self.scorer.score(&ScoreInputs {
                    role_hint,
                    voice_probability,
                    signal: &signal,
                    prior: &record.trust,
                });
                record.trust.record(decision.score, self.history_retention, now);

                let transition = self.selector.evaluate(&mut record.persona, &decision, now);

                let routed = self.router.route(record.persona.active, &intent, &decision);

                record.turn += 1;
                record.push_trace(
                    TraceEntry {
                        text: excerpt(&utterance.text),
                        intent: Some(intent.intent_name.clone()),
                        persona: record.persona.active,
                        timestamp: now,
                    },
                    self.trace_retention,
                );

                (decision, transition, routed, record.turn)
            })?;

        let persona = transition.to;
        self.publish(&request_id, &key, persona, &intent, &routed, &decision, turn);

        if transition.entered_scarlet() {
            self.collaborators.alerts.security_alert(SecurityAlert {
                request_id: request_id.clone(),
                speaker_id: key.speaker_id().cloned(),
                score: decision.score,
                threat_level: signal.threat_level,
                timestamp: now,
            });
        }

        if let Some(call) = routed.call.clone() {
            // State is durable; delivery is now the dispatcher's problem.
            let dispatcher = self.collaborators.dispatcher.clone();
            let _ = tokio::spawn(async move {
                dispatcher.dispatch(call).await;
            });
        }

        Ok(DecisionOutcome {
            request_id,
            persona,
            decision,
            routed,
            turn,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn publish(
        &self,
        request_id: &RequestId,
        key: &SessionKey,
        persona: Persona,
        intent: &IntentRequest,
        routed: &halcyon_core::RoutedCall,
        decision: &halcyon_core::TrustDecision,
        turn: u64,
    ) {
        self.collaborators.diagnostics.publish(DecisionDiagnostics {
            request_id: request_id.clone(),
            speaker_id: key.speaker_id().cloned(),
            persona,
            intent_name: intent.intent_name.clone(),
            intent_ok: routed.ok,
            decision: decision.clone(),
            turn,
            timestamp: Utc::now(),
        });
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(TRACE_EXCERPT_CHARS).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
