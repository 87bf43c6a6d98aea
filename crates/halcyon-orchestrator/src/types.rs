//! Pipeline inbound and outbound types.

use serde::{Deserialize, Serialize};

use halcyon_core::{Persona, RequestId, RoutedCall, TrustDecision, VoiceMatch};

/// One inbound utterance from the front-end collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtteranceEvent {
    /// Transient speaker token assigned by upstream diarization.
    pub transient_token: String,
    /// Transcribed utterance text.
    pub text: String,
    /// Voice verifier report, when one was produced for this utterance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_match: Option<VoiceMatch>,
}

impl UtteranceEvent {
    /// Convenience constructor without a voice match.
    #[must_use]
    pub fn new(transient_token: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            transient_token: transient_token.into(),
            text: text.into(),
            voice_match: None,
        }
    }

    /// Attach a voice-match report (builder style).
    #[must_use]
    pub fn with_voice_match(mut self, voice_match: VoiceMatch) -> Self {
        self.voice_match = Some(voice_match);
        self
    }
}

/// The completed result of one decision cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    /// Request identifier, shared with diagnostics.
    pub request_id: RequestId,
    /// Persona active after FSM evaluation.
    pub persona: Persona,
    /// The trust decision this cycle produced.
    pub decision: TrustDecision,
    /// The routed call (or refusal) for the requested intent.
    pub routed: RoutedCall,
    /// Conversation turn number within the session.
    pub turn: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
