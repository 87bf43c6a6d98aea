//! Session record types.
//!
//! A [`SessionRecord`] aggregates everything the pipeline remembers
//! about a speaker between turns. The store owns every record; other
//! components only ever see references scoped to one request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use halcyon_core::{Persona, PersonaState, SpeakerId, TrustState};

/// Key under which a session is stored.
///
/// Resolved speakers key by stable identity so hysteresis follows the
/// person across devices and transient tokens. Unresolved speakers get
/// a token-scoped guest session — hysteresis still applies within the
/// encounter without polluting any enrolled identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    /// A resolved stable identity.
    Speaker(SpeakerId),
    /// An unresolved speaker, keyed by transient token.
    Guest(String),
}

impl SessionKey {
    /// The stable speaker ID, when this is a resolved-speaker session.
    #[must_use]
    pub fn speaker_id(&self) -> Option<&SpeakerId> {
        match self {
            Self::Speaker(id) => Some(id),
            Self::Guest(_) => None,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speaker(id) => write!(f, "{id}"),
            Self::Guest(token) => write!(f, "guest:{token}"),
        }
    }
}

/// One remembered conversational turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    /// Utterance text (may be truncated upstream).
    pub text: String,
    /// The intent routed for this turn, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Persona that answered.
    pub persona: Persona,
    /// When the turn happened.
    pub timestamp: DateTime<Utc>,
}

/// Everything the store remembers about one speaker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// The session key.
    pub key: SessionKey,
    /// Hysteretic trust score and history.
    pub trust: TrustState,
    /// Persona FSM state.
    pub persona: PersonaState,
    /// Recent conversational turns, bounded FIFO.
    pub trace: VecDeque<TraceEntry>,
    /// Last activity, drives idle eviction.
    pub last_seen: DateTime<Utc>,
    /// Conversation turn counter.
    pub turn: u64,
}

impl SessionRecord {
    /// A fresh default record: score 50, persona HALSTON, empty trace.
    #[must_use]
    pub fn new(key: SessionKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            trust: TrustState::new(now),
            persona: PersonaState::new(now),
            trace: VecDeque::new(),
            last_seen: now,
            turn: 0,
        }
    }

    /// Append a trace entry, evicting the oldest once `retention` is
    /// exceeded.
    pub fn push_trace(&mut self, entry: TraceEntry, retention: usize) {
        self.trace.push_back(entry);
        while self.trace.len() > retention {
            let _ = self.trace.pop_front();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
